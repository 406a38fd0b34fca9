use crate::clause::{ClauseKind, ClauseSet};

/// The structurally required clauses, in emission order. The order reflects
/// importance, not alphabet; the remaining eight clauses are informational
/// and never checked here.
const REQUIRED: &[(ClauseKind, &str)] = &[
    (ClauseKind::Parties, "Missing parties information"),
    (
        ClauseKind::Signatories,
        "Missing signatures/signatory information",
    ),
    (ClauseKind::Term, "Missing term clause"),
    (ClauseKind::GoverningLaw, "Missing governing law clause"),
];

/// Check structural completeness of an extracted clause set.
///
/// Pure function, no network: one fixed-text issue per required clause that
/// is absent or whitespace-only.
pub fn validate(clauses: &ClauseSet) -> Vec<String> {
    REQUIRED
        .iter()
        .filter(|(kind, _)| clauses.is_missing(*kind))
        .map(|(_, issue)| (*issue).to_string())
        .collect()
}
