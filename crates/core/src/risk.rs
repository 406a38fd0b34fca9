use serde::{Deserialize, Serialize};

use crate::clause::{ClauseKind, ClauseSet};

/// Three-level risk color attached to a missing clause or a whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Red,
    Amber,
    Green,
}

/// One risk entry for a clause that is absent from the document.
///
/// Clauses that are present produce no entry — absence of an entry means the
/// clause is satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingClause {
    pub name: ClauseKind,
    pub severity: Severity,
    pub reason: String,
}

/// Missing-clause entries plus the aggregate document severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub missing: Vec<MissingClause>,
    pub overall: Severity,
}

/// The fixed rule table, in emission order. Row order reflects importance,
/// not alphabet: the three red blockers first, then the amber flags.
const RULES: &[(ClauseKind, &str, Severity)] = &[
    (ClauseKind::Parties, "No parties identified", Severity::Red),
    (
        ClauseKind::Signatories,
        "No signature/signatory section",
        Severity::Red,
    ),
    (
        ClauseKind::GoverningLaw,
        "No governing law specified",
        Severity::Red,
    ),
    (
        ClauseKind::Termination,
        "Termination terms missing",
        Severity::Amber,
    ),
    (
        ClauseKind::Liability,
        "Liability allocation missing",
        Severity::Amber,
    ),
    (
        ClauseKind::Confidentiality,
        "Confidentiality terms missing",
        Severity::Amber,
    ),
    (
        ClauseKind::Payment,
        "Payment terms missing",
        Severity::Amber,
    ),
    (
        ClauseKind::DisputeResolution,
        "Dispute resolution mechanism missing",
        Severity::Amber,
    ),
    (
        ClauseKind::Term,
        "Contract duration missing",
        Severity::Amber,
    ),
];

/// Map clause presence to missing-clause entries and an aggregate severity.
///
/// Pure function of the clause set: each rule is evaluated independently, a
/// clause triggers at most its own rule, and entries come out in table order.
/// Aggregate is red if any entry is red, amber if any is amber, else green.
pub fn classify(clauses: &ClauseSet) -> RiskAssessment {
    let missing: Vec<MissingClause> = RULES
        .iter()
        .filter(|(kind, _, _)| clauses.is_missing(*kind))
        .map(|(kind, reason, severity)| MissingClause {
            name: *kind,
            severity: *severity,
            reason: (*reason).to_string(),
        })
        .collect();

    let overall = if missing.iter().any(|m| m.severity == Severity::Red) {
        Severity::Red
    } else if missing.iter().any(|m| m.severity == Severity::Amber) {
        Severity::Amber
    } else {
        Severity::Green
    };

    RiskAssessment { missing, overall }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_set() -> ClauseSet {
        ClauseSet {
            parties: "Acme Corp and Beta LLC".into(),
            term: "24 months".into(),
            termination: "30 days notice".into(),
            payment: "Net 30".into(),
            confidentiality: "Mutual NDA terms".into(),
            liability: "Capped at fees paid".into(),
            governing_law: "State of Delaware".into(),
            dispute_resolution: "AAA arbitration".into(),
            special_conditions: "None".into(),
            riders: "Exhibit A".into(),
            signatories: "CEO of each party".into(),
            language: "English".into(),
        }
    }

    #[test]
    fn all_present_is_green_with_no_entries() {
        let risk = classify(&full_set());
        assert!(risk.missing.is_empty());
        assert_eq!(risk.overall, Severity::Green);
    }

    #[test]
    fn any_red_clause_makes_document_red() {
        for field in [ClauseKind::Parties, ClauseKind::Signatories, ClauseKind::GoverningLaw] {
            let mut set = full_set();
            match field {
                ClauseKind::Parties => set.parties.clear(),
                ClauseKind::Signatories => set.signatories.clear(),
                ClauseKind::GoverningLaw => set.governing_law.clear(),
                _ => unreachable!(),
            }
            let risk = classify(&set);
            assert_eq!(risk.overall, Severity::Red, "{field} blank should be red");
            assert_eq!(risk.missing.len(), 1);
            assert_eq!(risk.missing[0].name, field);
        }
    }

    #[test]
    fn amber_only_when_no_red() {
        let mut set = full_set();
        set.payment.clear();
        set.termination.clear();
        let risk = classify(&set);
        assert_eq!(risk.overall, Severity::Amber);
        // Table order: termination before payment.
        let names: Vec<ClauseKind> = risk.missing.iter().map(|m| m.name).collect();
        assert_eq!(names, vec![ClauseKind::Termination, ClauseKind::Payment]);
    }

    #[test]
    fn empty_set_triggers_all_nine_rules() {
        let risk = classify(&ClauseSet::default());
        assert_eq!(risk.missing.len(), 9);
        assert_eq!(risk.overall, Severity::Red);
        let names: Vec<ClauseKind> = risk.missing.iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec![
                ClauseKind::Parties,
                ClauseKind::Signatories,
                ClauseKind::GoverningLaw,
                ClauseKind::Termination,
                ClauseKind::Liability,
                ClauseKind::Confidentiality,
                ClauseKind::Payment,
                ClauseKind::DisputeResolution,
                ClauseKind::Term,
            ]
        );
    }

    #[test]
    fn informational_clauses_never_classified() {
        let mut set = full_set();
        set.special_conditions.clear();
        set.riders.clear();
        set.language.clear();
        let risk = classify(&set);
        assert!(risk.missing.is_empty());
        assert_eq!(risk.overall, Severity::Green);
    }

    #[test]
    fn classify_is_idempotent() {
        let mut set = full_set();
        set.liability.clear();
        let first = classify(&set);
        let second = classify(&set);
        assert_eq!(first, second);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Red).unwrap(), "\"red\"");
        assert_eq!(serde_json::to_string(&Severity::Amber).unwrap(), "\"amber\"");
        assert_eq!(serde_json::to_string(&Severity::Green).unwrap(), "\"green\"");
    }
}
