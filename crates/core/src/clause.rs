use serde::{Deserialize, Serialize};

/// The named contract provisions tracked by the pipeline.
///
/// The set is closed: every clause a document can be checked for is a variant
/// here, and `ClauseSet` carries all of them unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClauseKind {
    Parties,
    Term,
    Termination,
    Payment,
    Confidentiality,
    Liability,
    GoverningLaw,
    DisputeResolution,
    SpecialConditions,
    Riders,
    Signatories,
    Language,
}

impl ClauseKind {
    /// The camelCase key used on the wire and in model prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseKind::Parties => "parties",
            ClauseKind::Term => "term",
            ClauseKind::Termination => "termination",
            ClauseKind::Payment => "payment",
            ClauseKind::Confidentiality => "confidentiality",
            ClauseKind::Liability => "liability",
            ClauseKind::GoverningLaw => "governingLaw",
            ClauseKind::DisputeResolution => "disputeResolution",
            ClauseKind::SpecialConditions => "specialConditions",
            ClauseKind::Riders => "riders",
            ClauseKind::Signatories => "signatories",
            ClauseKind::Language => "language",
        }
    }
}

impl std::fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted clause text keyed by clause kind.
///
/// All twelve fields are always present — a field the model could not fill is
/// an empty string, never an omitted key. `#[serde(default)]` makes parsing
/// tolerant of omitted keys anyway; a missing key deserializes to empty.
/// Instances are built once per extraction run and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClauseSet {
    pub parties: String,
    pub term: String,
    pub termination: String,
    pub payment: String,
    pub confidentiality: String,
    pub liability: String,
    pub governing_law: String,
    pub dispute_resolution: String,
    pub special_conditions: String,
    pub riders: String,
    pub signatories: String,
    pub language: String,
}

impl ClauseSet {
    /// The extracted text for one clause.
    pub fn get(&self, kind: ClauseKind) -> &str {
        match kind {
            ClauseKind::Parties => &self.parties,
            ClauseKind::Term => &self.term,
            ClauseKind::Termination => &self.termination,
            ClauseKind::Payment => &self.payment,
            ClauseKind::Confidentiality => &self.confidentiality,
            ClauseKind::Liability => &self.liability,
            ClauseKind::GoverningLaw => &self.governing_law,
            ClauseKind::DisputeResolution => &self.dispute_resolution,
            ClauseKind::SpecialConditions => &self.special_conditions,
            ClauseKind::Riders => &self.riders,
            ClauseKind::Signatories => &self.signatories,
            ClauseKind::Language => &self.language,
        }
    }

    /// A clause counts as missing when its text is empty or whitespace-only.
    pub fn is_missing(&self, kind: ClauseKind) -> bool {
        self.get(kind).trim().is_empty()
    }
}
