use serde::{Deserialize, Serialize};

/// Identifier wrapper for tracked subjects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectName(pub String);

impl SubjectName {
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// One partial assessment: a raw score plus the share of the final grade it carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub grade: f64,
    pub weight_percent: f64,
}

/// High level status tracked for a subject across calculations.
///
/// `Open` means no evaluation is stored yet, either because the ledger is
/// empty or because nothing has been calculated for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectStatus {
    Open,
    Approved,
    AtRisk,
    NotApproved,
}

impl SubjectStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubjectStatus::Open => "open",
            SubjectStatus::Approved => "approved",
            SubjectStatus::AtRisk => "at_risk",
            SubjectStatus::NotApproved => "not_approved",
        }
    }
}
