mod config;
mod policy;
mod rules;

pub use config::ApprovalSettings;
pub use policy::{ApprovalStatus, RequiredGrade};

pub(crate) use rules::WEIGHT_EPSILON;

use super::ledger::GradeLedger;
use policy::decide_outcome;
use rules::{round_to_tenth, tally_entries};
use serde::{Deserialize, Serialize};

/// Stateless calculator projecting a ledger onto the approval threshold.
pub struct ApprovalCalculator {
    settings: ApprovalSettings,
}

impl ApprovalCalculator {
    pub fn new(settings: ApprovalSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> ApprovalSettings {
        self.settings
    }

    /// Derive the weighted average, the grade required on the open
    /// percentage, and the final status from the ledger contents.
    ///
    /// Pure: the same ledger and settings always yield the same result. The
    /// weight-total cap is re-checked here so a breached ledger fails loudly
    /// instead of producing a misleading projection.
    pub fn evaluate(&self, ledger: &GradeLedger) -> Result<EvaluationResult, EvaluationError> {
        let (contributions, signals) = tally_entries(ledger.entries());

        if signals.total_percent > 100.0 + WEIGHT_EPSILON {
            return Err(EvaluationError::PercentageExceeded {
                total_percent: signals.total_percent,
            });
        }

        // The divisor is the full subject weight, not the entered share: a
        // partially filled ledger reports its contribution to the final
        // grade rather than a normalized average of the entries.
        let current_average = round_to_tenth(signals.weighted_sum / 100.0);
        let (required_grade, final_status) =
            decide_outcome(&signals, current_average, &self.settings);

        Ok(EvaluationResult {
            current_average,
            total_percent_entered: signals.total_percent,
            remaining_percent: signals.remaining_percent,
            required_grade,
            final_status,
            contributions,
        })
    }
}

/// Discrete contribution of one entry, keeping evaluations auditable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeContribution {
    pub grade: f64,
    pub weight_percent: f64,
    pub points: f64,
}

/// Evaluation output describing progress toward the passing mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub current_average: f64,
    pub total_percent_entered: f64,
    pub remaining_percent: f64,
    pub required_grade: RequiredGrade,
    pub final_status: ApprovalStatus,
    pub contributions: Vec<GradeContribution>,
}

impl EvaluationResult {
    pub fn summary(&self) -> String {
        self.required_grade.summary(self.remaining_percent)
    }
}

/// Defensive failure raised when ledger weights exceed the full subject
/// weight. Unreachable through the ledger's own mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("entered weights total {total_percent}%, more than the 100% a subject carries")]
    PercentageExceeded { total_percent: f64 },
}
