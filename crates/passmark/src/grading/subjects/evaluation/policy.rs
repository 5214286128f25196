use serde::{Deserialize, Serialize};

use super::config::ApprovalSettings;
use super::rules::{round_to_tenth, WeightSignals, WEIGHT_EPSILON};

/// Grade needed on the percentage still open, or a terminal classification
/// when no numeric answer exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RequiredGrade {
    Value(f64),
    AlreadyApproved,
    ImpossibleToApprove,
}

impl RequiredGrade {
    pub fn summary(&self, remaining_percent: f64) -> String {
        match self {
            RequiredGrade::Value(value) => format!(
                "needs {value} on the remaining {remaining_percent}% to reach the passing mark"
            ),
            RequiredGrade::AlreadyApproved => {
                "the full 100% is entered and the passing mark is met".to_string()
            }
            RequiredGrade::ImpossibleToApprove => {
                "the passing mark cannot be reached with the percentage still open".to_string()
            }
        }
    }
}

/// Tri-state classification of a subject after evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    Approved,
    AtRisk,
    NotApproved,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::AtRisk => "at_risk",
            ApprovalStatus::NotApproved => "not_approved",
        }
    }
}

pub(crate) fn decide_outcome(
    signals: &WeightSignals,
    current_average: f64,
    settings: &ApprovalSettings,
) -> (RequiredGrade, ApprovalStatus) {
    if signals.remaining_percent <= WEIGHT_EPSILON {
        return if current_average >= settings.min_accept_value {
            (RequiredGrade::AlreadyApproved, ApprovalStatus::Approved)
        } else {
            (RequiredGrade::ImpossibleToApprove, ApprovalStatus::NotApproved)
        };
    }

    let needed_points = settings.min_accept_value * 100.0 - signals.weighted_sum;
    let raw_required = needed_points / signals.remaining_percent;

    if raw_required > settings.max_value {
        return (RequiredGrade::ImpossibleToApprove, ApprovalStatus::NotApproved);
    }

    // A result at or below the scale floor means approval is secured no
    // matter the remaining performance; it still reports as a number,
    // floored at the scale minimum.
    let required = round_to_tenth(raw_required.max(settings.min_value));
    let status = if current_average >= settings.min_accept_value {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::AtRisk
    };

    (RequiredGrade::Value(required), status)
}
