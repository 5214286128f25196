use serde::{Deserialize, Serialize};

const DEFAULT_MIN_ACCEPT_VALUE: f64 = 3.0;
const DEFAULT_MIN_VALUE: f64 = 0.0;
const DEFAULT_MAX_VALUE: f64 = 5.0;

/// Grading scale and approval threshold applied during evaluation.
///
/// Plain value object: callers hand it to the calculator explicitly, nothing
/// here reads ambient configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApprovalSettings {
    pub min_accept_value: f64,
    pub min_value: f64,
    pub max_value: f64,
}

impl ApprovalSettings {
    /// Build settings while reconciling inconsistent inputs: the scale
    /// bounds win over the threshold, and the lower bound never exceeds the
    /// upper one. Non-finite inputs fall back to the defaults.
    pub fn new(min_accept_value: f64, min_value: f64, max_value: f64) -> Self {
        let max_value = if max_value.is_finite() {
            max_value
        } else {
            DEFAULT_MAX_VALUE
        };
        let min_value = if min_value.is_finite() {
            min_value.min(max_value)
        } else {
            DEFAULT_MIN_VALUE.min(max_value)
        };
        let min_accept_value = if min_accept_value.is_finite() {
            min_accept_value.clamp(min_value, max_value)
        } else {
            DEFAULT_MIN_ACCEPT_VALUE.clamp(min_value, max_value)
        };

        Self {
            min_accept_value,
            min_value,
            max_value,
        }
    }
}

impl Default for ApprovalSettings {
    fn default() -> Self {
        Self {
            min_accept_value: DEFAULT_MIN_ACCEPT_VALUE,
            min_value: DEFAULT_MIN_VALUE,
            max_value: DEFAULT_MAX_VALUE,
        }
    }
}
