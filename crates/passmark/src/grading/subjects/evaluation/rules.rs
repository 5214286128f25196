use super::super::domain::GradeEntry;
use super::GradeContribution;

/// Tolerance absorbing float drift in weight totals (e.g. thirds of 33.3
/// plus 33.4 summing to a hair under or over 100).
pub(crate) const WEIGHT_EPSILON: f64 = 1e-9;

pub(crate) struct WeightSignals {
    pub total_percent: f64,
    pub weighted_sum: f64,
    pub remaining_percent: f64,
}

/// Round to one decimal, halves away from zero.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn tally_entries(entries: &[GradeEntry]) -> (Vec<GradeContribution>, WeightSignals) {
    let mut contributions = Vec::with_capacity(entries.len());
    let mut total_percent = 0.0;
    let mut weighted_sum = 0.0;

    for entry in entries {
        total_percent += entry.weight_percent;
        weighted_sum += entry.grade * entry.weight_percent;
        contributions.push(GradeContribution {
            grade: entry.grade,
            weight_percent: entry.weight_percent,
            points: entry.grade * entry.weight_percent / 100.0,
        });
    }

    let remaining_percent = snap_remaining(100.0 - total_percent);
    let signals = WeightSignals {
        total_percent,
        weighted_sum,
        remaining_percent,
    };

    (contributions, signals)
}

pub(crate) fn snap_remaining(remaining: f64) -> f64 {
    if remaining <= WEIGHT_EPSILON {
        0.0
    } else {
        remaining
    }
}
