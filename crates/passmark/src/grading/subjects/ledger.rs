use serde::{Deserialize, Serialize};

use super::domain::GradeEntry;
use super::evaluation::{ApprovalSettings, WEIGHT_EPSILON};

/// Append-ordered weighted grade entries for one subject.
///
/// Every mutation validates before committing, so the weight total never
/// exceeds 100 and every stored grade lies within the configured scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeLedger {
    entries: Vec<GradeEntry>,
    settings: ApprovalSettings,
}

/// Rejection raised by ledger mutations. The ledger is unchanged whenever
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("grade {grade} is outside the accepted scale [{min}, {max}]")]
    InvalidGrade { grade: f64, min: f64, max: f64 },
    #[error("weight {weight_percent}% is not a positive percentage")]
    InvalidPercentage { weight_percent: f64 },
    #[error("entry would push the weight total to {attempted_total}%, past the 100% cap")]
    PercentageCapExceeded { attempted_total: f64 },
    #[error("no entry at position {index} (ledger holds {len})")]
    NotFound { index: usize, len: usize },
}

impl GradeLedger {
    pub fn new(settings: ApprovalSettings) -> Self {
        Self {
            entries: Vec::new(),
            settings,
        }
    }

    pub fn add_entry(&mut self, grade: f64, weight_percent: f64) -> Result<(), LedgerError> {
        let entry = self.validated(grade, weight_percent, self.total_percent())?;
        self.entries.push(entry);
        Ok(())
    }

    /// Replace the grade and/or weight of one entry, re-validating against
    /// the total formed by all the other entries. `None` keeps the current
    /// value for that field.
    pub fn update_entry(
        &mut self,
        index: usize,
        grade: Option<f64>,
        weight_percent: Option<f64>,
    ) -> Result<(), LedgerError> {
        let current = *self.entry_at(index)?;
        let grade = grade.unwrap_or(current.grade);
        let weight_percent = weight_percent.unwrap_or(current.weight_percent);
        let other_total = self.total_percent() - current.weight_percent;

        let entry = self.validated(grade, weight_percent, other_total)?;
        self.entries[index] = entry;
        Ok(())
    }

    pub fn remove_entry(&mut self, index: usize) -> Result<(), LedgerError> {
        self.entry_at(index)?;
        self.entries.remove(index);
        Ok(())
    }

    pub fn total_percent(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight_percent).sum()
    }

    pub fn remaining_percent(&self) -> f64 {
        let remaining = 100.0 - self.total_percent();
        if remaining <= WEIGHT_EPSILON {
            0.0
        } else {
            remaining
        }
    }

    /// Read-only view of the entries; mutation only happens through the
    /// validating operations above.
    pub fn entries(&self) -> &[GradeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn settings(&self) -> ApprovalSettings {
        self.settings
    }

    fn entry_at(&self, index: usize) -> Result<&GradeEntry, LedgerError> {
        self.entries.get(index).ok_or(LedgerError::NotFound {
            index,
            len: self.entries.len(),
        })
    }

    fn validated(
        &self,
        grade: f64,
        weight_percent: f64,
        existing_total: f64,
    ) -> Result<GradeEntry, LedgerError> {
        if !grade.is_finite() || grade < self.settings.min_value || grade > self.settings.max_value
        {
            return Err(LedgerError::InvalidGrade {
                grade,
                min: self.settings.min_value,
                max: self.settings.max_value,
            });
        }

        if !weight_percent.is_finite() || weight_percent <= 0.0 {
            return Err(LedgerError::InvalidPercentage { weight_percent });
        }

        let attempted_total = existing_total + weight_percent;
        if attempted_total > 100.0 + WEIGHT_EPSILON {
            return Err(LedgerError::PercentageCapExceeded { attempted_total });
        }

        Ok(GradeEntry {
            grade,
            weight_percent,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_entries_for_tests(
        entries: Vec<GradeEntry>,
        settings: ApprovalSettings,
    ) -> Self {
        Self { entries, settings }
    }
}
