use std::collections::BTreeMap;
use std::sync::Arc;

use super::domain::{SubjectName, SubjectStatus};
use super::evaluation::{
    ApprovalCalculator, ApprovalSettings, ApprovalStatus, EvaluationError, EvaluationResult,
};
use super::ledger::{GradeLedger, LedgerError};
use super::repository::{
    NoticeError, NoticePublisher, RepositoryError, StatusNotice, SubjectRecord, SubjectRepository,
};

/// Service composing the repository, the notice hook, and the calculator.
pub struct SubjectService<R, N> {
    repository: Arc<R>,
    notices: Arc<N>,
    calculator: Arc<ApprovalCalculator>,
}

impl<R, N> SubjectService<R, N>
where
    R: SubjectRepository + 'static,
    N: NoticePublisher + 'static,
{
    pub fn new(repository: Arc<R>, notices: Arc<N>, settings: ApprovalSettings) -> Self {
        Self {
            repository,
            notices,
            calculator: Arc::new(ApprovalCalculator::new(settings)),
        }
    }

    pub fn settings(&self) -> ApprovalSettings {
        self.calculator.settings()
    }

    /// Open a new subject with an empty ledger.
    pub fn create(&self, name: SubjectName) -> Result<SubjectRecord, SubjectServiceError> {
        if name.is_blank() {
            return Err(SubjectServiceError::BlankName);
        }

        let record = SubjectRecord {
            name,
            ledger: GradeLedger::new(self.calculator.settings()),
            status: SubjectStatus::Open,
            evaluation: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    pub fn add_grade(
        &self,
        name: &SubjectName,
        grade: f64,
        weight_percent: f64,
    ) -> Result<SubjectRecord, SubjectServiceError> {
        self.mutate_ledger(name, |ledger| ledger.add_entry(grade, weight_percent))
    }

    pub fn update_grade(
        &self,
        name: &SubjectName,
        index: usize,
        grade: Option<f64>,
        weight_percent: Option<f64>,
    ) -> Result<SubjectRecord, SubjectServiceError> {
        self.mutate_ledger(name, |ledger| {
            ledger.update_entry(index, grade, weight_percent)
        })
    }

    pub fn remove_grade(
        &self,
        name: &SubjectName,
        index: usize,
    ) -> Result<SubjectRecord, SubjectServiceError> {
        self.mutate_ledger(name, |ledger| ledger.remove_entry(index))
    }

    /// Evaluate a subject, persist the outcome, and publish a notice when
    /// the calculation lands on approval.
    pub fn calculate(&self, name: &SubjectName) -> Result<EvaluationResult, SubjectServiceError> {
        let mut record = self.fetch_record(name)?;

        let result = self.calculator.evaluate(&record.ledger)?;

        record.status = status_for(&result);
        record.evaluation = Some(result.clone());
        self.repository.update(record)?;

        if result.final_status == ApprovalStatus::Approved {
            let mut details = BTreeMap::new();
            details.insert(
                "current_average".to_string(),
                result.current_average.to_string(),
            );
            details.insert(
                "total_percent_entered".to_string(),
                result.total_percent_entered.to_string(),
            );
            self.notices.publish(StatusNotice {
                template: "subject_approved".to_string(),
                subject: name.clone(),
                details,
            })?;
        }

        Ok(result)
    }

    /// Fetch a subject and current status for API responses.
    pub fn get(&self, name: &SubjectName) -> Result<SubjectRecord, SubjectServiceError> {
        self.fetch_record(name)
    }

    pub fn delete(&self, name: &SubjectName) -> Result<(), SubjectServiceError> {
        self.repository.remove(name)?;
        Ok(())
    }

    /// Names of every tracked subject, sorted for stable listings.
    pub fn subjects(&self) -> Result<Vec<SubjectName>, SubjectServiceError> {
        let mut names = self.repository.names()?;
        names.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(names)
    }

    fn mutate_ledger<F>(
        &self,
        name: &SubjectName,
        mutation: F,
    ) -> Result<SubjectRecord, SubjectServiceError>
    where
        F: FnOnce(&mut GradeLedger) -> Result<(), LedgerError>,
    {
        let mut record = self.fetch_record(name)?;
        mutation(&mut record.ledger)?;

        if record.ledger.is_empty() {
            record.status = SubjectStatus::Open;
            record.evaluation = None;
        } else {
            let result = self.calculator.evaluate(&record.ledger)?;
            record.status = status_for(&result);
            record.evaluation = Some(result);
        }

        self.repository.update(record.clone())?;
        Ok(record)
    }

    fn fetch_record(&self, name: &SubjectName) -> Result<SubjectRecord, SubjectServiceError> {
        let record = self
            .repository
            .fetch(name)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

fn status_for(result: &EvaluationResult) -> SubjectStatus {
    match result.final_status {
        ApprovalStatus::Approved => SubjectStatus::Approved,
        ApprovalStatus::AtRisk => SubjectStatus::AtRisk,
        ApprovalStatus::NotApproved => SubjectStatus::NotApproved,
    }
}

/// Error raised by the subject service.
#[derive(Debug, thiserror::Error)]
pub enum SubjectServiceError {
    #[error("subject name must not be blank")]
    BlankName,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notice(#[from] NoticeError),
}
