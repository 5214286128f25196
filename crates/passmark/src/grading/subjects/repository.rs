use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{SubjectName, SubjectStatus};
use super::evaluation::EvaluationResult;
use super::ledger::GradeLedger;

/// Repository record holding one subject's ledger, status, and last
/// calculated evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub name: SubjectName,
    pub ledger: GradeLedger,
    pub status: SubjectStatus,
    pub evaluation: Option<EvaluationResult>,
}

impl SubjectRecord {
    pub fn decision_rationale(&self) -> String {
        match &self.evaluation {
            Some(result) => result.summary(),
            None => "pending calculation".to_string(),
        }
    }

    pub fn status_view(&self) -> SubjectStatusView {
        SubjectStatusView {
            name: self.name.clone(),
            status: self.status.label(),
            decision_rationale: self.decision_rationale(),
            entry_count: self.ledger.len(),
            total_percent_entered: self.ledger.total_percent(),
            current_average: self
                .evaluation
                .as_ref()
                .map(|result| result.current_average),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait SubjectRepository: Send + Sync {
    fn insert(&self, record: SubjectRecord) -> Result<SubjectRecord, RepositoryError>;
    fn update(&self, record: SubjectRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, name: &SubjectName) -> Result<Option<SubjectRecord>, RepositoryError>;
    fn remove(&self, name: &SubjectName) -> Result<(), RepositoryError>;
    fn names(&self) -> Result<Vec<SubjectName>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("subject already exists")]
    Conflict,
    #[error("subject not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound notification hooks (e.g. mail or push
/// adapters congratulating a passed subject).
pub trait NoticePublisher: Send + Sync {
    fn publish(&self, notice: StatusNotice) -> Result<(), NoticeError>;
}

/// Notice payload so routes and tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusNotice {
    pub template: String,
    pub subject: SubjectName,
    pub details: BTreeMap<String, String>,
}

/// Notice dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NoticeError {
    #[error("notice transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a subject's exposed state.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectStatusView {
    pub name: SubjectName,
    pub status: &'static str,
    pub decision_rationale: String,
    pub entry_count: usize,
    pub total_percent_entered: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_average: Option<f64>,
}
