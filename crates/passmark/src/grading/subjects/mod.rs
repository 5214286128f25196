//! Subject tracking: validated grade ledgers, approval projection, and the
//! service/router pair that exposes them.

pub mod domain;
pub(crate) mod evaluation;
pub mod ledger;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{GradeEntry, SubjectName, SubjectStatus};
pub use evaluation::{
    ApprovalCalculator, ApprovalSettings, ApprovalStatus, EvaluationError, EvaluationResult,
    GradeContribution, RequiredGrade,
};
pub use ledger::{GradeLedger, LedgerError};
pub use repository::{
    NoticeError, NoticePublisher, RepositoryError, StatusNotice, SubjectRecord, SubjectRepository,
    SubjectStatusView,
};
pub use router::subject_router;
pub use service::{SubjectService, SubjectServiceError};
