use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::grading::subjects::domain::SubjectName;
use crate::grading::subjects::evaluation::{ApprovalCalculator, ApprovalSettings};
use crate::grading::subjects::ledger::GradeLedger;
use crate::grading::subjects::repository::{
    NoticeError, NoticePublisher, RepositoryError, StatusNotice, SubjectRecord, SubjectRepository,
};
use crate::grading::subjects::{subject_router, SubjectService};

pub(super) fn settings() -> ApprovalSettings {
    ApprovalSettings::default()
}

pub(super) fn calculator() -> ApprovalCalculator {
    ApprovalCalculator::new(settings())
}

pub(super) fn subject(name: &str) -> SubjectName {
    SubjectName(name.to_string())
}

pub(super) fn ledger_with(entries: &[(f64, f64)]) -> GradeLedger {
    let mut ledger = GradeLedger::new(settings());
    for (grade, weight) in entries {
        ledger
            .add_entry(*grade, *weight)
            .expect("valid fixture entry");
    }
    ledger
}

pub(super) fn build_service() -> (
    SubjectService<MemoryRepository, MemoryNotices>,
    Arc<MemoryRepository>,
    Arc<MemoryNotices>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notices = Arc::new(MemoryNotices::default());
    let service = SubjectService::new(repository.clone(), notices.clone(), settings());
    (service, repository, notices)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SubjectName, SubjectRecord>>>,
}

impl SubjectRepository for MemoryRepository {
    fn insert(&self, record: SubjectRecord) -> Result<SubjectRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.name) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.name.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SubjectRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.name.clone(), record);
        Ok(())
    }

    fn fetch(&self, name: &SubjectName) -> Result<Option<SubjectRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(name).cloned())
    }

    fn remove(&self, name: &SubjectName) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(name).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn names(&self) -> Result<Vec<SubjectName>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.keys().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotices {
    events: Arc<Mutex<Vec<StatusNotice>>>,
}

impl MemoryNotices {
    pub(super) fn events(&self) -> Vec<StatusNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

impl NoticePublisher for MemoryNotices {
    fn publish(&self, notice: StatusNotice) -> Result<(), NoticeError> {
        self.events
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl SubjectRepository for ConflictRepository {
    fn insert(&self, _record: SubjectRecord) -> Result<SubjectRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: SubjectRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _name: &SubjectName) -> Result<Option<SubjectRecord>, RepositoryError> {
        Ok(None)
    }

    fn remove(&self, _name: &SubjectName) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }

    fn names(&self) -> Result<Vec<SubjectName>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl SubjectRepository for UnavailableRepository {
    fn insert(&self, _record: SubjectRecord) -> Result<SubjectRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn update(&self, _record: SubjectRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn fetch(&self, _name: &SubjectName) -> Result<Option<SubjectRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn remove(&self, _name: &SubjectName) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn names(&self) -> Result<Vec<SubjectName>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 16)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn subject_router_with_service(
    service: SubjectService<MemoryRepository, MemoryNotices>,
) -> axum::Router {
    subject_router(Arc::new(service))
}
