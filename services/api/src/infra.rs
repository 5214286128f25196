use metrics_exporter_prometheus::PrometheusHandle;
use passmark::grading::subjects::{
    NoticeError, NoticePublisher, RepositoryError, StatusNotice, SubjectName, SubjectRecord,
    SubjectRepository,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubjectRepository {
    records: Arc<Mutex<HashMap<SubjectName, SubjectRecord>>>,
}

impl SubjectRepository for InMemorySubjectRepository {
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
        if guard.contains_key(&record.name) {
            guard.insert(record.name.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, name: &SubjectName) -> Result<Option<SubjectRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(name).cloned())
    }

    fn remove(&self, name: &SubjectName) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(name)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn names(&self) -> Result<Vec<SubjectName>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.keys().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNoticePublisher {
    events: Arc<Mutex<Vec<StatusNotice>>>,
}

impl NoticePublisher for InMemoryNoticePublisher {
    fn publish(&self, notice: StatusNotice) -> Result<(), NoticeError> {
        let mut guard = self.events.lock().expect("notice mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl InMemoryNoticePublisher {
    pub(crate) fn events(&self) -> Vec<StatusNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

/// Parse a `GRADE:WEIGHT` pair from the command line, e.g. `4.5:20`.
pub(crate) fn parse_entry_spec(raw: &str) -> Result<(f64, f64), String> {
    let (grade, weight) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected GRADE:WEIGHT, got '{raw}'"))?;
    let grade = grade
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid grade in '{raw}' ({err})"))?;
    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid weight in '{raw}' ({err})"))?;
    Ok((grade, weight))
}
