use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::SubjectName;
use super::repository::{NoticePublisher, RepositoryError, SubjectRepository};
use super::service::{SubjectService, SubjectServiceError};

/// Router builder exposing HTTP endpoints for the subject workflow.
pub fn subject_router<R, N>(service: Arc<SubjectService<R, N>>) -> Router
where
    R: SubjectRepository + 'static,
    N: NoticePublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/subjects",
            post(create_handler::<R, N>).get(list_handler::<R, N>),
        )
        .route(
            "/api/v1/subjects/:name",
            get(status_handler::<R, N>).delete(delete_handler::<R, N>),
        )
        .route(
            "/api/v1/subjects/:name/grades",
            post(add_grade_handler::<R, N>),
        )
        .route(
            "/api/v1/subjects/:name/grades/:index",
            put(update_grade_handler::<R, N>).delete(remove_grade_handler::<R, N>),
        )
        .route(
            "/api/v1/subjects/:name/calculation",
            post(calculate_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateSubjectRequest {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GradeEntryRequest {
    pub(crate) grade: f64,
    pub(crate) weight_percent: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateGradeRequest {
    #[serde(default)]
    pub(crate) grade: Option<f64>,
    #[serde(default)]
    pub(crate) weight_percent: Option<f64>,
}

pub(crate) async fn create_handler<R, N>(
    State(service): State<Arc<SubjectService<R, N>>>,
    axum::Json(request): axum::Json<CreateSubjectRequest>,
) -> Response
where
    R: SubjectRepository + 'static,
    N: NoticePublisher + 'static,
{
    match service.create(SubjectName(request.name)) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, N>(
    State(service): State<Arc<SubjectService<R, N>>>,
) -> Response
where
    R: SubjectRepository + 'static,
    N: NoticePublisher + 'static,
{
    match service.subjects() {
        Ok(names) => {
            let payload = json!({ "subjects": names });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<SubjectService<R, N>>>,
    Path(name): Path<String>,
) -> Response
where
    R: SubjectRepository + 'static,
    N: NoticePublisher + 'static,
{
    let name = SubjectName(name);
    match service.get(&name) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, N>(
    State(service): State<Arc<SubjectService<R, N>>>,
    Path(name): Path<String>,
) -> Response
where
    R: SubjectRepository + 'static,
    N: NoticePublisher + 'static,
{
    let name = SubjectName(name);
    match service.delete(&name) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_grade_handler<R, N>(
    State(service): State<Arc<SubjectService<R, N>>>,
    Path(name): Path<String>,
    axum::Json(request): axum::Json<GradeEntryRequest>,
) -> Response
where
    R: SubjectRepository + 'static,
    N: NoticePublisher + 'static,
{
    let name = SubjectName(name);
    match service.add_grade(&name, request.grade, request.weight_percent) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_grade_handler<R, N>(
    State(service): State<Arc<SubjectService<R, N>>>,
    Path((name, index)): Path<(String, usize)>,
    axum::Json(request): axum::Json<UpdateGradeRequest>,
) -> Response
where
    R: SubjectRepository + 'static,
    N: NoticePublisher + 'static,
{
    let name = SubjectName(name);
    match service.update_grade(&name, index, request.grade, request.weight_percent) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_grade_handler<R, N>(
    State(service): State<Arc<SubjectService<R, N>>>,
    Path((name, index)): Path<(String, usize)>,
) -> Response
where
    R: SubjectRepository + 'static,
    N: NoticePublisher + 'static,
{
    let name = SubjectName(name);
    match service.remove_grade(&name, index) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn calculate_handler<R, N>(
    State(service): State<Arc<SubjectService<R, N>>>,
    Path(name): Path<String>,
) -> Response
where
    R: SubjectRepository + 'static,
    N: NoticePublisher + 'static,
{
    let name = SubjectName(name);
    match service.calculate(&name) {
        Ok(result) => {
            let payload = json!({
                "name": name.0,
                "current_average": result.current_average,
                "total_percent_entered": result.total_percent_entered,
                "remaining_percent": result.remaining_percent,
                "required_grade": result.required_grade,
                "final_status": result.final_status.label(),
                "summary": result.summary(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: SubjectServiceError) -> Response {
    let (status, message) = match &error {
        SubjectServiceError::BlankName | SubjectServiceError::Ledger(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        SubjectServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, "subject not found".to_string())
        }
        SubjectServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, "subject already exists".to_string())
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
    };

    let payload = json!({ "error": message });
    (status, axum::Json(payload)).into_response()
}
