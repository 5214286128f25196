use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use passmark::grading::import::GradeSheetImporter;
use passmark::grading::subjects::{
    subject_router, ApprovalCalculator, ApprovalSettings, GradeLedger, NoticePublisher,
    RequiredGrade, SubjectRepository, SubjectService,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationRequest {
    #[serde(default)]
    pub(crate) entries: Vec<GradeEntryPayload>,
    #[serde(default)]
    pub(crate) grades_csv: Option<String>,
    #[serde(default)]
    pub(crate) settings: Option<SettingsPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GradeEntryPayload {
    pub(crate) grade: f64,
    pub(crate) weight_percent: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SettingsPayload {
    pub(crate) min_accept_value: f64,
    pub(crate) min_value: f64,
    pub(crate) max_value: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationResponse {
    pub(crate) data_source: EvaluationDataSource,
    pub(crate) current_average: f64,
    pub(crate) total_percent_entered: f64,
    pub(crate) remaining_percent: f64,
    pub(crate) required_grade: RequiredGrade,
    pub(crate) final_status: &'static str,
    pub(crate) summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum EvaluationDataSource {
    Inline,
    GradeSheet,
}

pub(crate) fn with_subject_routes<R, N>(service: Arc<SubjectService<R, N>>) -> axum::Router
where
    R: SubjectRepository + 'static,
    N: NoticePublisher + 'static,
{
    subject_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/evaluation",
            axum::routing::post(evaluation_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// One-shot projection without persistence: the caller supplies entries
/// inline or as a grade-sheet CSV, plus optional scale settings.
pub(crate) async fn evaluation_endpoint(Json(payload): Json<EvaluationRequest>) -> Response {
    let EvaluationRequest {
        entries,
        grades_csv,
        settings,
    } = payload;

    let settings = settings
        .map(|raw| ApprovalSettings::new(raw.min_accept_value, raw.min_value, raw.max_value))
        .unwrap_or_default();

    let (ledger, data_source) = if let Some(csv) = grades_csv {
        match GradeSheetImporter::from_reader(Cursor::new(csv.into_bytes()), settings) {
            Ok(ledger) => (ledger, EvaluationDataSource::GradeSheet),
            Err(error) => {
                let body = Json(json!({ "error": error.to_string() }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
        }
    } else {
        let mut ledger = GradeLedger::new(settings);
        for entry in &entries {
            if let Err(error) = ledger.add_entry(entry.grade, entry.weight_percent) {
                let body = Json(json!({ "error": error.to_string() }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
        }
        (ledger, EvaluationDataSource::Inline)
    };

    match ApprovalCalculator::new(settings).evaluate(&ledger) {
        Ok(result) => {
            let response = EvaluationResponse {
                data_source,
                current_average: result.current_average,
                total_percent_entered: result.total_percent_entered,
                remaining_percent: result.remaining_percent,
                required_grade: result.required_grade,
                final_status: result.final_status.label(),
                summary: result.summary(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(error) => {
            let body = Json(json!({ "error": error.to_string() }));
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passmark::grading::subjects::ApprovalStatus;

    async fn response_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 16)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn evaluation_endpoint_projects_inline_entries() {
        let request = EvaluationRequest {
            entries: vec![GradeEntryPayload {
                grade: 2.0,
                weight_percent: 50.0,
            }],
            grades_csv: None,
            settings: None,
        };

        let response = evaluation_endpoint(Json(request)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = response_json(response).await;
        assert_eq!(payload.get("data_source"), Some(&serde_json::json!("inline")));
        assert_eq!(
            payload.get("required_grade"),
            Some(&serde_json::json!({ "Value": 4.0 }))
        );
        assert_eq!(
            payload.get("final_status"),
            Some(&serde_json::json!(ApprovalStatus::AtRisk.label()))
        );
    }

    #[tokio::test]
    async fn evaluation_endpoint_accepts_grade_sheets() {
        let request = EvaluationRequest {
            entries: Vec::new(),
            grades_csv: Some("Grade,Percentage\n4.5,20\n".to_string()),
            settings: None,
        };

        let response = evaluation_endpoint(Json(request)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = response_json(response).await;
        assert_eq!(
            payload.get("data_source"),
            Some(&serde_json::json!("grade_sheet"))
        );
        assert_eq!(
            payload.get("current_average"),
            Some(&serde_json::json!(0.9))
        );
    }

    #[tokio::test]
    async fn evaluation_endpoint_rejects_invalid_inline_entries() {
        let request = EvaluationRequest {
            entries: vec![GradeEntryPayload {
                grade: -1.0,
                weight_percent: 20.0,
            }],
            grades_csv: None,
            settings: None,
        };

        let response = evaluation_endpoint(Json(request)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn evaluation_endpoint_honors_custom_settings() {
        let request = EvaluationRequest {
            entries: vec![GradeEntryPayload {
                grade: 5.0,
                weight_percent: 40.0,
            }],
            grades_csv: None,
            settings: Some(SettingsPayload {
                min_accept_value: 6.0,
                min_value: 0.0,
                max_value: 10.0,
            }),
        };

        let response = evaluation_endpoint(Json(request)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let payload = response_json(response).await;
        assert_eq!(
            payload.get("required_grade"),
            Some(&serde_json::json!({ "Value": 6.7 }))
        );
    }
}
