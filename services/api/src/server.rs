use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryNoticePublisher, InMemorySubjectRepository};
use crate::routes::with_subject_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use passmark::config::AppConfig;
use passmark::error::AppError;
use passmark::grading::subjects::SubjectService;
use passmark::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemorySubjectRepository::default());
    let notices = Arc::new(InMemoryNoticePublisher::default());
    let subject_service = Arc::new(SubjectService::new(
        repository,
        notices,
        config.grading.approval_settings(),
    ));

    let app = with_subject_routes(subject_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "grade approval service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
