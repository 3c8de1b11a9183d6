use crate::cli::ServeArgs;
use crate::infra::{build_design_service, AppState};
use crate::routes::{cors_layer, with_design_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use homevision::config::AppConfig;
use homevision::error::AppError;
use homevision::telemetry;
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

    let design_service = build_design_service(&config.gemini)?;

    let app = with_design_routes(design_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(cors_layer());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        image_model = %config.gemini.image_model,
        vision_model = %config.gemini.vision_model,
        "renovation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
