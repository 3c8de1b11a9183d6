use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use homevision::config::GeminiConfig;
use homevision::designs::{InMemoryDesignRepository, RenovationService};
use homevision::gateway::{GatewayError, GeminiGateway};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type DesignService = RenovationService<InMemoryDesignRepository, GeminiGateway>;

/// Production wiring: Gemini for both model phases, designs kept in process memory.
pub(crate) fn build_design_service(
    config: &GeminiConfig,
) -> Result<Arc<DesignService>, GatewayError> {
    let gateway = Arc::new(GeminiGateway::new(config)?);
    let repository = Arc::new(InMemoryDesignRepository::default());
    Ok(Arc::new(RenovationService::new(repository, gateway)))
}
