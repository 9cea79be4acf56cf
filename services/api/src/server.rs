use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_workshop_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use oficina_vital::config::AppConfig;
use oficina_vital::error::AppError;
use oficina_vital::telemetry;
use oficina_vital::workshop::{InMemoryRegistry, ValidationPolicy, WorkshopService};
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

    let registry = Arc::new(InMemoryRegistry::new());
    let policy = ValidationPolicy::from(&config.validation);
    let service = Arc::new(WorkshopService::new(registry, policy));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        workshop: service.clone(),
    };

    let app = with_workshop_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        mileage_hard_gap = policy.mileage_hard_gap,
        "oficina vital service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
