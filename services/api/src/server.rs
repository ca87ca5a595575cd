use crate::cli::ServeArgs;
use crate::infra::{cors_layer, shutdown_signal, AppState};
use crate::routes::with_operational_routes;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use wellness_intake::config::AppConfig;
use wellness_intake::error::AppError;
use wellness_intake::intake::store;
use wellness_intake::intake::{intake_router, IntakeService, LogNotifier, RecordStore};
use wellness_intake::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;
    info!("starting wellness intake api");

    let store = Arc::new(store::connect(&config.store).await?);
    let service = Arc::new(IntakeService::new(store.clone(), Arc::new(LogNotifier)));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_operational_routes(intake_router(service), app_state, cors_layer(&config.cors))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, backend = store.backend(), "wellness intake api ready");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    readiness_flag.store(false, Ordering::Release);
    store.close().await;
    info!("wellness intake api shut down");

    served?;
    Ok(())
}
