use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryAdvisingStore};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use study_compass::advising::AdvisingService;
use study_compass::config::AppConfig;
use study_compass::error::AppError;
use study_compass::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.catalog_csv.take() {
        config.catalog.csv_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(config.catalog.csv_path.as_deref())?;
    info!(
        universities = catalog.len(),
        source = ?config.catalog.csv_path,
        "university catalog loaded"
    );

    let store = Arc::new(InMemoryAdvisingStore::with_catalog(catalog));
    let advising_service = Arc::new(AdvisingService::new(store));

    let app = with_platform_routes(advising_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "study compass advising service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
