use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPlayerStore};
use crate::routes::with_player_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use radar_smr::config::AppConfig;
use radar_smr::error::AppError;
use radar_smr::telemetry;
use radar_smr::workflows::scouting::{JsonFilePlayerSource, PlayerRadarService, PlayerSource};
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

    let store = Arc::new(InMemoryPlayerStore::default());
    let radar_service = Arc::new(PlayerRadarService::new(
        store,
        config.eligibility.clone(),
    ));

    let mut refresh_source: Option<Arc<dyn PlayerSource>> = None;
    if let Some(seed) = args.seed.take() {
        let source = Arc::new(JsonFilePlayerSource::new(&seed));
        let report = radar_service.run_full_refresh(source.as_ref(), Local::now().date_naive())?;
        info!(
            seed = %seed.display(),
            created = report.ingest.created,
            merged = report.ingest.merged,
            now = report.assessment.now,
            what_if = report.assessment.what_if,
            "seeded player store"
        );
        refresh_source = Some(source as Arc<dyn PlayerSource>);
    }

    let app = with_player_routes(radar_service, refresh_source)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        target_nation = %config.eligibility.target_nation,
        "player radar ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
