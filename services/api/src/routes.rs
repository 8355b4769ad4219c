use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use radar_smr::workflows::scouting::{
    player_router, PlayerRadarService, PlayerSource, PlayerStore,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_player_routes<S>(
    service: Arc<PlayerRadarService<S>>,
    source: Option<Arc<dyn PlayerSource>>,
) -> axum::Router
where
    S: PlayerStore + 'static,
{
    player_router(service, source)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryPlayerStore;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use radar_smr::workflows::scouting::{EligibilityRules, PlayerRecord};
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    fn app(state: AppState) -> (axum::Router, Arc<PlayerRadarService<InMemoryPlayerStore>>) {
        let service = Arc::new(PlayerRadarService::new(
            Arc::new(InMemoryPlayerStore::default()),
            EligibilityRules::san_marino(),
        ));
        let router = with_player_routes(service.clone(), None).layer(Extension(state));
        (router, service)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds")
    }

    #[tokio::test]
    async fn readiness_tracks_flag() {
        let state = app_state(false);
        let (router, _service) = app(state.clone());

        let response = router
            .clone()
            .oneshot(get("/ready"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = router.oneshot(get("/ready")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_metrics_respond() {
        let (router, _service) = app(app_state(true));

        let response = router
            .clone()
            .oneshot(get("/health"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(get("/metrics")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn player_routes_are_mounted() {
        let (router, service) = app(app_state(true));
        let mut profile = PlayerRecord::named("Filippo Berardi");
        profile.nationality = radar_smr::workflows::scouting::CountryCode::parse("SMR");
        service.ingest(profile).expect("ingest");

        let response = router
            .oneshot(get("/api/players"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        let players: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(players[0]["name"], "Filippo Berardi");
        assert_eq!(players[0]["rationale"], "pending assessment");
    }
}
