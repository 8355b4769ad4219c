use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{parse_date, PlayerId};
use super::export::to_csv_string;
use super::repository::{PlayerStore, PlayerSummaryView, StoreError};
use super::service::{PlayerRadarService, ServiceError};
use super::source::PlayerSource;
use crate::error::AppError;

/// Shared handler state: the radar service plus the pipeline used by `/api/run/refresh`.
pub struct RadarState<S> {
    service: Arc<PlayerRadarService<S>>,
    source: Option<Arc<dyn PlayerSource>>,
}

impl<S> Clone for RadarState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            source: self.source.clone(),
        }
    }
}

/// Router builder exposing the player listing, detail, assessment, refresh, and export
/// endpoints. Without a `source`, refresh answers 503.
pub fn player_router<S>(
    service: Arc<PlayerRadarService<S>>,
    source: Option<Arc<dyn PlayerSource>>,
) -> Router
where
    S: PlayerStore + 'static,
{
    Router::new()
        .route("/api/players", get(list_handler::<S>))
        .route("/api/players/:player_id", get(detail_handler::<S>))
        .route(
            "/api/run/legal-assessment",
            post(run_assessment_handler::<S>),
        )
        .route("/api/run/refresh", post(refresh_handler::<S>))
        .route("/api/export", get(export_handler::<S>))
        .with_state(RadarState { service, source })
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RunParams {
    #[serde(default)]
    as_of: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportParams {
    #[serde(default)]
    format: Option<String>,
}

pub(crate) async fn list_handler<S>(
    State(state): State<RadarState<S>>,
) -> Result<Response, AppError>
where
    S: PlayerStore + 'static,
{
    let views: Vec<PlayerSummaryView> = state
        .service
        .list()?
        .iter()
        .map(|player| player.summary_view())
        .collect();
    Ok((StatusCode::OK, axum::Json(views)).into_response())
}

pub(crate) async fn detail_handler<S>(
    State(state): State<RadarState<S>>,
    Path(player_id): Path<String>,
) -> Result<Response, AppError>
where
    S: PlayerStore + 'static,
{
    let id = PlayerId(player_id);
    match state.service.get(&id) {
        Ok(player) => Ok((StatusCode::OK, axum::Json(player)).into_response()),
        Err(ServiceError::Store(StoreError::NotFound)) => {
            let payload = json!({
                "error": "player not found",
                "player_id": id.0,
            });
            Ok((StatusCode::NOT_FOUND, axum::Json(payload)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn run_assessment_handler<S>(
    State(state): State<RadarState<S>>,
    Query(params): Query<RunParams>,
) -> Result<Response, AppError>
where
    S: PlayerStore + 'static,
{
    let as_of = match evaluation_date(&params) {
        Ok(date) => date,
        Err(rejection) => return Ok(rejection),
    };

    let report = state.service.run_legal_assessment(as_of)?;
    Ok((StatusCode::OK, axum::Json(report)).into_response())
}

pub(crate) async fn refresh_handler<S>(
    State(state): State<RadarState<S>>,
    Query(params): Query<RunParams>,
) -> Result<Response, AppError>
where
    S: PlayerStore + 'static,
{
    let as_of = match evaluation_date(&params) {
        Ok(date) => date,
        Err(rejection) => return Ok(rejection),
    };

    let Some(source) = state.source.as_deref() else {
        let payload = json!({ "error": "no player source configured" });
        return Ok((StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response());
    };

    let report = state.service.run_full_refresh(source, as_of)?;
    Ok((StatusCode::OK, axum::Json(report)).into_response())
}

pub(crate) async fn export_handler<S>(
    State(state): State<RadarState<S>>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError>
where
    S: PlayerStore + 'static,
{
    let players = state.service.list()?;

    match params.format.as_deref().unwrap_or("json") {
        "json" => Ok((StatusCode::OK, axum::Json(players)).into_response()),
        "csv" => {
            let body = to_csv_string(&players)?;
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"players.csv\"",
                    ),
                ],
                body,
            )
                .into_response())
        }
        other => {
            let payload = json!({
                "error": format!("unsupported export format '{other}'"),
            });
            Ok((StatusCode::BAD_REQUEST, axum::Json(payload)).into_response())
        }
    }
}

fn evaluation_date(params: &RunParams) -> Result<NaiveDate, Response> {
    match params.as_of.as_deref() {
        Some(raw) => parse_date(raw).ok_or_else(|| {
            let payload = json!({
                "error": format!("'{raw}' is not a valid YYYY-MM-DD date"),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }),
        None => Ok(Local::now().date_naive()),
    }
}
