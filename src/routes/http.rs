// GET handlers: version, containers, per-container series, charts

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use super::AppState;
use crate::models::{Chart, ChartKind, DownsampledPoint, Metric};
use crate::usage_repo::QueryError;

/// GET /version: service name and version baked in from Cargo.toml.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /containers: container names seen in the retained log window, alphabetical.
pub(super) async fn containers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, QueryError> {
    Ok(Json(state.usage_repo.container_names().await?))
}

/// GET /containers/{name}/cpu and /containers/{name}/memory
pub(super) async fn container_metric_handler(
    State(state): State<AppState>,
    Path((name, resource)): Path<(String, String)>,
) -> Result<Json<Vec<DownsampledPoint>>, QueryError> {
    let metric =
        Metric::from_path(&resource, None).ok_or_else(|| QueryError::UnknownMetric(resource))?;
    Ok(Json(state.usage_repo.metric_series(&name, metric).await?))
}

/// GET /containers/{name}/io/{read|write} and /containers/{name}/net/{recv|send}
pub(super) async fn container_directional_metric_handler(
    State(state): State<AppState>,
    Path((name, resource, direction)): Path<(String, String, String)>,
) -> Result<Json<Vec<DownsampledPoint>>, QueryError> {
    let metric = Metric::from_path(&resource, Some(&direction))
        .ok_or_else(|| QueryError::UnknownMetric(format!("{resource}/{direction}")))?;
    Ok(Json(state.usage_repo.metric_series(&name, metric).await?))
}

/// GET /charts/{kind}: every container's datasets for one chart, or `{"state":"noData"}`.
pub(super) async fn chart_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Chart>, QueryError> {
    let kind = ChartKind::parse(&kind).ok_or(QueryError::UnknownChart(kind))?;
    Ok(Json(state.usage_repo.chart(kind).await?))
}
