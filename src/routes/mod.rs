// HTTP routes

mod http;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::usage_repo::{QueryError, UsageRepo};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) usage_repo: Arc<UsageRepo>,
}

pub fn app(usage_repo: Arc<UsageRepo>) -> Router {
    let state = AppState { usage_repo };
    Router::new()
        .route("/", get(|| async { "cephylas: container usage charts" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/containers", get(http::containers_handler)) // GET /containers
        .route(
            "/containers/{name}/{resource}",
            get(http::container_metric_handler),
        ) // GET /containers/{name}/cpu|memory
        .route(
            "/containers/{name}/{resource}/{direction}",
            get(http::container_directional_metric_handler),
        ) // GET /containers/{name}/io/read|write, /containers/{name}/net/recv|send
        .route("/charts/{kind}", get(http::chart_handler)) // GET /charts/cpu|memory|io|net
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = match &self {
            QueryError::Read(e) => {
                tracing::warn!(error = %e, operation = "read_log", "usage query failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            QueryError::UnknownContainer(_)
            | QueryError::UnknownMetric(_)
            | QueryError::UnknownChart(_) => StatusCode::NOT_FOUND,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
