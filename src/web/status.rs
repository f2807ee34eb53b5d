//! Health and status handlers.

use axum::response::Json;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::trace;
use ts_rs::TS;

#[derive(Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatusResponse {
    pub version: String,
    pub commit: String,
}

/// `GET /health`.
pub(super) async fn health() -> Json<Value> {
    trace!("health check requested");
    Json(json!({ "status": "healthy" }))
}

/// `GET /status` -- build identity, for deploy verification.
pub(super) async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: env!("GIT_COMMIT_HASH").to_string(),
    })
}
