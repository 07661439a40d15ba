use axum::Json;
use serde_json::json;

use crate::config::APP_VERSION;

/// GET /hello, liveness probe, no auth.
pub async fn hello() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Hello World",
        "version": APP_VERSION,
    }))
}
