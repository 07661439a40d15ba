//! HTTP surface of the tool gateway.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use super::client::BackendClient;
use super::registry::{dispatch, registry};

/// Build the gateway router.
pub fn tool_router(client: Arc<BackendClient>) -> Router {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/:name", post(call_tool))
        .with_state(client)
}

async fn list_tools() -> Json<Value> {
    Json(serde_json::json!({ "tools": registry() }))
}

async fn call_tool(
    State(client): State<Arc<BackendClient>>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> impl IntoResponse {
    if !registry().iter().any(|spec| spec.name == name) {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "status": "error",
                "message": format!("Unknown tool: {name}"),
            })),
        );
    }

    let args = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let result = dispatch(&client, &name, &args).await;
    (StatusCode::OK, Json(result))
}

/// Bind and serve the gateway until a shutdown signal arrives.
pub async fn serve(client: Arc<BackendClient>, addr: SocketAddr) -> std::io::Result<()> {
    let app = tool_router(client);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Tool gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
    }
}
