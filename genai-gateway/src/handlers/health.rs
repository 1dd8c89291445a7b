use axum::{Json, response::IntoResponse};
use serde_json::json;

pub async fn index() -> &'static str {
    "Hello World!"
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "genai-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
