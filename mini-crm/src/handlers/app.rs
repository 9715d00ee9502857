use crate::middleware::auth::SIGN_IN_PATH;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use serde_json::json;

pub async fn index() -> impl IntoResponse {
    Redirect::to(SIGN_IN_PATH)
}

/// Liveness check.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "mini-crm",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
