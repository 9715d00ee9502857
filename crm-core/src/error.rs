use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Bad Gateway: {0}")]
    BadGateway(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::SessionError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show in a page. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(err) | AppError::NotFound(err) => err.to_string(),
            AppError::BadGateway(msg) => msg.clone(),
            AppError::SessionError(_) | AppError::InternalError(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }

        let message = self.public_message();
        match (ErrorAlert { message: &message }).render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error alert");
                status.into_response()
            }
        }
    }
}

/// Alert fragment returned in place of the page when a handler fails.
#[derive(Template)]
#[template(
    source = r#"<p class="alert alert-danger">{{ message }}</p>"#,
    ext = "html"
)]
struct ErrorAlert<'a> {
    message: &'a str,
}
