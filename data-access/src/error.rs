use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Failure talking to the orders API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {status}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request body could not be built, so nothing was sent.
    #[error("Invalid order payload: {0}")]
    Payload(#[from] TotalsOverflow),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { source, .. } => source.status(),
            ApiError::Decode { .. } | ApiError::Payload(_) => None,
        }
    }
}

/// Order totals fell outside the range of [`rust_decimal::Decimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("order totals exceed the supported decimal range")]
pub struct TotalsOverflow;

/// Which store operation a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOperation {
    Load,
    Create,
    Update,
    Delete,
}

impl OrderOperation {
    /// Fixed message shown to the user when this operation fails.
    pub fn user_message(self) -> &'static str {
        match self {
            OrderOperation::Load => "An error occurred while loading orders.",
            OrderOperation::Create => "An error occurred while creating the order.",
            OrderOperation::Update => "An error occurred while updating the order.",
            OrderOperation::Delete => "An error occurred while deleting the order.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderOperation::Load => "load",
            OrderOperation::Create => "create",
            OrderOperation::Update => "update",
            OrderOperation::Delete => "delete",
        }
    }
}

/// A remote operation of the order store failed.
///
/// Displays as the operation's user message; the underlying [`ApiError`] is
/// kept as the source.
#[derive(Debug, Error)]
#[error("{}", .operation.user_message())]
pub struct StoreError {
    pub operation: OrderOperation,
    #[source]
    pub source: ApiError,
}
