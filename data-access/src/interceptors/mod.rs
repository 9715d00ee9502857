pub mod auth;

pub use auth::{with_access_token, AuthInterceptor};

use reqwest::RequestBuilder;

/// Decorates outgoing requests before they are sent.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder;
}
