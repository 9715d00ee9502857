use super::RequestInterceptor;
use crate::services::auth::AuthService;
use reqwest::RequestBuilder;
use std::future::Future;
use std::sync::Arc;

tokio::task_local! {
    static REQUEST_TOKEN: Option<String>;
}

/// Run `future` with `token` as the bearer for every request it sends through
/// an [`AuthInterceptor`]. `None` sends no `Authorization` header.
///
/// Inside the scope the [`AuthService`] state is ignored, so a caller that
/// holds its own token is unaffected by sign-in or logout elsewhere.
pub async fn with_access_token<F: Future>(token: Option<String>, future: F) -> F::Output {
    REQUEST_TOKEN.scope(token, future).await
}

/// Adds `Authorization: Bearer <token>`.
///
/// The token comes from the enclosing [`with_access_token`] scope, or from
/// the [`AuthService`] outside of one.
pub struct AuthInterceptor {
    auth: Arc<AuthService>,
}

impl AuthInterceptor {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }

    fn current_token(&self) -> Option<String> {
        REQUEST_TOKEN
            .try_with(|token| token.clone())
            .unwrap_or_else(|_| self.auth.token())
    }
}

impl RequestInterceptor for AuthInterceptor {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        match self.current_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}
