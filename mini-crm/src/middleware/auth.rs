use crate::models::user::ACCESS_TOKEN_KEY;
use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use data_access::with_access_token;
use tower_sessions::Session;

pub const SIGN_IN_PATH: &str = "/auth/sign-in";
pub const DEFAULT_LANDING_PATH: &str = "/orders";

/// Route guard for the orders pages.
///
/// Anonymous visitors are sent to the sign-in page with the requested URL
/// preserved as `returnUrl`. Signed-in requests call the orders API with the
/// token stored in their own session.
pub async fn require_auth(session: Session, request: Request<Body>, next: Next) -> Response {
    let access_token: Option<String> = session.get(ACCESS_TOKEN_KEY).await.unwrap_or(None);

    match access_token {
        Some(token) => with_access_token(Some(token), next.run(request)).await,
        None => {
            let target = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            tracing::debug!(target = %target, "Unauthenticated request redirected to sign-in");
            sign_in_redirect(target)
        }
    }
}

pub fn sign_in_redirect(return_url: &str) -> Response {
    let query = serde_urlencoded::to_string([("returnUrl", return_url)]).unwrap_or_default();
    if query.is_empty() {
        return Redirect::to(SIGN_IN_PATH).into_response();
    }
    Redirect::to(&format!("{}?{}", SIGN_IN_PATH, query)).into_response()
}

/// Only same-site absolute paths are followed after sign-in.
pub fn is_safe_return_url(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.starts_with("/\\")
}

/// Where to go once signed in.
pub fn landing_path(return_url: Option<&str>) -> &str {
    return_url
        .filter(|url| is_safe_return_url(url))
        .unwrap_or(DEFAULT_LANDING_PATH)
}
