use crate::middleware::auth::sign_in_redirect;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const USER_ID_KEY: &str = "user_id";
pub const EMAIL_KEY: &str = "email";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
}

impl UserProfile {
    pub fn name(&self) -> String {
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => "User".to_string(),
        }
    }

    pub fn initials(&self) -> String {
        let initials: String = self.name().chars().take(2).collect();
        initials.to_uppercase()
    }
}

/// Signed-in operator, read from the session.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: i64,
    pub profile: UserProfile,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract session",
                )
                    .into_response()
            })?;

        let token: Option<String> = session.get(ACCESS_TOKEN_KEY).await.unwrap_or(None);
        let user_id: Option<i64> = session.get(USER_ID_KEY).await.unwrap_or(None);
        let email: Option<String> = session.get(EMAIL_KEY).await.unwrap_or(None);

        match (token, email) {
            (Some(_), Some(email)) => Ok(CurrentUser {
                user_id: user_id.unwrap_or_default(),
                profile: UserProfile { email },
            }),
            _ => {
                let target = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                Err(sign_in_redirect(target))
            }
        }
    }
}
