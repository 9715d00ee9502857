//! Mock authentication.
//!
//! There is no identity backend: signing in or up waits a fixed delay and
//! then fabricates a token and user from the submitted email. The current
//! token is what [`crate::interceptors::AuthInterceptor`] attaches to API
//! calls.

use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};
use std::time::Duration;
use tokio::sync::watch;

pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(500);

const SIGN_IN_USER_ID: i64 = 1;
const SIGN_UP_USER_ID: i64 = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<User>,
}

pub struct AuthService {
    state: watch::Sender<AuthState>,
    delay: Duration,
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_DELAY)
    }
}

impl AuthService {
    pub fn new(delay: Duration) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { state, delay }
    }

    pub async fn sign_in(&self, credentials: &LoginRequest) -> AuthResponse {
        self.authenticate(SIGN_IN_USER_ID, &credentials.email).await
    }

    pub async fn sign_up(&self, credentials: &RegisterRequest) -> AuthResponse {
        self.authenticate(SIGN_UP_USER_ID, &credentials.email).await
    }

    pub fn logout(&self) {
        self.state.send_replace(AuthState::default());
        tracing::info!("User logged out");
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().token.is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    async fn authenticate(&self, user_id: i64, email: &str) -> AuthResponse {
        tokio::time::sleep(self.delay).await;

        let response = AuthResponse {
            access_token: MOCK_ACCESS_TOKEN.to_string(),
            user: User {
                id: Some(user_id),
                email: email.to_string(),
            },
        };

        self.state.send_replace(AuthState {
            token: Some(response.access_token.clone()),
            user: Some(response.user.clone()),
        });

        tracing::info!(user_id = user_id, email = %email, "User authenticated");
        response
    }
}
