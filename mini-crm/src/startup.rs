//! Application startup: state wiring, router and server lifecycle.

use crate::config::Settings;
use crate::handlers::{
    app::{health_check, index},
    auth::{logout_handler, sign_in_handler, sign_in_page, sign_up_handler, sign_up_page},
    metrics::metrics,
    orders::{
        add_order_handler, add_order_page, confirm_delete_page, delete_order_handler,
        edit_order_handler, edit_order_page, list_orders,
    },
};
use crate::middleware::require_auth;
use crate::AppState;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use crm_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use crm_core::observability::{extract_request_id, extract_traceparent};
use data_access::{ApiClient, AuthInterceptor, AuthService, OrderStore};
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::Key, Expiry, MemoryStore, SessionManagerLayer};

/// Derive the cookie signing key from the configured secret.
pub fn session_key(secret: &Secret<String>) -> anyhow::Result<Key> {
    Key::try_from(secret.expose_secret().as_bytes())
        .map_err(|e| anyhow::anyhow!("session_secret must be at least 64 bytes: {}", e))
}

/// Wire the auth service into the order store's HTTP client.
pub fn build_state(settings: &Settings) -> AppState {
    let auth = Arc::new(AuthService::new(settings.auth.mock_delay()));
    let api_config = settings.api.api_config();
    let client =
        ApiClient::new(&api_config).with_interceptor(Arc::new(AuthInterceptor::new(auth.clone())));
    let orders = Arc::new(OrderStore::new(client, &api_config));

    AppState::new(orders, auth)
}

pub fn build_router(state: AppState, session_key: Key, secure_cookies: bool) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)))
        .with_signed(session_key);

    let orders = Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/add", get(add_order_page).post(add_order_handler))
        .route(
            "/orders/edit/:id",
            get(edit_order_page).post(edit_order_handler),
        )
        .route(
            "/orders/:id/delete",
            get(confirm_delete_page).post(delete_order_handler),
        )
        .route_layer(from_fn(require_auth));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/auth/sign-in", get(sign_in_page).post(sign_in_handler))
        .route("/auth/sign-up", get(sign_up_page).post(sign_up_handler))
        .route("/auth/logout", post(logout_handler))
        .merge(orders)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = extract_request_id(request.headers()).unwrap_or_default();
                let traceparent = extract_traceparent(request.headers()).unwrap_or_default();

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    traceparent = %traceparent,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Bind the listener and assemble the router. Port 0 picks a free port.
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let state = build_state(&settings);
        let key = session_key(&settings.server.session_secret)?;
        let router = build_router(state, key, settings.server.secure_cookies);

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port = port,
            api_url = %settings.api.url,
            "mini-crm configured"
        );

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        tracing::info!("Starting mini-crm on port {}", self.port);
        axum::serve(self.listener, self.router).await.map_err(|e| {
            tracing::error!("Server error: {}", e);
            anyhow::anyhow!("Server error: {}", e)
        })
    }
}
