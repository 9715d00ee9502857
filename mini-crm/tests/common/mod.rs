#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use data_access::{ApiClient, ApiConfig, AuthInterceptor, AuthService, Order, OrderStore};
use mini_crm::startup::{build_router, session_key};
use mini_crm::AppState;
use rust_decimal::Decimal;
use secrecy::Secret;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Router wired to an orders API at `api_url`, with an instant mock sign-in.
    pub fn new(api_url: &str) -> Self {
        let auth = Arc::new(AuthService::new(Duration::ZERO));
        let config = ApiConfig::new(api_url);
        let client =
            ApiClient::new(&config).with_interceptor(Arc::new(AuthInterceptor::new(auth.clone())));
        let orders = Arc::new(OrderStore::new(client, &config));
        let state = AppState::new(orders, auth);

        let key = session_key(&Secret::new("s".repeat(64))).expect("valid test key");
        let router = build_router(state.clone(), key, false);

        Self { router, state }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// Sign in through the form and return the session cookie.
    pub async fn sign_in(&self) -> String {
        let response = self
            .post_form(
                "/auth/sign-in",
                "email=test%40example.com&password=password123",
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie(&response).expect("sign-in should set a session cookie")
    }
}

pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn order(id: i64, customer: &str, nb_days: i32, tjm: i64) -> Order {
    let totals = data_access::calculate_totals(nb_days, Decimal::from(tjm), Decimal::from(20))
        .unwrap();
    Order {
        id,
        customer: customer.to_string(),
        nb_days,
        tjm: Decimal::from(tjm),
        taux_tva: Decimal::from(20),
        total_ht: totals.total_ht,
        total_ttc: totals.total_ttc,
    }
}
