mod common;

use axum::http::StatusCode;
use common::{body_text, location, order, TestApp};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_list(server: &MockServer, orders: Value) {
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders))
        .mount(server)
        .await;
}

async fn body_of(server: &MockServer, http_method: &str) -> Value {
    let requests = server.received_requests().await.unwrap();
    let request = requests
        .iter()
        .find(|r| r.method.as_str() == http_method)
        .expect("request not received");
    serde_json::from_slice(&request.body).unwrap()
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn list_renders_formatted_orders() {
    let server = MockServer::start().await;
    mock_list(&server, json!([order(1, "Acme", 5, 500)])).await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app.get("/orders", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Acme"));
    assert!(body.contains("500,00\u{a0}€"));
    assert!(body.contains("2\u{202f}500,00\u{a0}€"));
    assert!(body.contains("3\u{202f}000,00\u{a0}€"));
    assert!(body.contains("20\u{a0}%"));
}

#[tokio::test]
async fn list_shows_load_error_banner() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app.get("/orders", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("An error occurred while loading orders."));
}

#[tokio::test]
async fn orders_api_calls_carry_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header("authorization", "Bearer mock-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app.get("/orders", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn add_form_starts_with_defaults() {
    let app = TestApp::new("http://127.0.0.1:9");
    let cookie = app.sign_in().await;

    let response = app.get("/orders/add", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(r#"name="nbDays" type="number" min="1" step="1" value="1""#));
    assert!(body.contains(r#"value="20""#));
    assert!(body.contains("0,00\u{a0}€"));
}

#[tokio::test]
async fn add_rejects_invalid_input_without_calling_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app
        .post_form(
            "/orders/add",
            "customer=A&nbDays=0&tjm=-5&tauxTva=150",
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("Customer name must be at least 2 characters"));
    assert!(body.contains("Number of days must be at least 1"));
    assert!(body.contains("Daily rate cannot be negative"));
    assert!(body.contains("VAT rate must be between 0 and 100"));
}

#[tokio::test]
async fn add_rejects_a_rate_too_large_to_total() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app
        .post_form(
            "/orders/add",
            "customer=Acme&nbDays=2&tjm=79228162514264337593543950335&tauxTva=20",
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("Daily rate cannot exceed 1000000"));
}

#[tokio::test]
async fn add_posts_computed_totals_and_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(order(1, "Acme", 5, 500)))
        .expect(1)
        .mount(&server)
        .await;
    mock_list(&server, json!([order(1, "Acme", 5, 500)])).await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app
        .post_form(
            "/orders/add",
            "customer=Acme&nbDays=5&tjm=500&tauxTva=20",
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/orders");

    let body = body_of(&server, "POST").await;
    assert_eq!(body["customer"], "Acme");
    assert_eq!(body["nbDays"], 5);
    assert_eq!(body["totalHt"].as_f64(), Some(2500.0));
    assert_eq!(body["totalTtc"].as_f64(), Some(3000.0));
    assert!(body.get("id").is_none());

    assert_eq!(app.state.orders.orders().len(), 1);
}

#[tokio::test]
async fn add_failure_keeps_the_form_and_shows_the_store_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app
        .post_form(
            "/orders/add",
            "customer=Acme&nbDays=5&tjm=500&tauxTva=20",
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_text(response).await;
    assert!(body.contains("An error occurred while creating the order."));
    assert!(body.contains(r#"value="Acme""#));
}

// =============================================================================
// Edit
// =============================================================================

#[tokio::test]
async fn edit_form_is_prefilled() {
    let server = MockServer::start().await;
    mock_list(&server, json!([order(1, "Acme", 5, 500)])).await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app.get("/orders/edit/1", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(r#"value="Acme""#));
    assert!(body.contains(r#"value="5""#));
    assert!(body.contains(r#"value="500""#));
    assert!(body.contains("3\u{202f}000,00\u{a0}€"));
}

#[tokio::test]
async fn edit_unknown_order_is_not_found() {
    let server = MockServer::start().await;
    mock_list(&server, json!([order(1, "Acme", 5, 500)])).await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app.get("/orders/edit/99", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Order not found"));
}

#[tokio::test]
async fn edit_without_id_is_rejected() {
    let app = TestApp::new("http://127.0.0.1:9");
    let cookie = app.sign_in().await;

    let response = app.get("/orders/edit/0", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Missing order id"));
}

#[tokio::test]
async fn edit_puts_recomputed_totals() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/orders/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order(1, "Acme", 3, 600)))
        .expect(1)
        .mount(&server)
        .await;
    mock_list(&server, json!([order(1, "Acme", 5, 500)])).await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app
        .post_form(
            "/orders/edit/1",
            "customer=Acme&nbDays=3&tjm=600&tauxTva=10",
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/orders");

    let body = body_of(&server, "PUT").await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["totalHt"].as_f64(), Some(1800.0));
    assert_eq!(body["totalTtc"].as_f64(), Some(1980.0));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_confirmation_opens_over_the_list() {
    let server = MockServer::start().await;
    mock_list(&server, json!([order(1, "Acme", 5, 500)])).await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app.get("/orders/1/delete", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Delete order"));
    assert!(body.contains("role=\"dialog\""));
    assert!(body.contains("Acme"));
}

#[tokio::test]
async fn list_without_confirmation_has_no_dialog() {
    let server = MockServer::start().await;
    mock_list(&server, json!([order(1, "Acme", 5, 500)])).await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let body = body_text(app.get("/orders", Some(&cookie)).await).await;

    assert!(!body.contains("role=\"dialog\""));
}

#[tokio::test]
async fn delete_calls_the_api_and_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/orders/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    mock_list(&server, json!([])).await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;

    let response = app.post_form("/orders/1/delete", "", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/orders");
}

#[tokio::test]
async fn failed_delete_is_reported_on_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/orders/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mock_list(&server, json!([order(1, "Acme", 5, 500)])).await;
    let app = TestApp::new(&server.uri());
    let cookie = app.sign_in().await;
    app.get("/orders", Some(&cookie)).await;

    let response = app.post_form("/orders/1/delete", "", Some(&cookie)).await;
    assert_eq!(location(&response), "/orders");

    let body = body_text(app.get("/orders", Some(&cookie)).await).await;
    assert!(body.contains("An error occurred while deleting the order."));
    assert!(body.contains("Acme"));
}
