//! HTTP tests for the checkout endpoint.
//!
//! Runs the real handler, extractors, and session layer over in-memory
//! stores and a canned payment provider; no Postgres or Stripe involved.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::{get, post},
};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use caseforge_checkout::db::memory::{
    MemoryConfigurationStore, MemoryOrderStore, MemoryUserStore,
};
use caseforge_checkout::middleware::set_current_user;
use caseforge_checkout::models::{Configuration, CurrentUser};
use caseforge_checkout::payments::{
    CheckoutSessionSpec, CreatedProduct, HostedCheckout, PaymentError, PaymentProvider,
    ProductSpec,
};
use caseforge_checkout::pricing::PriceTable;
use caseforge_checkout::routes::checkout::create_checkout_session;
use caseforge_checkout::services::{CheckoutService, CheckoutSettings};
use caseforge_core::{CurrencyCode, Finish, Material};

/// Payment provider answering every call with canned references.
struct CannedPayments;

#[async_trait]
impl PaymentProvider for CannedPayments {
    async fn create_product(&self, _spec: &ProductSpec) -> Result<CreatedProduct, PaymentError> {
        Ok(CreatedProduct {
            id: "prod_test".to_string(),
            default_price: "price_test".to_string(),
        })
    }

    async fn create_checkout_session(
        &self,
        _spec: &CheckoutSessionSpec,
    ) -> Result<HostedCheckout, PaymentError> {
        Ok(HostedCheckout {
            id: "cs_test".to_string(),
            url: "https://checkout.stripe.test/c/cs_test".to_string(),
        })
    }
}

/// Login endpoint standing in for the identity provider's flow.
async fn login(session: Session) -> StatusCode {
    let user = CurrentUser {
        id: "kp_user_1".to_string(),
        email: "buyer@example.com".to_string(),
    };
    match set_current_user(&session, &user).await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

struct TestApp {
    router: Router,
    configurations: MemoryConfigurationStore,
    orders: MemoryOrderStore,
}

fn test_app() -> TestApp {
    let configurations = MemoryConfigurationStore::new();
    let orders = MemoryOrderStore::new();

    let settings = CheckoutSettings {
        base_url: "https://shop.test".to_string(),
        currency: CurrencyCode::USD,
        pricing: PriceTable {
            base_cents: 1400,
            textured_finish_cents: 300,
            polycarbonate_material_cents: 500,
        },
        product_name: "Custom iPhone Case".to_string(),
        allowed_shipping_countries: vec!["DE".to_string(), "US".to_string()],
    };

    let service = CheckoutService::new(
        Arc::new(configurations.clone()),
        Arc::new(MemoryUserStore::new()),
        Arc::new(orders.clone()),
        Arc::new(CannedPayments),
        settings,
    );

    let session_layer = SessionManagerLayer::new(MemoryStore::default());

    let router = Router::new()
        .route("/api/checkout", post(create_checkout_session))
        .route("/test/login", get(login))
        .layer(session_layer)
        .with_state(service);

    TestApp {
        router,
        configurations,
        orders,
    }
}

async fn seed_configuration(app: &TestApp, id: &str) {
    app.configurations
        .insert(Configuration {
            id: id.to_string(),
            finish: Finish::Plain,
            material: Material::Silicone,
            image_url: format!("https://img.test/{id}.png"),
        })
        .await;
}

/// Log in and return the session cookie to replay on later requests.
async fn login_cookie(app: &TestApp) -> String {
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/test/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set a session cookie")
        .to_str()
        .unwrap();

    // Only the name=value pair is replayed.
    set_cookie.split(';').next().unwrap().to_string()
}

fn checkout_request(body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/checkout")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_config_id_is_bad_request() {
    let app = test_app();
    let cookie = login_cookie(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(checkout_request("{}", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("configId"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request_with_json_error() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(checkout_request("not json", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_configuration_is_not_found() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(checkout_request(r#"{"configId":"missing"}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No such configuration found");
}

#[tokio::test]
async fn test_anonymous_caller_is_unauthorized() {
    let app = test_app();
    seed_configuration(&app, "cfg-1").await;

    let response = app
        .router
        .clone()
        .oneshot(checkout_request(r#"{"configId":"cfg-1"}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "You need to be logged in");
}

#[tokio::test]
async fn test_logged_in_checkout_returns_redirect_url() {
    let app = test_app();
    seed_configuration(&app, "cfg-1").await;
    let cookie = login_cookie(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(checkout_request(r#"{"configId":"cfg-1"}"#, Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["url"], "https://checkout.stripe.test/c/cs_test");
    assert_eq!(app.orders.len().await, 1);
}

#[tokio::test]
async fn test_repeat_checkout_keeps_one_order() {
    let app = test_app();
    seed_configuration(&app, "cfg-1").await;
    let cookie = login_cookie(&app).await;

    for _ in 0..2 {
        let response = app
            .router
            .clone()
            .oneshot(checkout_request(r#"{"configId":"cfg-1"}"#, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(app.orders.len().await, 1);
}
