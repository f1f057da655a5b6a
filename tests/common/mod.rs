//! Shared harness for HTTP integration tests.
//!
//! Builds the real router over the in-memory store, a mock session
//! validator and the broadcast bus, and drives it with `oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use cobri::adapters::auth::MockSessionValidator;
use cobri::adapters::events::BroadcastEventBus;
use cobri::adapters::http::{routes, AppState};
use cobri::adapters::memory::InMemoryStore;
use cobri::adapters::preapproval::StubPreapprovalProvider;

pub const ALICE: &str = "alice-token";
pub const BOB: &str = "bob-token";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub bus: Arc<BroadcastEventBus>,
    pub preapprovals: Arc<StubPreapprovalProvider>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(BroadcastEventBus::default());
        let preapprovals = Arc::new(StubPreapprovalProvider::new(
            "https://pay.example.com/authorize",
        ));
        let validator = Arc::new(
            MockSessionValidator::new()
                .with_test_user(ALICE, "alice")
                .with_test_user(BOB, "bob"),
        );

        let state = AppState {
            customers: store.clone(),
            subscriptions: store.clone(),
            accounts: store.clone(),
            event_publisher: bus.clone(),
            change_feed: bus.clone(),
            preapprovals: preapprovals.clone(),
            trial_days: 15,
        };

        Self {
            router: routes(state, validator),
            store,
            bus,
            preapprovals,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::POST, uri, Some(token), None).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Opens a subscription for a brand-new customer and returns its JSON.
    pub async fn open_subscription(
        &self,
        token: &str,
        customer: &str,
        price: f64,
        cycle: &str,
    ) -> Value {
        let email = format!("{}@example.com", customer.to_lowercase().replace(' ', "."));
        let response = self
            .post(
                "/api/subscriptions",
                token,
                serde_json::json!({
                    "new_customer": {"name": customer, "email": email},
                    "plan": "Pro",
                    "price": price,
                    "billing_cycle": cycle,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }
}

pub fn str_field<'a>(value: &'a Value, field: &str) -> &'a str {
    value[field].as_str().unwrap()
}
