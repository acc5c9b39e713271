//! Shared fixtures for the HTTP integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use tower::util::ServiceExt;

use ticketflow::adapters::auth::{BcryptPasswordHasher, JwtTokenService};
use ticketflow::adapters::gateway::MockGateway;
use ticketflow::adapters::http::{api_router, AppState};
use ticketflow::adapters::memory::{
    InMemoryJobQueue, InMemoryPaymentRepository, InMemoryTicketRepository, InMemoryUserRepository,
};
use ticketflow::config::{PaymentConfig, PaymentMode};
use ticketflow::domain::analysis::TicketAnalysis;
use ticketflow::ports::{MailError, Mailer, TicketAnalyzer};

/// Secrets shared by fixtures and assertions.
pub const JWT_SECRET: &str = "integration-test-signing-secret";
pub const WEBHOOK_SECRET: &str = "integration-webhook-secret";

/// Mailer that records every send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_body(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, _, b)| b.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Analyzer returning a fixed result.
pub struct FixedAnalyzer(pub Option<TicketAnalysis>);

#[async_trait]
impl TicketAnalyzer for FixedAnalyzer {
    async fn analyze(&self, _title: &str, _description: &str) -> Option<TicketAnalysis> {
        self.0.clone()
    }
}

/// The assembled application plus handles to its in-memory adapters.
pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub tickets: Arc<InMemoryTicketRepository>,
    pub payments: Arc<InMemoryPaymentRepository>,
    pub queue: Arc<InMemoryJobQueue>,
    pub mailer: Arc<RecordingMailer>,
}

/// Payment configuration used by most tests: mock checkout, real webhook
/// secret.
pub fn mock_payment_config() -> PaymentConfig {
    PaymentConfig {
        mode: PaymentMode::Mock,
        webhook_secret: SecretString::new(WEBHOOK_SECRET.to_string()),
        ..Default::default()
    }
}

/// Builds the app over in-memory adapters.
pub fn test_app(payment_config: PaymentConfig, analysis: Option<TicketAnalysis>) -> TestApp {
    let users = Arc::new(InMemoryUserRepository::new());
    let tickets = Arc::new(InMemoryTicketRepository::new());
    let payments = Arc::new(InMemoryPaymentRepository::new());
    let queue = Arc::new(InMemoryJobQueue::new());
    let mailer = Arc::new(RecordingMailer::new());

    let state = AppState {
        users: users.clone(),
        tickets: tickets.clone(),
        payments: payments.clone(),
        gateway: Arc::new(MockGateway::new()),
        analyzer: Arc::new(FixedAnalyzer(analysis)),
        mailer: mailer.clone(),
        queue: queue.clone(),
        tokens: Arc::new(JwtTokenService::new(
            SecretString::new(JWT_SECRET.to_string()),
            3600,
        )),
        hasher: Arc::new(BcryptPasswordHasher::new()),
        payment_config,
        frontend_url: "http://localhost:5173".to_string(),
        reset_token_ttl_secs: 900,
    };

    TestApp {
        router: api_router(state),
        users,
        tickets,
        payments,
        queue,
        mailer,
    }
}

/// Sends a request and returns status plus parsed JSON body.
pub async fn send(
    router: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Signs up a user and returns their bearer token.
pub async fn signup(router: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    body["token"].as_str().unwrap().to_string()
}
