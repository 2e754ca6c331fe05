//! Checkout provider client.
//!
//! The enrollment core never moves money itself: it creates a
//! provider-hosted checkout session for a paid course and, on the paid
//! enrollment path, retrieves that session again to confirm the payment
//! actually completed for this (user, course) pair. Sessions are tagged
//! with both ids in provider metadata at creation time so the
//! confirmation check can bind them back together.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Parameters for a new checkout session
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub customer_email: String,
    pub product_name: String,
    /// Amount in minor currency units
    pub amount_minor: i64,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub user_id: Uuid,
    pub course_id: Uuid,
}

/// Payment state of a checkout session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    Paid,
    Unpaid,
}

/// A provider-side checkout session
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    /// Redirect URL for the hosted payment page (present on creation)
    pub url: Option<String>,
    pub payment_state: PaymentState,
    /// (user, course) binding carried in session metadata
    pub user_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
}

/// External payment provider interface.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a one-time checkout session and return it with its
    /// redirect URL.
    async fn create_session(&self, request: CheckoutRequest) -> AppResult<CheckoutSession>;

    /// Retrieve an existing session by provider id.
    async fn retrieve_session(&self, session_id: &str) -> AppResult<CheckoutSession>;
}

/// Stripe-backed checkout provider using the form-encoded REST API.
pub struct StripeCheckout {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeCheckout {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: config.payment_secret_key.clone(),
            api_base: config.payment_api_base.clone(),
        }
    }
}

/// Wire shape of a Stripe checkout session (subset we consume)
#[derive(Debug, Deserialize)]
struct WireSession {
    id: String,
    url: Option<String>,
    payment_status: String,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: WireErrorBody,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    message: String,
}

impl From<WireSession> for CheckoutSession {
    fn from(wire: WireSession) -> Self {
        let payment_state = match wire.payment_status.as_str() {
            "paid" | "no_payment_required" => PaymentState::Paid,
            _ => PaymentState::Unpaid,
        };

        let parse_uuid = |key: &str| {
            wire.metadata
                .get(key)
                .and_then(|v| Uuid::parse_str(v).ok())
        };

        Self {
            id: wire.id,
            url: wire.url,
            payment_state,
            user_id: parse_uuid("user_id"),
            course_id: parse_uuid("course_id"),
        }
    }
}

impl StripeCheckout {
    async fn parse_response(&self, response: reqwest::Response) -> AppResult<CheckoutSession> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::payment(format!("failed to read provider response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<WireError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("provider returned status {}", status));
            return Err(AppError::payment(message));
        }

        let wire: WireSession = serde_json::from_str(&body)
            .map_err(|e| AppError::payment(format!("unexpected provider response: {}", e)))?;

        Ok(CheckoutSession::from(wire))
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckout {
    async fn create_session(&self, request: CheckoutRequest) -> AppResult<CheckoutSession> {
        let params: Vec<(&str, String)> = vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("customer_email", request.customer_email),
            (
                "line_items[0][price_data][currency]",
                request.currency.clone(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                request.product_name,
            ),
            (
                "line_items[0][price_data][unit_amount]",
                request.amount_minor.to_string(),
            ),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", request.success_url),
            ("cancel_url", request.cancel_url),
            ("metadata[user_id]", request.user_id.to_string()),
            ("metadata[course_id]", request.course_id.to_string()),
        ];

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::payment(format!("provider request failed: {}", e)))?;

        self.parse_response(response).await
    }

    async fn retrieve_session(&self, session_id: &str) -> AppResult<CheckoutSession> {
        let response = self
            .http
            .get(format!(
                "{}/v1/checkout/sessions/{}",
                self.api_base, session_id
            ))
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .send()
            .await
            .map_err(|e| AppError::payment(format!("provider request failed: {}", e)))?;

        self.parse_response(response).await
    }
}
