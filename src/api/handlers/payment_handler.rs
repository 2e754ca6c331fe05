//! Payment handlers: checkout session creation.

use axum::{extract::State, response::Json, routing::post, Extension, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// Checkout creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequestBody {
    /// Paid course to purchase
    pub course_id: Uuid,
}

/// Checkout creation response
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Provider-hosted payment page to redirect the caller to
    #[schema(example = "https://checkout.stripe.com/c/pay/cs_test_a1b2c3")]
    pub url: String,
}

/// Create payment routes
pub fn payment_routes() -> Router<AppState> {
    Router::new().route("/checkout", post(create_checkout))
}

/// Create a checkout session for a paid course
#[utoipa::path(
    post,
    path = "/api/payments/checkout",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequestBody,
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutResponse),
        (status = 400, description = "Course is free"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Already enrolled"),
        (status = 502, description = "Payment provider failure")
    )
)]
pub async fn create_checkout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CheckoutRequestBody>,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    let url = state
        .payment_service
        .create_checkout(current_user.id, current_user.email.clone(), payload.course_id)
        .await?;

    Ok(Json(ApiResponse::success(CheckoutResponse { url })))
}
