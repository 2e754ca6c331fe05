//! Enrollment handlers: free/paid enrollment, progress, listings.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{AdminEnrollmentView, Enrollment, EnrollmentView};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Free enrollment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EnrollRequest {
    /// Course to enroll in
    pub course_id: Uuid,
}

/// Paid enrollment request; the checkout session id proves payment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EnrollPaidRequest {
    /// Course to enroll in
    pub course_id: Uuid,
    /// Completed checkout session id from the payment provider
    #[validate(length(min = 1, message = "Payment session required"))]
    #[schema(example = "cs_test_a1b2c3")]
    pub session_id: String,
}

/// Lesson progress update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProgressRequest {
    /// Lesson whose completion flag to set
    pub lesson_id: Uuid,
    /// New completion state
    pub completed: bool,
}

/// Create enrollment routes
pub fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(enroll_free))
        .route("/paid", post(enroll_paid))
        .route("/me", get(list_mine))
        .route("/:id/progress", put(update_progress))
        .route("/admin", get(list_all))
}

/// Enroll in a free course
#[utoipa::path(
    post,
    path = "/api/enrollments",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    request_body = EnrollRequest,
    responses(
        (status = 201, description = "Enrolled", body = Enrollment),
        (status = 402, description = "Course is paid"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Already enrolled")
    )
)]
pub async fn enroll_free(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<EnrollRequest>,
) -> AppResult<Created<Enrollment>> {
    let enrollment = state
        .enrollment_service
        .enroll_free(current_user.id, payload.course_id)
        .await?;

    Ok(Created(enrollment))
}

/// Enroll in a paid course after checkout completes
#[utoipa::path(
    post,
    path = "/api/enrollments/paid",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    request_body = EnrollPaidRequest,
    responses(
        (status = 201, description = "Enrolled", body = Enrollment),
        (status = 400, description = "Course missing or free"),
        (status = 402, description = "Payment not verified"),
        (status = 409, description = "Already enrolled")
    )
)]
pub async fn enroll_paid(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<EnrollPaidRequest>,
) -> AppResult<Created<Enrollment>> {
    let enrollment = state
        .enrollment_service
        .enroll_paid(current_user.id, payload.course_id, payload.session_id)
        .await?;

    Ok(Created(enrollment))
}

/// List the caller's enrollments
#[utoipa::path(
    get,
    path = "/api/enrollments/me",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's enrollments", body = [EnrollmentView]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<EnrollmentView>>>> {
    let enrollments = state.enrollment_service.list_mine(current_user.id).await?;
    Ok(Json(ApiResponse::success(enrollments)))
}

/// Update one lesson's completion flag
#[utoipa::path(
    put,
    path = "/api/enrollments/{id}/progress",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Enrollment id")),
    request_body = UpdateProgressRequest,
    responses(
        (status = 200, description = "Progress updated"),
        (status = 400, description = "Lesson not in course"),
        (status = 402, description = "Paid enrollment required"),
        (status = 403, description = "Not the enrollment owner"),
        (status = 404, description = "Enrollment not found")
    )
)]
pub async fn update_progress(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProgressRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .enrollment_service
        .update_progress(current_user.id, id, payload.lesson_id, payload.completed)
        .await?;

    Ok(Json(ApiResponse::message("Progress updated")))
}

/// List all enrollments (admin only)
#[utoipa::path(
    get,
    path = "/api/enrollments/admin",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All enrollments", body = [AdminEnrollmentView]),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_all(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<AdminEnrollmentView>>>> {
    require_admin(&current_user)?;

    let enrollments = state.enrollment_service.list_all().await?;
    Ok(Json(ApiResponse::success(enrollments)))
}
