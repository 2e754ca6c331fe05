//! Course catalog handlers.
//!
//! Reads are public; writes require the admin role.

use axum::{
    extract::{Path, Query, State},
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
use crate::domain::{Course, Difficulty};
use crate::errors::AppResult;
use crate::services::{CreateCourseData, LessonInput, UpdateCourseData};
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Lesson payload within a course request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LessonRequest {
    #[validate(length(min = 1, message = "Lesson title is required"))]
    pub title: String,
    #[serde(default)]
    pub content_html: String,
    #[serde(default)]
    pub video_url: String,
    /// 1-based position; defaults to the lesson's list index
    pub order: Option<u32>,
}

/// Course creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Intro to Rust")]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Faculty name is required"))]
    pub faculty: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub difficulty: Difficulty,
    /// Price in major currency units; 0 or absent means free
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    #[validate(nested)]
    pub lessons: Vec<LessonRequest>,
}

/// Course update request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub faculty: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub price: Option<i64>,
    pub thumbnail_url: Option<String>,
    #[validate(nested)]
    pub lessons: Option<Vec<LessonRequest>>,
}

impl From<LessonRequest> for LessonInput {
    fn from(req: LessonRequest) -> Self {
        Self {
            title: req.title,
            content_html: req.content_html,
            video_url: req.video_url,
            order: req.order,
        }
    }
}

/// Create public catalog routes
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/:id", get(get_course))
}

/// Create catalog write routes; admin enforcement happens per handler
pub fn course_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course))
        .route("/:id", put(update_course).delete(delete_course))
}

/// List courses (paginated)
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "Courses",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Courses page", body = [Course])
    )
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Course>>>> {
    let page = state.course_service.list_courses(params).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// Get a course by id
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "Courses",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = Course),
        (status = 404, description = "Course not found")
    )
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Course>>> {
    let course = state.course_service.get_course(id).await?;
    Ok(Json(ApiResponse::success(course)))
}

/// Create a course (admin only)
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateCourseRequest>,
) -> AppResult<Created<Course>> {
    require_admin(&current_user)?;

    let course = state
        .course_service
        .create_course(CreateCourseData {
            title: payload.title,
            description: payload.description,
            faculty: payload.faculty,
            category: payload.category,
            difficulty: payload.difficulty,
            price: payload.price,
            thumbnail_url: payload.thumbnail_url,
            lessons: payload.lessons.into_iter().map(Into::into).collect(),
        })
        .await?;

    Ok(Created(course))
}

/// Update a course (admin only)
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course id")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn update_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCourseRequest>,
) -> AppResult<Json<ApiResponse<Course>>> {
    require_admin(&current_user)?;

    let course = state
        .course_service
        .update_course(
            id,
            UpdateCourseData {
                title: payload.title,
                description: payload.description,
                faculty: payload.faculty,
                category: payload.category,
                difficulty: payload.difficulty,
                price: payload.price,
                thumbnail_url: payload.thumbnail_url,
                lessons: payload
                    .lessons
                    .map(|lessons| lessons.into_iter().map(Into::into).collect()),
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(course)))
}

/// Delete a course (admin only)
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_admin(&current_user)?;

    state.course_service.delete_course(id).await?;
    Ok(Json(ApiResponse::message("Course deleted successfully")))
}
