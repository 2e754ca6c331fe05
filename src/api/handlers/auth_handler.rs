//! Authentication handlers: signup, login, logout, current account.
//!
//! The session credential is delivered both in the response body and as
//! an http-only cookie (secure in production, same-site lax). Logout is
//! purely a cookie discard; stateless tokens have no server-side
//! revocation.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::SESSION_COOKIE;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::{ApiResponse, Created};

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    #[schema(example = "Asha Verma")]
    pub name: String,
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "learner@example.com")]
    pub email: String,
    /// Password (minimum 8 characters, one uppercase letter, one digit)
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "password_strength")
    )]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

fn password_strength(password: &str) -> Result<(), validator::ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_digit {
        Ok(())
    } else {
        Err(validator::ValidationError::new("password_strength")
            .with_message("Password must contain an uppercase letter and a digit".into()))
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "learner@example.com")]
    pub email: String,
    /// Password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Successful authentication payload
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: TokenResponse,
}

/// Create public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Create authentication routes that require a valid session
pub fn auth_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
}

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_owned()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!cfg!(debug_assertions))
        .path("/")
        .build()
}

/// Register a new learner account
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Account already exists")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<(CookieJar, Created<AuthResponse>)> {
    let (user, token) = state
        .auth_service
        .signup(payload.name, payload.email, payload.password)
        .await?;

    let jar = jar.add(session_cookie(&token.access_token));

    Ok((
        jar,
        Created(AuthResponse {
            user: UserResponse::from(user),
            token,
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<ApiResponse<AuthResponse>>)> {
    let (user, token) = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    let jar = jar.add(session_cookie(&token.access_token));

    Ok((
        jar,
        Json(ApiResponse::with_message(
            AuthResponse {
                user: UserResponse::from(user),
                token,
            },
            "Login successful",
        )),
    ))
}

/// Logout: clear the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<()>>) {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    let jar = jar.remove(cookie);

    (jar, Json(ApiResponse::message("Logged out successfully")))
}

/// Get the current authenticated account
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.user_service.get_user(current_user.id).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}
