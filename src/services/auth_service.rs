//! Authentication service - signup, login, and session credentials.
//!
//! Session credentials are stateless signed tokens: validity is a pure
//! function of the signature and embedded expiry, never a session-store
//! lookup. There is consequently no server-side revocation; logout is a
//! client-side credential discard.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, ROLE_LEARNER, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// JWT claims payload: account identity plus role, time-bounded
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new learner account and issue a session credential
    async fn signup(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<(User, TokenResponse)>;

    /// Verify credentials and issue a session credential
    async fn login(&self, email: String, password: String) -> AppResult<(User, TokenResponse)>;

    /// Verify a session credential and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Sign a session credential for a user (shared helper)
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn signup(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<(User, TokenResponse)> {
        // Fast-path duplicate check; the unique email constraint remains
        // the authoritative guard against a concurrent signup race.
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .users
            .create(email, password_hash, name, ROLE_LEARNER.to_string())
            .await?;

        let token = generate_token(&user, &self.config)?;
        Ok((user, token))
    }

    async fn login(&self, email: String, password: String) -> AppResult<(User, TokenResponse)> {
        let user_result = self.users.find_by_email(&email).await?;

        // SECURITY: Run password verification even when the account does
        // not exist, so response timing cannot enumerate valid emails.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let password_hash = user_result
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(dummy_hash);

        let password_valid = Password::from_hash(password_hash.to_string()).verify(&password);

        match user_result {
            Some(user) if password_valid => {
                let token = generate_token(&user, &self.config)?;
                Ok((user, token))
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::MockUserRepository;

    fn learner(id: Uuid, hash: &str) -> User {
        User {
            id,
            email: "learner@example.com".to_string(),
            password_hash: hash.to_string(),
            name: "Learner".to_string(),
            role: UserRole::Learner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn authenticator(repo: MockUserRepository, expiration_hours: i64) -> Authenticator {
        Authenticator::new(
            Arc::new(repo),
            Config::for_tests("unit-test-secret-key-32-characters!", expiration_hours),
        )
    }

    #[tokio::test]
    async fn token_round_trips_claims() {
        let user_id = Uuid::new_v4();
        let repo = MockUserRepository::new();
        let auth = authenticator(repo, 1);

        let user = learner(user_id, "irrelevant");
        let token = generate_token(&user, &auth.config).unwrap();

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "learner");
        assert_eq!(claims.email, "learner@example.com");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let repo = MockUserRepository::new();
        // Negative lifetime puts the embedded expiry in the past.
        let auth = authenticator(repo, -2);

        let user = learner(Uuid::new_v4(), "irrelevant");
        let token = generate_token(&user, &auth.config).unwrap();

        let err = auth.verify_token(&token.access_token).unwrap_err();
        assert!(matches!(err, AppError::Jwt(_)));
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let repo = MockUserRepository::new();
        let auth = authenticator(repo, 1);

        let user = learner(Uuid::new_v4(), "irrelevant");
        let mut token = generate_token(&user, &auth.config).unwrap().access_token;
        token.push('x');

        assert!(auth.verify_token(&token).is_err());
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(learner(Uuid::new_v4(), "hash"))));

        let auth = authenticator(repo, 1);
        let err = auth
            .signup(
                "Learner".into(),
                "learner@example.com".into(),
                "Password1!".into(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let stored = Password::new("RightPass1!").unwrap().into_string();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(learner(Uuid::new_v4(), &stored))));

        let auth = authenticator(repo, 1);
        let err = auth
            .login("learner@example.com".into(), "WrongPass1!".into())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_rejects_unknown_account() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let auth = authenticator(repo, 1);
        let err = auth
            .login("ghost@example.com".into(), "Password1!".into())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCredentials));
    }
}
