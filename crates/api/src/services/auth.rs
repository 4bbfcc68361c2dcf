//! Authentication service: registration, login, and token refresh.

use domain::models::User;
use shared::jwt::{JwtError, TokenIssuer};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::validate_password_strength;
use sqlx::PgPool;
use thiserror::Error;

use persistence::repositories::UserRepository;

use crate::config::JwtAuthConfig;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Result of a successful token refresh.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    issuer: TokenIssuer,
    access_token_expiry: i64,
}

impl AuthService {
    /// Creates a new AuthService over the given pool and JWT configuration.
    pub fn new(pool: PgPool, jwt_config: &JwtAuthConfig) -> Result<Self, AuthError> {
        let issuer = TokenIssuer::new(
            &normalize_pem_key(&jwt_config.private_key),
            &normalize_pem_key(&jwt_config.public_key),
            jwt_config.access_token_expiry_secs,
            jwt_config.refresh_token_expiry_secs,
            jwt_config.leeway_secs,
        )
        .map_err(|e| AuthError::Internal(format!("Failed to initialize token issuer: {}", e)))?;

        Ok(Self {
            users: UserRepository::new(pool),
            issuer,
            access_token_expiry: jwt_config.access_token_expiry_secs,
        })
    }

    /// Register a new user with email and password.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<AuthResult, AuthError> {
        validate_password_strength(password).map_err(|e| {
            AuthError::WeakPassword(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Password too weak".to_string()),
            )
        })?;

        let email = email.to_lowercase();
        if self.users.email_exists(&email).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let user = self.users.create(&email, &password_hash, nickname).await?;

        let (access_token, _) = self.issuer.issue_access_token(user.id)?;
        let (refresh_token, _) = self.issuer.issue_refresh_token(user.id)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthResult {
            user,
            access_token,
            refresh_token,
            expires_in: self.access_token_expiry,
        })
    }

    /// Authenticate a user by email and password.
    ///
    /// Wrong email and wrong password collapse to the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let credentials = self
            .users
            .find_credentials_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = verify_password(password, &credentials.password_hash)?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .users
            .find_by_id(credentials.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let (access_token, _) = self.issuer.issue_access_token(user.id)?;
        let (refresh_token, _) = self.issuer.issue_refresh_token(user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResult {
            user,
            access_token,
            refresh_token,
            expires_in: self.access_token_expiry,
        })
    }

    /// Exchange a refresh token for a fresh token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        let claims = self
            .issuer
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user_id = claims.user_id().map_err(|_| AuthError::InvalidRefreshToken)?;

        // The user may have been deleted since the token was issued
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let (access_token, _) = self.issuer.issue_access_token(user_id)?;
        let (refresh_token, _) = self.issuer.issue_refresh_token(user_id)?;

        Ok(RefreshResult {
            access_token,
            refresh_token,
            expires_in: self.access_token_expiry,
        })
    }
}

/// Normalize a PEM key whose newlines arrived as literal `\n` sequences,
/// which happens when keys are passed through env vars.
fn normalize_pem_key(key: &str) -> String {
    key.trim_matches('"').trim_matches('\'').replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pem_key_replaces_escaped_newlines() {
        let raw = "-----BEGIN KEY-----\\nabc\\n-----END KEY-----";
        let normalized = normalize_pem_key(raw);
        assert_eq!(normalized.matches('\n').count(), 2);
        assert!(!normalized.contains("\\n"));
    }

    #[test]
    fn test_normalize_pem_key_strips_quotes() {
        assert_eq!(normalize_pem_key("\"abc\""), "abc");
        assert_eq!(normalize_pem_key("'abc'"), "abc");
    }

    #[test]
    fn test_normalize_pem_key_idempotent_on_clean_keys() {
        let clean = "-----BEGIN KEY-----\nabc\n-----END KEY-----";
        assert_eq!(normalize_pem_key(clean), clean);
    }
}
