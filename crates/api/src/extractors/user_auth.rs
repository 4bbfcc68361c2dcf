//! Authenticated-user extractor.
//!
//! Pulls the identity the auth middleware stored in request extensions, or
//! validates the Bearer token itself when a handler is reached without the
//! middleware (as in handler unit tests).

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

/// The authenticated caller of a protected route.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub jti: String,
}

impl From<UserAuth> for AuthenticatedUser {
    fn from(auth: UserAuth) -> Self {
        Self {
            user_id: auth.user_id,
            jti: auth.jti,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(auth.clone().into());
        }

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))?;

        let issuer = UserAuth::create_issuer(&state.config.jwt).map_err(ApiError::Internal)?;

        let auth = UserAuth::validate(&issuer, token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(auth.into())
    }
}
