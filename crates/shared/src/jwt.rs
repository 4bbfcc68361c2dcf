//! JWT issuing and validation for user sessions.
//!
//! Access and refresh tokens are signed with RS256. The issuer is constructed
//! once from the configured PEM key pair and shared across handlers.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Failed to decode token: {0}")]
    Decoding(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Kind of session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Unique token identifier, usable for revocation.
    pub jti: String,
    /// Access vs refresh.
    pub kind: TokenKind,
}

impl Claims {
    /// Parses the subject claim as a user ID.
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::Invalid)
    }
}

/// Default leeway in seconds for clock skew tolerance.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Signs and validates session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    pub access_expiry_secs: i64,
    pub refresh_expiry_secs: i64,
    pub leeway_secs: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_expiry_secs", &self.access_expiry_secs)
            .field("refresh_expiry_secs", &self.refresh_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

impl TokenIssuer {
    /// Creates an issuer from an RSA key pair in PEM format.
    pub fn new(
        private_key_pem: &str,
        public_key_pem: &str,
        access_expiry_secs: i64,
        refresh_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            access_expiry_secs,
            refresh_expiry_secs,
            leeway_secs,
        })
    }

    /// Creates an issuer with an HS256 symmetric key. Tests only.
    #[cfg(test)]
    pub fn new_for_testing(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_expiry_secs: 900,
            refresh_expiry_secs: 604800,
            leeway_secs: 0,
        }
    }

    /// Issues an access token. Returns `(token, jti)`.
    pub fn issue_access_token(&self, user_id: Uuid) -> Result<(String, String), JwtError> {
        self.issue(user_id, TokenKind::Access, self.access_expiry_secs)
    }

    /// Issues a refresh token. Returns `(token, jti)`.
    pub fn issue_refresh_token(&self, user_id: Uuid) -> Result<(String, String), JwtError> {
        self.issue(user_id, TokenKind::Refresh, self.refresh_expiry_secs)
    }

    fn issue(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        expiry_secs: i64,
    ) -> Result<(String, String), JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
            kind,
        };

        let token = encode(&Header::new(self.algorithm()), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))?;

        Ok((token, jti))
    }

    /// Validates a token of either kind and returns its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm());
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::Invalid,
                _ => JwtError::Decoding(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }

    /// Validates specifically an access token.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate(token)?;
        if claims.kind != TokenKind::Access {
            return Err(JwtError::Invalid);
        }
        Ok(claims)
    }

    /// Validates specifically a refresh token.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate(token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(JwtError::Invalid);
        }
        Ok(claims)
    }

    // Tests sign with a symmetric secret, production with RSA keys.
    fn algorithm(&self) -> Algorithm {
        #[cfg(test)]
        {
            Algorithm::HS256
        }
        #[cfg(not(test))]
        {
            Algorithm::RS256
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new_for_testing("test_secret_key_for_jwt_testing_12345")
    }

    #[test]
    fn test_issue_access_token() {
        let (token, jti) = issuer().issue_access_token(Uuid::new_v4()).unwrap();
        assert!(!jti.is_empty());
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_roundtrip_access_token() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();
        let (token, jti) = issuer.issue_access_token(user_id).unwrap();

        let claims = issuer.validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.jti, jti);
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_refresh_token_not_valid_as_access() {
        let issuer = issuer();
        let (refresh, _) = issuer.issue_refresh_token(Uuid::new_v4()).unwrap();

        assert!(matches!(
            issuer.validate_access_token(&refresh),
            Err(JwtError::Invalid)
        ));
        assert!(issuer.validate_refresh_token(&refresh).is_ok());
    }

    #[test]
    fn test_access_token_not_valid_as_refresh() {
        let issuer = issuer();
        let (access, _) = issuer.issue_access_token(Uuid::new_v4()).unwrap();

        assert!(matches!(
            issuer.validate_refresh_token(&access),
            Err(JwtError::Invalid)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = issuer();
        let (token, _) = issuer.issue_access_token(Uuid::new_v4()).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('x');

        assert!(issuer.validate(&tampered).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(issuer().validate("not.a.jwt").is_err());
        assert!(issuer().validate("").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut issuer = issuer();
        issuer.access_expiry_secs = -10;
        let (token, _) = issuer.issue_access_token(Uuid::new_v4()).unwrap();

        assert!(matches!(issuer.validate(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_jti_unique_per_token() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();
        let (_, jti_a) = issuer.issue_access_token(user_id).unwrap();
        let (_, jti_b) = issuer.issue_access_token(user_id).unwrap();
        assert_ne!(jti_a, jti_b);
    }

    #[test]
    fn test_claims_user_id_invalid_sub() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
            kind: TokenKind::Access,
        };
        assert!(claims.user_id().is_err());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let debug = format!("{:?}", issuer());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test_secret_key"));
    }
}
