//! JWT token generation and validation
//! Stateless HS256 tokens; expiry is opt-in through `security.token_ttl_secs`

use crate::{
    config::SecurityConfig,
    error::{AppError, AuthFailure},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifying fields embedded in a token. Never carries credential data.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub id: Uuid,

    /// User email
    pub email: String,
}

/// Wire payload: the claims plus the optional expiration
#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    #[serde(flatten)]
    claims: Claims,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl_secs: Option<u64>,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &SecurityConfig) -> Result<Self, AppError> {
        Self::new(config.jwt_secret.expose_secret(), config.token_ttl_secs)
    }

    pub fn new(secret: &str, token_ttl_secs: Option<u64>) -> Result<Self, AppError> {
        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.leeway = 0;
        if token_ttl_secs.is_some() {
            validation.required_spec_claims.insert("exp".to_string());
        } else {
            validation.validate_exp = false;
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_ttl_secs,
        })
    }

    /// Sign a token for the given claims
    pub fn issue(&self, claims: &Claims) -> Result<String, AppError> {
        let exp = self.token_ttl_secs.map(expiry_after).transpose()?;

        let payload = TokenPayload {
            claims: claims.clone(),
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Internal(format!("Failed to encode token: {}", e))
        })
    }

    /// Validate and decode token.
    ///
    /// Every failure cause collapses into `AuthFailure::Verification`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthFailure> {
        decode::<TokenPayload>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e.kind());
                AuthFailure::Verification
            })
    }
}

/// Unix timestamp `ttl_secs` from now, without overflowing chrono's range
fn expiry_after(ttl_secs: u64) -> Result<i64, AppError> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .map(|at| at.timestamp())
        .ok_or_else(|| AppError::Internal(format!("Token TTL out of range: {}s", ttl_secs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_32_characters_long!";

    fn claims() -> Claims {
        Claims {
            id: Uuid::new_v4(),
            email: "john@mail.com".to_string(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let service = JwtService::new(SECRET, None).unwrap();
        let claims = claims();

        let token = service.issue(&claims).unwrap();
        assert_eq!(service.verify(&token).unwrap(), claims);
    }

    #[test]
    fn test_issue_is_deterministic_without_ttl() {
        let service = JwtService::new(SECRET, None).unwrap();
        let claims = claims();

        assert_eq!(service.issue(&claims).unwrap(), service.issue(&claims).unwrap());
    }

    #[test]
    fn test_issue_and_verify_with_ttl() {
        let service = JwtService::new(SECRET, Some(3600)).unwrap();
        let claims = claims();

        let token = service.issue(&claims).unwrap();
        assert_eq!(service.verify(&token).unwrap(), claims);
    }

    #[test]
    fn test_out_of_range_ttl_is_an_error() {
        for ttl in [u64::MAX, u64::MAX / 2, i64::MAX as u64] {
            let service = JwtService::new(SECRET, Some(ttl)).unwrap();
            assert!(matches!(service.issue(&claims()), Err(AppError::Internal(_))));
        }
    }

    #[test]
    fn test_token_without_exp_rejected_when_ttl_configured() {
        let unbounded = JwtService::new(SECRET, None).unwrap();
        let bounded = JwtService::new(SECRET, Some(3600)).unwrap();

        let token = unbounded.issue(&claims()).unwrap();
        assert_eq!(bounded.verify(&token), Err(AuthFailure::Verification));
    }

    #[test]
    fn test_invalid_token_fails() {
        let service = JwtService::new(SECRET, None).unwrap();
        assert_eq!(service.verify("invalid_token"), Err(AuthFailure::Verification));
        assert_eq!(service.verify(""), Err(AuthFailure::Verification));
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(JwtService::new("short", None).is_err());
    }
}
