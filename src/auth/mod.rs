use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::SecurityConfig;

/// Opaque id of the authenticated user, as issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session token claims. `sub` carries the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: impl Into<String>, iss: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            iss,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must use Bearer token format")]
    InvalidHeader,

    #[error("Token has an empty subject")]
    EmptySubject,

    #[error("Invalid JWT token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Resolves the caller of an inbound request.
///
/// Implementations are pure: `None` means the request carries no usable
/// credentials. Rejecting anonymous callers is left to the workflow.
pub trait IdentityResolver: Send + Sync {
    fn resolve_caller(&self, headers: &HeaderMap) -> Option<CallerId>;
}

/// HS256 session-token verifier
pub struct JwtIdentityResolver {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityResolver {
    pub fn new(security: &SecurityConfig) -> Result<Self, TokenError> {
        if security.jwt_secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }

        let mut validation = Validation::default();
        validation.leeway = security.leeway_secs;
        if let Some(issuer) = &security.jwt_issuer {
            validation.set_issuer(&[issuer]);
            validation.set_required_spec_claims(&["exp", "iss"]);
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(security.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Validate the bearer token and return its claims
    pub fn verify(&self, headers: &HeaderMap) -> Result<Claims, TokenError> {
        let token = extract_bearer_token(headers)?;
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;
        if claims.sub.trim().is_empty() {
            return Err(TokenError::EmptySubject);
        }
        Ok(claims)
    }
}

impl IdentityResolver for JwtIdentityResolver {
    fn resolve_caller(&self, headers: &HeaderMap) -> Option<CallerId> {
        match self.verify(headers) {
            Ok(claims) => Some(CallerId::new(claims.sub)),
            Err(TokenError::MissingHeader) => None,
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                None
            }
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or(TokenError::MissingHeader)?
        .to_str()
        .map_err(|_| TokenError::InvalidHeader)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(TokenError::InvalidHeader),
    }
}

/// Mint a session token for `user_id`. Used by the CLI and tests to stand in
/// for the identity provider.
pub fn generate_session_token(security: &SecurityConfig, user_id: &str) -> Result<String, TokenError> {
    generate_session_token_with_ttl(security, user_id, Duration::minutes(security.token_ttl_minutes))
}

pub fn generate_session_token_with_ttl(
    security: &SecurityConfig,
    user_id: &str,
    ttl: Duration,
) -> Result<String, TokenError> {
    if security.jwt_secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }

    let claims = Claims::new(user_id, security.jwt_issuer.clone(), ttl);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &encoding_key)?)
}
