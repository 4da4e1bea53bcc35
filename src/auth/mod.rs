use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims valid from now for `expiry_hours`. Lifetimes past the
    /// representable date range are rejected.
    pub fn new(user: impl Into<String>, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(JwtError::ExpiryOutOfRange(expiry_hours))?;

        Ok(Self {
            sub: user.into(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

/// Authenticated identity resolved from a request credential
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self { user: claims.sub }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingCredential,

    #[error("Authorization header must use Bearer token format")]
    MalformedCredential,

    #[error("Invalid token: {0}")]
    Rejected(String),

    #[error("Token verifier misconfigured: {0}")]
    Misconfigured(String),
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Token lifetime of {0} hours is out of range")]
    ExpiryOutOfRange(u64),
}

/// Resolves a bearer token into a principal or rejects it
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Principal, AuthError>;
}

/// HS256 JWT verification against a shared secret
pub struct JwtVerifier {
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl JwtVerifier {
    pub fn from_secret(secret: &str) -> Self {
        // An empty secret would accept tokens signed with an empty key
        let decoding_key = if secret.is_empty() {
            None
        } else {
            Some(DecodingKey::from_secret(secret.as_bytes()))
        };

        Self {
            decoding_key,
            validation: Validation::default(),
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let decoding_key = self
            .decoding_key
            .as_ref()
            .ok_or_else(|| AuthError::Misconfigured("JWT secret not configured".to_string()))?;

        let token_data = decode::<Claims>(token, decoding_key, &self.validation)
            .map_err(|e| AuthError::Rejected(e.to_string()))?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(AuthError::Rejected("token has no subject".to_string()));
        }

        Ok(Principal::from(token_data.claims))
    }
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}
