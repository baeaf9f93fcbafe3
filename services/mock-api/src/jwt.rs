//! Token issuing and validation (HS256)

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Access token lifetime, matching the one-day client-side token expiry
pub const ACCESS_TOKEN_EXPIRY_SECS: u64 = 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Create a JwtService from `MOCK_API_JWT_SECRET`
    pub fn from_env() -> Self {
        let secret =
            std::env::var("MOCK_API_JWT_SECRET").unwrap_or_else(|_| "mock-api-secret".to_string());
        Self::new(&secret)
    }

    fn now() -> Result<u64> {
        Ok(SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs())
    }

    /// Generate an access token for a username
    pub fn generate_access_token(&self, username: &str) -> Result<String> {
        let now = Self::now()?;
        self.sign(username, now, now + ACCESS_TOKEN_EXPIRY_SECS)
    }

    /// Generate a token that has already expired
    pub fn generate_expired_token(&self, username: &str) -> Result<String> {
        let now = Self::now()?;
        self.sign(username, now - 7200, now - 3600)
    }

    fn sign(&self, username: &str, iat: u64, exp: u64) -> Result<String> {
        let claims = Claims {
            sub: username.to_string(),
            iat,
            exp,
        };
        Ok(encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
