use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use rand::rngs::OsRng;
use sso_api::{Claims, Role};

use crate::db::models::user::User;

/// Raw bytes of entropy in a refresh secret.
const REFRESH_SECRET_BYTES: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Token generation failed: {0}")]
    GenerationFailed(jsonwebtoken::errors::Error),
    #[error("Token verification failed: {0}")]
    VerificationFailed(jsonwebtoken::errors::Error),
    #[error("Random source unavailable: {0}")]
    RandomSource(rand::Error),
}

/// Output of [`TokenIssuer::issue_token_pair`]. The refresh secret is the bare
/// random part; the caller binds it to a session before it reaches the client.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_secret: String,
}

/// Mints HS256 access tokens and refresh secrets.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, access_token_ttl: Duration, refresh_token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }

    pub fn issue_token_pair(&self, user: &User) -> Result<TokenPair, JwtError> {
        let access_token = self.sign(user.id, &user.email, user.role)?;
        let refresh_secret = Self::random_secret()?;

        Ok(TokenPair {
            access_token,
            refresh_secret,
        })
    }

    /// Access token with the `service` role acting on behalf of `user_id`.
    /// Used for calls into other services, never handed to end users.
    pub fn issue_service_token(&self, user_id: i64) -> Result<String, JwtError> {
        self.sign(user_id, "", Role::Service)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(JwtError::VerificationFailed)
    }

    fn sign(&self, uid: i64, email: &str, role: Role) -> Result<String, JwtError> {
        let claims = Claims {
            uid,
            email: email.to_string(),
            role,
            exp: (Utc::now() + self.access_token_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(JwtError::GenerationFailed)
    }

    fn random_secret() -> Result<String, JwtError> {
        let mut bytes = [0u8; REFRESH_SECRET_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(JwtError::RandomSource)?;
        Ok(URL_SAFE.encode(bytes))
    }
}
