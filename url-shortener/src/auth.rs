use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use jsonwebtoken::{DecodingKey, Validation, decode};
use sso_api::{Claims, Role};

use crate::error::AppError;

/// Verifies access tokens issued by the sso service.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default()).map(|data| data.claims)
    }
}

/// Caller identity taken from the bearer token. `user_id` scopes every URL operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

impl Principal {
    /// Service accounts and admins may wipe a user's data.
    pub fn may_purge_user_data(&self) -> bool {
        matches!(self.role, Role::Service | Role::Admin)
    }
}

impl FromRequestParts<TokenVerifier> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        verifier: &TokenVerifier,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized("Missing or malformed bearer token"))?;

        let claims = verifier.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "rejected access token");
            AppError::unauthorized("Invalid token")
        })?;

        Ok(Principal {
            user_id: claims.uid,
            role: claims.role,
        })
    }
}
