use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use sso_api::{Claims, Role};

use crate::auth::jwt::TokenIssuer;
use crate::error::AppError;

/// The authenticated caller, built from verified access-token claims and passed
/// to the auth core explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins manage every account, everyone else only their own.
    pub fn can_manage(&self, user_id: i64) -> bool {
        self.is_admin() || self.user_id == user_id
    }
}

impl From<Claims> for Principal {
    fn from(c: Claims) -> Self {
        Self {
            user_id: c.uid,
            email: c.email,
            role: c.role,
        }
    }
}

/// Validates `Authorization: Bearer <JWT>` for routers whose state is the
/// `TokenIssuer`.
impl FromRequestParts<TokenIssuer> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        issuer: &TokenIssuer,
    ) -> Result<Self, Self::Rejection> {
        const BEARER: &str = "Bearer ";

        let auth_str = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?
            .to_str()
            .map_err(|_| AppError::unauthorized("Invalid authorization header"))?;

        let token = auth_str
            .strip_prefix(BEARER)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Expected a bearer token"))?;

        let claims = issuer.verify_token(token).map_err(|e| {
            tracing::debug!(error = %e, "rejected access token");
            AppError::unauthorized("Invalid token")
        })?;

        Ok(Principal::from(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Duration;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("extractor_test_secret", Duration::minutes(5), Duration::hours(1))
    }

    async fn extract(header_value: Option<String>) -> Result<Principal, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        Principal::from_request_parts(&mut parts, &issuer()).await
    }

    #[test]
    fn admin_manages_everyone_user_only_self() {
        let admin = Principal {
            user_id: 1,
            email: "root@x.io".to_string(),
            role: Role::Admin,
        };
        let user = Principal {
            role: Role::User,
            ..admin.clone()
        };

        assert!(admin.can_manage(99));
        assert!(user.can_manage(1));
        assert!(!user.can_manage(99));
    }

    #[tokio::test]
    async fn valid_bearer_token_yields_principal() {
        let token = issuer().issue_service_token(5).unwrap();

        let principal = extract(Some(format!("Bearer {token}"))).await.expect("valid");

        assert_eq!(principal.user_id, 5);
        assert_eq!(principal.role, Role::Service);
    }

    #[tokio::test]
    async fn missing_or_malformed_header_is_unauthorized() {
        for header_value in [None, Some("Basic abc".to_string()), Some("Bearer ".to_string())] {
            let err = extract(header_value).await.expect_err("rejected");
            assert!(matches!(err, AppError::Unauthorized(_)));
        }
    }

    #[tokio::test]
    async fn token_from_another_issuer_is_unauthorized() {
        let foreign = TokenIssuer::new("other", Duration::minutes(5), Duration::hours(1))
            .issue_service_token(5)
            .unwrap();

        let err = extract(Some(format!("Bearer {foreign}"))).await.expect_err("rejected");

        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
