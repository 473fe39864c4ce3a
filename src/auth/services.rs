use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use sso_api::Role;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::auth::errors::AuthError;
use crate::auth::extractors::Principal;
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::PasswordManager;
use crate::auth::refresh_token::RefreshToken;
use crate::clients::UserDataCleaner;
use crate::db::error::RepositoryError;
use crate::db::models::session::{NewSession, SessionRotation};
use crate::db::models::user::{NewUser, User};
use crate::db::repositories::{SessionStore, UserStore};

/// Access token plus the encoded refresh token handed to the client.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Session lifecycle: login, registration, refresh-token rotation, logout and
/// account deletion.
///
/// A session row exists for as long as its refresh-token lineage is alive. Rotation
/// rewrites the row in place and only succeeds while the row still holds the hash
/// that was just verified, so one refresh token can be redeemed at most once.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    tokens: TokenIssuer,
    passwords: PasswordManager,
    user_data: Option<Arc<dyn UserDataCleaner>>,
    store_timeout: Duration,
    /// Hash at the configured cost, verified against when the login email is
    /// unknown so both failure paths do the same bcrypt work.
    decoy_hash: OnceCell<String>,
}

const DECOY_SECRET: &str = "decoy-secret-for-unknown-logins";

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        tokens: TokenIssuer,
        passwords: PasswordManager,
        store_timeout: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            tokens,
            passwords,
            user_data: None,
            store_timeout,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Also purge the user's data in another service when an account is deleted.
    #[must_use]
    pub fn with_user_data_cleaner(mut self, cleaner: Arc<dyn UserDataCleaner>) -> Self {
        self.user_data = Some(cleaner);
        self
    }

    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Awaits a store call, giving up after the configured deadline.
    async fn store<T>(
        &self,
        call: impl Future<Output = Result<T, RepositoryError>>,
    ) -> Result<T, RepositoryError> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .unwrap_or(Err(RepositoryError::Timeout))
    }

    /// Awaits a session write whose result carries a new secret to the client.
    /// A committed write must reach the caller, so only the database
    /// `statement_timeout` bounds it.
    async fn commit<T>(
        call: impl Future<Output = Result<T, RepositoryError>>,
    ) -> Result<T, RepositoryError> {
        call.await
    }

    /// Burns one bcrypt verification at the configured cost.
    async fn verify_decoy(&self, password: &str) -> Result<(), AuthError> {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| self.passwords.hash_async(DECOY_SECRET.to_string()))
            .await?;
        PasswordManager::verify_async(password.to_string(), decoy.clone()).await?;
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionTokens, AuthError> {
        let started = Instant::now();

        let Some(user) = self.store(self.users.find_by_email(email)).await? else {
            self.verify_decoy(password).await?;
            warn!(email, "login for unknown email");
            return Err(AuthError::bad_login());
        };

        if !PasswordManager::verify_async(password.to_string(), user.password_hash.clone()).await? {
            warn!(user_id = user.id, "login with wrong password");
            return Err(AuthError::bad_login());
        }

        let tokens = self.open_session(&user).await?;

        info!(user_id = user.id, "user logged in");
        debug!(elapsed = ?started.elapsed(), "login finished");
        Ok(tokens)
    }

    pub async fn register_new_user(&self, email: &str, password: &str) -> Result<i64, AuthError> {
        let started = Instant::now();
        let password_hash = self.passwords.hash_async(password.to_string()).await?;

        let user_id = match self
            .store(self.users.create(NewUser::new(email, password_hash, Role::User)))
            .await
        {
            Ok(id) => id,
            Err(RepositoryError::UniqueViolation(_)) => {
                warn!(email, "registration for existing email");
                return Err(AuthError::UserExists);
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id, "user registered");
        debug!(elapsed = ?started.elapsed(), "registration finished");
        Ok(user_id)
    }

    /// Redeems a refresh token for a new token pair, invalidating the old one.
    pub async fn get_new_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<SessionTokens, AuthError> {
        let started = Instant::now();
        let presented = RefreshToken::decode(refresh_token)?;

        let Some(session) = self
            .store(self.sessions.find_by_id(presented.session_id))
            .await?
        else {
            warn!(session_id = presented.session_id, "refresh for unknown session");
            return Err(AuthError::SessionNotFound);
        };

        if !PasswordManager::verify_async(presented.random_part, session.refresh_token_hash.clone())
            .await?
        {
            warn!(
                session_id = session.id,
                user_id = session.user_id,
                "refresh secret mismatch, possible token replay"
            );
            return Err(AuthError::InvalidRefreshToken);
        }

        if session.is_expired_at(Utc::now().timestamp()) {
            match self.store(self.sessions.delete(session.id)).await {
                Ok(()) | Err(RepositoryError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
            warn!(session_id = session.id, user_id = session.user_id, "session expired");
            return Err(AuthError::SessionExpired);
        }

        let Some(user) = self.store(self.users.find_by_id(session.user_id)).await? else {
            warn!(
                session_id = session.id,
                user_id = session.user_id,
                "session belongs to a missing user"
            );
            return Err(AuthError::UserNotFound);
        };

        let pair = self.tokens.issue_token_pair(&user)?;
        let new_hash = self.passwords.hash_async(pair.refresh_secret.clone()).await?;
        let now = Utc::now().timestamp();
        let rotation = SessionRotation {
            refresh_token_hash: new_hash,
            created_at: now,
            expires_at: now + self.tokens.refresh_token_ttl().num_seconds(),
        };

        match Self::commit(self.sessions.rotate(session.id, &session.refresh_token_hash, rotation))
            .await
        {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => {
                warn!(session_id = session.id, "lost concurrent rotation");
                return Err(AuthError::InvalidRefreshToken);
            }
            Err(RepositoryError::NotFound(_)) => {
                warn!(session_id = session.id, "session removed during rotation");
                return Err(AuthError::SessionNotFound);
            }
            Err(e) => return Err(e.into()),
        }

        let refresh_token = RefreshToken::new(session.id, pair.refresh_secret)
            .encode()
            .map_err(AuthError::internal)?;

        info!(session_id = session.id, user_id = user.id, "refresh token rotated");
        debug!(elapsed = ?started.elapsed(), "rotation finished");
        Ok(SessionTokens {
            access_token: pair.access_token,
            refresh_token,
        })
    }

    /// Ends the session behind `refresh_token`. The caller must own it.
    pub async fn logout(
        &self,
        principal: &Principal,
        refresh_token: &str,
    ) -> Result<(), AuthError> {
        let presented = RefreshToken::decode(refresh_token)?;

        let Some(session) = self
            .store(self.sessions.find_by_id(presented.session_id))
            .await?
        else {
            warn!(session_id = presented.session_id, "logout for unknown session");
            return Err(AuthError::SessionNotFound);
        };

        if session.user_id != principal.user_id {
            warn!(
                session_id = session.id,
                user_id = principal.user_id,
                "logout of a session owned by someone else"
            );
            return Err(AuthError::not_permitted());
        }

        let secret_matches =
            PasswordManager::verify_async(presented.random_part, session.refresh_token_hash).await?;
        if !secret_matches {
            warn!(session_id = session.id, "logout with stale refresh secret");
            return Err(AuthError::InvalidRefreshToken);
        }

        match self.store(self.sessions.delete(session.id)).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound(_)) => return Err(AuthError::SessionNotFound),
            Err(e) => return Err(e.into()),
        }

        info!(session_id = session.id, user_id = principal.user_id, "user logged out");
        Ok(())
    }

    pub async fn delete_user_by_id(
        &self,
        principal: &Principal,
        user_id: i64,
    ) -> Result<(), AuthError> {
        if !principal.can_manage(user_id) {
            warn!(caller = principal.user_id, target = user_id, "account deletion refused");
            return Err(AuthError::not_permitted());
        }

        let Some(user) = self.store(self.users.find_by_id(user_id)).await? else {
            return Err(AuthError::UserNotFound);
        };

        self.delete_account(&user).await
    }

    pub async fn delete_user_by_email(
        &self,
        principal: &Principal,
        email: &str,
    ) -> Result<(), AuthError> {
        // Refuse before the lookup so non-admins cannot probe which emails exist.
        if !principal.is_admin() && principal.email != email {
            warn!(caller = principal.user_id, email, "account deletion refused");
            return Err(AuthError::not_permitted());
        }

        let Some(user) = self.store(self.users.find_by_email(email)).await? else {
            return Err(AuthError::UserNotFound);
        };

        if !principal.can_manage(user.id) {
            warn!(caller = principal.user_id, target = user.id, "account deletion refused");
            return Err(AuthError::not_permitted());
        }

        self.delete_account(&user).await
    }

    /// Sessions first, then data held elsewhere, then the user row. The schema's
    /// foreign key rejects the last step while sessions remain.
    async fn delete_account(&self, user: &User) -> Result<(), AuthError> {
        let started = Instant::now();
        let sessions_removed = self.store(self.sessions.delete_by_user(user.id)).await?;

        match &self.user_data {
            Some(cleaner) => cleaner
                .delete_user_data(user.id)
                .await
                .map_err(AuthError::internal)?,
            None => warn!(user_id = user.id, "no user data service configured, skipping"),
        }

        match self.store(self.users.delete(user.id)).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound(_)) => return Err(AuthError::UserNotFound),
            Err(e) => return Err(e.into()),
        }

        info!(user_id = user.id, sessions_removed, "account deleted");
        debug!(elapsed = ?started.elapsed(), "account deletion finished");
        Ok(())
    }

    /// Issues a token pair and persists a new session for its refresh secret.
    async fn open_session(&self, user: &User) -> Result<SessionTokens, AuthError> {
        let pair = self.tokens.issue_token_pair(user)?;
        let refresh_token_hash = self.passwords.hash_async(pair.refresh_secret.clone()).await?;

        let now = Utc::now().timestamp();
        let session_id = Self::commit(self.sessions.create(NewSession {
            user_id: user.id,
            refresh_token_hash,
            created_at: now,
            expires_at: now + self.tokens.refresh_token_ttl().num_seconds(),
        }))
        .await?;

        let refresh_token = RefreshToken::new(session_id, pair.refresh_secret)
            .encode()
            .map_err(AuthError::internal)?;

        debug!(session_id, user_id = user.id, "session opened");
        Ok(SessionTokens {
            access_token: pair.access_token,
            refresh_token,
        })
    }
}
