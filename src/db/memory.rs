//! In-memory stand-in for the PostgreSQL repositories, used by tests.
//!
//! Enforces the same constraints as the schema: unique emails, the
//! `sessions.user_id` foreign key without ON DELETE behaviour, and the
//! hash-conditioned rotation update.

use crate::db::error::RepositoryError;
use crate::db::models::session::{NewSession, Session, SessionRotation};
use crate::db::models::user::{NewUser, User};
use crate::db::repositories::{SessionStore, UserStore};
use async_trait::async_trait;
use sso_api::Role;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct State {
    users: BTreeMap<i64, User>,
    sessions: BTreeMap<i64, Session>,
    next_user_id: i64,
    next_session_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    latency: Option<Duration>,
    /// Session writes apply immediately, then take this long to report back.
    write_latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long before touching the state.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Session create and rotate commit at once but answer late, like a
    /// statement whose reply is slow to come back from the server.
    pub fn with_write_latency(latency: Duration) -> Self {
        Self {
            write_latency: Some(latency),
            ..Self::default()
        }
    }

    async fn acknowledge_write(&self) {
        if let Some(latency) = self.write_latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("memory store mutex poisoned")
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Inserts a user directly, bypassing the auth service.
    pub fn insert_user(&self, email: &str, password_hash: &str, role: Role) -> i64 {
        let mut state = self.state();
        state.next_user_id += 1;
        let id = state.next_user_id;
        state.users.insert(
            id,
            User {
                id,
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                role,
            },
        );
        id
    }

    pub fn session(&self, id: i64) -> Option<Session> {
        self.state().sessions.get(&id).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.state().sessions.len()
    }

    pub fn sessions_of(&self, user_id: i64) -> Vec<Session> {
        self.state()
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn has_user(&self, id: i64) -> bool {
        self.state().users.contains_key(&id)
    }

    /// Moves the expiry of a session, e.g. into the past.
    pub fn set_session_expiry(&self, id: i64, expires_at: i64) {
        if let Some(session) = self.state().sessions.get_mut(&id) {
            session.expires_at = expires_at;
        }
    }

    /// Drops a user row regardless of its sessions, producing orphans.
    pub fn remove_user_unchecked(&self, id: i64) {
        self.state().users.remove(&id);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<i64, RepositoryError> {
        self.delay().await;
        let role = Role::from_id(new_user.role_id).ok_or_else(|| {
            RepositoryError::ForeignKeyViolation(format!("role {}", new_user.role_id))
        })?;

        let mut state = self.state();
        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(RepositoryError::UniqueViolation(
                "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
            ));
        }

        state.next_user_id += 1;
        let id = state.next_user_id;
        state.users.insert(
            id,
            User {
                id,
                email: new_user.email,
                password_hash: new_user.password_hash,
                role,
            },
        );
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.delay().await;
        Ok(self
            .state()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        self.delay().await;
        Ok(self.state().users.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.delay().await;
        let mut state = self.state();
        if state.sessions.values().any(|s| s.user_id == id) {
            return Err(RepositoryError::ForeignKeyViolation(format!(
                "sessions still reference user {id}"
            )));
        }
        state
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("user {id}")))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, new_session: NewSession) -> Result<i64, RepositoryError> {
        self.delay().await;
        let id = {
            let mut state = self.state();
            if !state.users.contains_key(&new_session.user_id) {
                return Err(RepositoryError::ForeignKeyViolation(format!(
                    "user {} does not exist",
                    new_session.user_id
                )));
            }

            state.next_session_id += 1;
            let id = state.next_session_id;
            state.sessions.insert(
                id,
                Session {
                    id,
                    user_id: new_session.user_id,
                    refresh_token_hash: new_session.refresh_token_hash,
                    created_at: new_session.created_at,
                    expires_at: new_session.expires_at,
                },
            );
            id
        };

        self.acknowledge_write().await;
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Session>, RepositoryError> {
        self.delay().await;
        Ok(self.state().sessions.get(&id).cloned())
    }

    async fn rotate(
        &self,
        id: i64,
        current_hash: &str,
        rotation: SessionRotation,
    ) -> Result<(), RepositoryError> {
        self.delay().await;
        {
            let mut state = self.state();
            let session = state
                .sessions
                .get_mut(&id)
                .ok_or_else(|| RepositoryError::NotFound(format!("session {id}")))?;

            if session.refresh_token_hash != current_hash {
                return Err(RepositoryError::Conflict(format!(
                    "session {id} was rotated concurrently"
                )));
            }

            session.refresh_token_hash = rotation.refresh_token_hash;
            session.created_at = rotation.created_at;
            session.expires_at = rotation.expires_at;
        }

        self.acknowledge_write().await;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.delay().await;
        self.state()
            .sessions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("session {id}")))
    }

    async fn delete_by_user(&self, user_id: i64) -> Result<usize, RepositoryError> {
        self.delay().await;
        let mut state = self.state();
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.user_id != user_id);
        Ok(before - state.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_session(user_id: i64, hash: &str) -> NewSession {
        NewSession {
            user_id,
            refresh_token_hash: hash.to_string(),
            created_at: 0,
            expires_at: 100,
        }
    }

    fn rotation(hash: &str) -> SessionRotation {
        SessionRotation {
            refresh_token_hash: hash.to_string(),
            created_at: 10,
            expires_at: 110,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let store = MemoryStore::new();
        UserStore::create(&store, NewUser::new("a@x.io", "h".to_string(), Role::User))
            .await
            .expect("first insert");

        let second =
            UserStore::create(&store, NewUser::new("a@x.io", "h".to_string(), Role::User)).await;

        assert!(matches!(second, Err(RepositoryError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn session_for_missing_user_violates_foreign_key() {
        let store = MemoryStore::new();

        let result = SessionStore::create(&store, new_session(404, "h")).await;

        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn user_with_sessions_cannot_be_deleted() {
        let store = MemoryStore::new();
        let user_id = store.insert_user("a@x.io", "h", Role::User);
        SessionStore::create(&store, new_session(user_id, "h"))
            .await
            .expect("session");

        let result = UserStore::delete(&store, user_id).await;

        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn rotate_with_stale_hash_conflicts_and_keeps_row() {
        let store = MemoryStore::new();
        let user_id = store.insert_user("a@x.io", "h", Role::User);
        let id = SessionStore::create(&store, new_session(user_id, "first"))
            .await
            .expect("session");

        store
            .rotate(id, "first", rotation("second"))
            .await
            .expect("first rotation wins");
        let stale = store.rotate(id, "first", rotation("third")).await;

        assert!(matches!(stale, Err(RepositoryError::Conflict(_))));
        let session = store.session(id).expect("row kept");
        assert_eq!(session.refresh_token_hash, "second");
        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn rotate_missing_session_is_not_found() {
        let store = MemoryStore::new();

        let result = store.rotate(9, "h", rotation("x")).await;

        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_by_user_counts_removed_rows() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice@x.io", "h", Role::User);
        let bob = store.insert_user("bob@x.io", "h", Role::User);
        for owner in [alice, alice, bob] {
            SessionStore::create(&store, new_session(owner, "h"))
                .await
                .expect("session");
        }

        let removed = store.delete_by_user(alice).await.expect("delete");

        assert_eq!(removed, 2);
        assert_eq!(store.sessions_of(bob).len(), 1);
    }
}
