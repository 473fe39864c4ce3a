//! Store interfaces used by the auth core, and their PostgreSQL implementations.

pub mod session_repository;
pub mod user_repository;

use crate::db::error::RepositoryError;
use crate::db::models::session::{NewSession, Session, SessionRotation};
use crate::db::models::user::{NewUser, User};
use async_trait::async_trait;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user and returns its id. A taken email is `UniqueViolation`.
    async fn create(&self, new_user: NewUser) -> Result<i64, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;

    /// Deletes the user row. `NotFound` when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, new_session: NewSession) -> Result<i64, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Session>, RepositoryError>;

    /// Replaces the secret hash and validity window of session `id`, but only while
    /// its stored hash still equals `current_hash`.
    ///
    /// Returns `Conflict` when another rotation got there first and `NotFound`
    /// when the session is gone.
    async fn rotate(
        &self,
        id: i64,
        current_hash: &str,
        rotation: SessionRotation,
    ) -> Result<(), RepositoryError>;

    /// `NotFound` when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Deletes every session owned by `user_id` and returns how many were removed.
    async fn delete_by_user(&self, user_id: i64) -> Result<usize, RepositoryError>;
}
