use crate::db::DbPool;
use crate::db::connection::run_blocking;
use crate::db::error::RepositoryError;
use crate::db::models::session::{NewSession, Session, SessionRotation};
use crate::db::repositories::SessionStore;
use crate::db::schema::sessions;
use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;

pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create(&self, new_session: NewSession) -> Result<i64, RepositoryError> {
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(sessions::table)
                .values(&new_session)
                .returning(sessions::id)
                .get_result::<i64>(conn)
                .map_err(Into::into)
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Session>, RepositoryError> {
        run_blocking(&self.pool, move |conn| {
            sessions::table
                .find(id)
                .select(Session::as_select())
                .first::<Session>(conn)
                .optional()
                .map_err(Into::into)
        })
        .await
    }

    async fn rotate(
        &self,
        id: i64,
        current_hash: &str,
        rotation: SessionRotation,
    ) -> Result<(), RepositoryError> {
        let current_hash = current_hash.to_string();

        run_blocking(&self.pool, move |conn| {
            // Single statement: Postgres re-checks the WHERE clause against the
            // latest row version, so of two racing rotations only one matches.
            let updated = diesel::update(
                sessions::table
                    .filter(sessions::id.eq(id))
                    .filter(sessions::refresh_token_hash.eq(current_hash.as_str())),
            )
            .set(&rotation)
            .execute(conn)?;

            match updated {
                1 => Ok(()),
                0 => {
                    let still_there = diesel::select(exists(sessions::table.find(id)))
                        .get_result::<bool>(conn)?;
                    if still_there {
                        Err(RepositoryError::Conflict(format!(
                            "session {id} was rotated concurrently"
                        )))
                    } else {
                        Err(RepositoryError::NotFound(format!("session {id}")))
                    }
                }
                n => Err(RepositoryError::DatabaseError(format!(
                    "rotating session {id} touched {n} rows"
                ))),
            }
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        run_blocking(&self.pool, move |conn| {
            let deleted = diesel::delete(sessions::table.find(id)).execute(conn)?;

            match deleted {
                0 => Err(RepositoryError::NotFound(format!("session {id}"))),
                1 => Ok(()),
                n => Err(RepositoryError::DatabaseError(format!(
                    "deleting session {id} removed {n} rows"
                ))),
            }
        })
        .await
    }

    async fn delete_by_user(&self, user_id: i64) -> Result<usize, RepositoryError> {
        run_blocking(&self.pool, move |conn| {
            diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id)))
                .execute(conn)
                .map_err(Into::into)
        })
        .await
    }
}
