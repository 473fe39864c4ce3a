use super::DbPool;
use crate::db::error::RepositoryError;
use anyhow::{Context, Result};
use diesel::r2d2::{ConnectionManager, CustomizeConnection};
use diesel::{PgConnection, RunQueryDsl};
use std::time::Duration;

/// Sets `statement_timeout` on every pooled connection, so a slow statement is
/// cancelled and rolled back by the server rather than left running.
#[derive(Debug, Clone, Copy)]
struct StatementTimeout(Duration);

impl StatementTimeout {
    fn sql(self) -> String {
        format!("SET statement_timeout = {}", self.0.as_millis())
    }
}

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for StatementTimeout {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query(self.sql())
            .execute(conn)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds the shared connection pool. Every request borrows from this pool;
/// nothing about users or sessions is cached in process.
///
/// `store_timeout` bounds both waiting for a connection and each statement.
pub fn create_pool(database_url: &str, max_size: u32, store_timeout: Duration) -> Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    diesel::r2d2::Pool::builder()
        .max_size(max_size)
        .connection_timeout(store_timeout)
        .connection_customizer(Box::new(StatementTimeout(store_timeout)))
        .build(manager)
        .context("Failed to create database pool")
}

/// Runs a Diesel closure on the blocking thread pool with a pooled connection.
///
/// If the awaiting future is dropped the statement keeps running on its thread
/// until it finishes or the server cancels it through `statement_timeout`.
pub async fn run_blocking<T, F>(pool: &DbPool, f: F) -> Result<T, RepositoryError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, RepositoryError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();

    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| RepositoryError::DatabaseError(format!("blocking task failed: {e}")))?
}
