pub mod error;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;

use anyhow::{Context, Result};
use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use std::time::Duration;

pub type DbPool = diesel::r2d2::Pool<ConnectionManager<PgConnection>>;

pub fn create_pool(database_url: &str, max_size: u32, connect_timeout: Duration) -> Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    diesel::r2d2::Pool::builder()
        .max_size(max_size)
        .connection_timeout(connect_timeout)
        .build(manager)
        .context("Failed to create database pool")
}
