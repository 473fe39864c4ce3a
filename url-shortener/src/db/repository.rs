use async_trait::async_trait;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::db::error::StorageError;
use crate::db::models::{NewUrl, UrlRecord};
use crate::db::schema::urls;

/// Short links, always scoped to the owning user.
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// `AliasExists` when the alias is taken.
    async fn save_url(&self, new_url: NewUrl) -> Result<i64, StorageError>;

    /// `AliasNotFound` unless `user_id` owns `alias`.
    async fn get_url(&self, alias: &str, user_id: i64) -> Result<String, StorageError>;

    async fn get_user_urls(&self, user_id: i64) -> Result<Vec<UrlRecord>, StorageError>;

    /// Points an existing link at a new target. `UrlNotFound` when no row matches.
    async fn update_url(&self, id: i64, url: &str, user_id: i64) -> Result<(), StorageError>;

    /// `AliasNotFound` when no row matches.
    async fn delete_alias(&self, id: i64, user_id: i64) -> Result<(), StorageError>;

    /// Removes every link of `user_id`, returning how many were deleted.
    async fn delete_user_data(&self, user_id: i64) -> Result<usize, StorageError>;
}

pub struct UrlRepository {
    pool: DbPool,
}

impl UrlRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StorageError::Database(format!("blocking task failed: {e}")))?
    }
}

#[async_trait]
impl UrlStore for UrlRepository {
    async fn save_url(&self, new_url: NewUrl) -> Result<i64, StorageError> {
        self.run(move |conn| {
            Ok(diesel::insert_into(urls::table)
                .values(&new_url)
                .returning(urls::id)
                .get_result(conn)?)
        })
        .await
    }

    async fn get_url(&self, alias: &str, user_id: i64) -> Result<String, StorageError> {
        let alias = alias.to_string();
        self.run(move |conn| {
            urls::table
                .filter(urls::alias.eq(alias.as_str()))
                .filter(urls::user_id.eq(user_id))
                .select(urls::url)
                .first::<String>(conn)
                .optional()?
                .ok_or(StorageError::AliasNotFound)
        })
        .await
    }

    async fn get_user_urls(&self, user_id: i64) -> Result<Vec<UrlRecord>, StorageError> {
        self.run(move |conn| {
            Ok(urls::table
                .filter(urls::user_id.eq(user_id))
                .order(urls::id.asc())
                .select(UrlRecord::as_select())
                .load(conn)?)
        })
        .await
    }

    async fn update_url(&self, id: i64, url: &str, user_id: i64) -> Result<(), StorageError> {
        let url = url.to_string();
        self.run(move |conn| {
            let updated = diesel::update(
                urls::table
                    .filter(urls::id.eq(id))
                    .filter(urls::user_id.eq(user_id)),
            )
            .set(urls::url.eq(url.as_str()))
            .execute(conn)?;

            match updated {
                0 => Err(StorageError::UrlNotFound),
                _ => Ok(()),
            }
        })
        .await
    }

    async fn delete_alias(&self, id: i64, user_id: i64) -> Result<(), StorageError> {
        self.run(move |conn| {
            let deleted = diesel::delete(
                urls::table
                    .filter(urls::id.eq(id))
                    .filter(urls::user_id.eq(user_id)),
            )
            .execute(conn)?;

            match deleted {
                0 => Err(StorageError::AliasNotFound),
                _ => Ok(()),
            }
        })
        .await
    }

    async fn delete_user_data(&self, user_id: i64) -> Result<usize, StorageError> {
        self.run(move |conn| {
            Ok(diesel::delete(urls::table.filter(urls::user_id.eq(user_id))).execute(conn)?)
        })
        .await
    }
}
