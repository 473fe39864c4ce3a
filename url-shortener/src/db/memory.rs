//! Test double for [`UrlStore`] with the same uniqueness rule as the `urls` table.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::db::error::StorageError;
use crate::db::models::{NewUrl, UrlRecord};
use crate::db::repository::UrlStore;

#[derive(Default)]
pub struct MemoryUrlStore {
    rows: Mutex<Vec<UrlRecord>>,
    next_id: Mutex<i64>,
    /// Saves that will report `AliasExists` before touching the rows.
    forced_collisions: Mutex<usize>,
}

impl MemoryUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<UrlRecord> {
        self.rows.lock().unwrap().clone()
    }

    /// Makes the next `n` saves fail with `AliasExists` regardless of alias.
    pub fn fail_next_saves(&self, n: usize) {
        *self.forced_collisions.lock().unwrap() = n;
    }
}

#[async_trait]
impl UrlStore for MemoryUrlStore {
    async fn save_url(&self, new_url: NewUrl) -> Result<i64, StorageError> {
        {
            let mut forced = self.forced_collisions.lock().unwrap();
            if *forced > 0 {
                *forced -= 1;
                return Err(StorageError::AliasExists);
            }
        }

        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.alias == new_url.alias) {
            return Err(StorageError::AliasExists);
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        rows.push(UrlRecord {
            id: *next_id,
            url: new_url.url,
            alias: new_url.alias,
            user_id: new_url.user_id,
        });
        Ok(*next_id)
    }

    async fn get_url(&self, alias: &str, user_id: i64) -> Result<String, StorageError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.alias == alias && r.user_id == user_id)
            .map(|r| r.url.clone())
            .ok_or(StorageError::AliasNotFound)
    }

    async fn get_user_urls(&self, user_id: i64) -> Result<Vec<UrlRecord>, StorageError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_url(&self, id: i64, url: &str, user_id: i64) -> Result<(), StorageError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && r.user_id == user_id)
            .ok_or(StorageError::UrlNotFound)?;
        row.url = url.to_string();
        Ok(())
    }

    async fn delete_alias(&self, id: i64, user_id: i64) -> Result<(), StorageError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.id == id && r.user_id == user_id));
        if rows.len() == before {
            return Err(StorageError::AliasNotFound);
        }
        Ok(())
    }

    async fn delete_user_data(&self, user_id: i64) -> Result<usize, StorageError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.user_id != user_id);
        Ok(before - rows.len())
    }
}
