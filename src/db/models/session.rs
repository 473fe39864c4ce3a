use crate::db::schema::sessions;
use diesel::{AsChangeset, Insertable, Queryable, Selectable};

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = sessions)]
pub struct NewSession {
    pub user_id: i64,
    pub refresh_token_hash: String,
    pub created_at: i64,
    pub expires_at: i64,
}

/// One refresh-token lineage. Timestamps are unix seconds.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub refresh_token_hash: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl Session {
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

/// New secret hash and validity window written by a rotation.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = sessions)]
pub struct SessionRotation {
    pub refresh_token_hash: String,
    pub created_at: i64,
    pub expires_at: i64,
}
