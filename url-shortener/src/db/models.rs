use crate::db::schema::urls;
use diesel::{Insertable, Queryable, Selectable};
use sso_api::UrlResponse;

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = urls)]
pub struct NewUrl {
    pub url: String,
    pub alias: String,
    pub user_id: i64,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = urls)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UrlRecord {
    pub id: i64,
    pub url: String,
    pub alias: String,
    pub user_id: i64,
}

impl From<UrlRecord> for UrlResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            id: record.id,
            url: record.url,
            alias: record.alias,
        }
    }
}
