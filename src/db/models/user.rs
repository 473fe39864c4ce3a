use crate::db::error::RepositoryError;
use crate::db::schema::users;
use diesel::{Insertable, Queryable, Selectable};
use sso_api::Role;

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role_id: i32,
}

impl NewUser {
    pub fn new(email: impl Into<String>, password_hash: String, role: Role) -> Self {
        Self {
            email: email.into(),
            password_hash,
            role_id: role.id(),
        }
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role_id: i32,
}

/// A user as the auth core sees it, with the role resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_id(row.role_id).ok_or_else(|| {
            RepositoryError::DatabaseError(format!(
                "user {} has unknown role_id {}",
                row.id, row.role_id
            ))
        })?;

        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role,
        })
    }
}
