use crate::db::DbPool;
use crate::db::connection::run_blocking;
use crate::db::error::RepositoryError;
use crate::db::models::user::{NewUser, User, UserRow};
use crate::db::repositories::UserStore;
use crate::db::schema::users;
use async_trait::async_trait;
use diesel::prelude::*;

pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, new_user: NewUser) -> Result<i64, RepositoryError> {
        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(users::table)
                .values(&new_user)
                .returning(users::id)
                .get_result::<i64>(conn)
                .map_err(Into::into)
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let email = email.to_string();

        let row = run_blocking(&self.pool, move |conn| {
            users::table
                .filter(users::email.eq(email))
                .select(UserRow::as_select())
                .first::<UserRow>(conn)
                .optional()
                .map_err(Into::into)
        })
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let row = run_blocking(&self.pool, move |conn| {
            users::table
                .find(id)
                .select(UserRow::as_select())
                .first::<UserRow>(conn)
                .optional()
                .map_err(Into::into)
        })
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        run_blocking(&self.pool, move |conn| {
            let deleted = diesel::delete(users::table.find(id)).execute(conn)?;

            match deleted {
                0 => Err(RepositoryError::NotFound(format!("user {id}"))),
                1 => Ok(()),
                n => Err(RepositoryError::DatabaseError(format!(
                    "deleting user {id} removed {n} rows"
                ))),
            }
        })
        .await
    }
}
