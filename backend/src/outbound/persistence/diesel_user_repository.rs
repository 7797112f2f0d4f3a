//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUser, StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{DisplayName, EmailAddress, Role, User, UserId};

use super::diesel_error_mapping::{DieselFailure, classify, map_basic};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of account persistence.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic(
        classify(error),
        UserRepositoryError::connection,
        UserRepositoryError::query,
    )
}

fn decode(row: UserRow) -> Result<StoredCredentials, UserRepositoryError> {
    let (user, password_hash) = row
        .into_domain()
        .map_err(|err| UserRepositoryError::query(err.to_string()))?;
    Ok(StoredCredentials {
        user,
        password_hash,
    })
}

fn decode_user(row: UserRow) -> Result<User, UserRepositoryError> {
    decode(row).map(|stored| stored.user)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_ref(),
            role: user.role.as_str(),
        };

        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await;

        match inserted {
            Ok(row) => decode_user(row),
            Err(error) => Err(match classify(error) {
                DieselFailure::UniqueViolation { .. } => {
                    UserRepositoryError::duplicate_email(user.email.to_string())
                }
                other => map_basic(
                    other,
                    UserRepositoryError::connection,
                    UserRepositoryError::query,
                ),
            }),
        }
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(decode).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(decode_user).transpose()
    }

    async fn update_name(
        &self,
        id: UserId,
        name: &DisplayName,
    ) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = diesel::update(users::table.find(id.get()))
            .set(users::name.eq(name.as_ref()))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match row {
            Some(row) => decode_user(row),
            None => Err(UserRepositoryError::not_found(id.to_string())),
        }
    }

    async fn set_role(&self, email: &EmailAddress, role: Role) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = diesel::update(users::table.filter(users::email.eq(email.as_ref())))
            .set(users::role.eq(role.as_str()))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match row {
            Some(row) => decode_user(row),
            None => Err(UserRepositoryError::not_found(email.to_string())),
        }
    }
}
