//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, NewUser, PasswordHash, User, UserChanges, UserCredentials, UserFilter, UserId,
    UserName, UserRole,
};
use pagination::PageRequest;

use super::diesel_helpers::{
    contains_pattern, count_to_u64, limit_offset, map_diesel_error, map_pool_error,
};
use super::models::{NewUserRow, UserCredentialsRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed user storage.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
        UserPersistenceError::duplicate,
    )
}

fn filtered<'a, ST>(
    mut query: users::BoxedQuery<'a, Pg, ST>,
    filter: &UserFilter,
) -> users::BoxedQuery<'a, Pg, ST> {
    if let Some(role) = filter.role {
        query = query.filter(users::role.eq(role.as_str()));
    }
    if let Some(term) = filter.search.as_deref() {
        let pattern = contains_pattern(term);
        query = query.filter(
            users::email
                .ilike(pattern.clone())
                .or(users::name.ilike(pattern)),
        );
    }
    query
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |field: &str| {
        warn!(user_id = %row.id, field, "stored user row failed validation");
        UserPersistenceError::query(format!("stored user has invalid {field}"))
    };
    let email = Email::new(&row.email).map_err(|_| invalid("email"))?;
    let name = UserName::new(&row.name).map_err(|_| invalid("name"))?;
    let role = UserRole::from_str(&row.role).unwrap_or_else(|_| {
        warn!(user_id = %row.id, role = %row.role, "unrecognised role, defaulting to user");
        UserRole::User
    });
    Ok(User {
        id: UserId::from_uuid(row.id),
        email,
        name,
        role,
        avatar: row.avatar,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let (limit, offset) = limit_offset(page);
        let rows: Vec<UserRow> = filtered(users::table.select(UserRow::as_select()).into_boxed(), filter)
            .order((users::created_at.desc(), users::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let total: i64 = filtered(users::table.select(diesel::dsl::count_star()).into_boxed(), filter)
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(count_to_u64(total))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserCredentialsRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserCredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(|row| {
            Ok(UserCredentials {
                user: row_to_user(row.user)?,
                password_hash: PasswordHash::new(row.password_hash),
            })
        })
        .transpose()
    }

    async fn insert(
        &self,
        user: &NewUser,
        password_hash: &PasswordHash,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            id: *UserId::random().as_uuid(),
            email: user.email.as_ref(),
            name: user.name.as_ref(),
            password_hash: password_hash.as_str(),
            role: user.role.as_str(),
            avatar: user.avatar.as_deref(),
        };
        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_user(stored)
    }

    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let update = UserUpdate {
            name: changes.name.as_ref().map(AsRef::as_ref),
            role: changes.role.map(UserRole::as_str),
            avatar: changes.avatar.as_deref(),
            updated_at: Utc::now(),
        };
        let row: Option<UserRow> = diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(&update)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(users::table.filter(users::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
