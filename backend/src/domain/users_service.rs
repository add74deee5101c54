//! CRUD use-cases for user accounts.
//!
//! Every value handed back to callers is the safe [`User`] projection; the
//! password hash only travels between the repository and the hasher.

use std::sync::Arc;

use pagination::Paginated;
use tracing::info;

use crate::domain::ports::{PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository};
use crate::domain::{Error, NewUser, User, UserChanges, UserId, UserListQuery};

pub(crate) const USER_NOT_FOUND: &str = "User not found";
const EMAIL_TAKEN: &str = "Email already exists";

/// User account service.
#[derive(Clone)]
pub struct UsersService {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UsersService {
    /// Create a service over the given repository and hasher.
    #[must_use]
    pub const fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    /// One page of users, newest first, with the total across all pages.
    ///
    /// The page and the count are fetched concurrently under the same filter.
    pub async fn find_all(&self, query: &UserListQuery) -> Result<Paginated<User>, Error> {
        let (users, total) = tokio::try_join!(
            self.repo.list(&query.filter, query.page),
            self.repo.count(&query.filter),
        )
        .map_err(map_persistence_error)?;
        Ok(Paginated::new(users, query.page, total))
    }

    /// Fetch one user or fail with `NotFound`.
    pub async fn find_by_id(&self, id: &UserId) -> Result<User, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    /// Register a new account.
    ///
    /// Rejects an email that is already registered (exact match) before
    /// anything is hashed or stored. A concurrent registration that wins the
    /// race is reported by the repository and rejected the same way.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, Error> {
        let existing = self
            .repo
            .find_by_email(&new_user.email)
            .await
            .map_err(map_persistence_error)?;
        if existing.is_some() {
            return Err(email_taken());
        }

        let hash = self
            .hasher
            .hash(&new_user.password)
            .map_err(map_hash_error)?;
        let user = self
            .repo
            .insert(new_user, &hash)
            .await
            .map_err(map_persistence_error)?;
        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    /// Apply a partial update to an existing user.
    pub async fn update(&self, id: &UserId, changes: &UserChanges) -> Result<User, Error> {
        let current = self.find_by_id(id).await?;
        if changes.is_empty() {
            return Ok(current);
        }
        self.repo
            .update(id, changes)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    /// Remove an existing user.
    pub async fn delete(&self, id: &UserId) -> Result<(), Error> {
        self.find_by_id(id).await?;
        let deleted = self.repo.delete(id).await.map_err(map_persistence_error)?;
        if !deleted {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

pub(crate) fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { .. } => email_taken(),
    }
}

fn email_taken() -> Error {
    Error::conflict(EMAIL_TAKEN).with_field_error("email", EMAIL_TAKEN)
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

#[cfg(test)]
#[path = "users_service_tests.rs"]
mod tests;
