//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Email, NewUser, PasswordHash, User, UserChanges, UserCredentials, UserFilter, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Duplicate { message: String } => "user repository rejected duplicate: {message}",
    }
}

/// Storage for user accounts.
///
/// Only [`UserRepository::find_credentials_by_email`] ever returns the
/// password hash; every other read yields the safe [`User`] projection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Users matching `filter`, newest first, limited to `page`.
    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Vec<User>, UserPersistenceError>;

    /// Number of users matching `filter`, ignoring pagination.
    async fn count(&self, filter: &UserFilter) -> Result<u64, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user together with the stored password hash.
    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError>;

    /// Store a new account and return its safe projection.
    async fn insert(
        &self,
        user: &NewUser,
        password_hash: &PasswordHash,
    ) -> Result<User, UserPersistenceError>;

    /// Apply `changes` and return the updated user, or `None` when absent.
    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove a user. Returns whether a row was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
