//! Credential checks behind the login endpoint.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::users_service::{USER_NOT_FOUND, map_persistence_error};
use crate::domain::{Error, LoginCredentials, User, UserId};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Authenticates users against stored password hashes.
#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    #[must_use]
    pub const fn new(repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    /// Verify `credentials` and return the matching user.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let stored = self
            .repo
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_persistence_error)?;
        let Some(stored) = stored else {
            warn!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
        {
            warn!(user_id = %stored.user.id, "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        info!(user_id = %stored.user.id, "login succeeded");
        Ok(stored.user)
    }

    /// The user behind an authenticated session.
    ///
    /// A session whose user has since been deleted is treated as
    /// unauthenticated.
    pub async fn current_user(&self, id: &UserId) -> Result<User, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::unauthorized(USER_NOT_FOUND))
    }
}
