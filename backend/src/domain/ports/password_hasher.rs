//! Port for one-way password hashing.

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Failures raised while hashing a password.
    pub enum PasswordHashError {
        /// The hashing backend rejected the input or its parameters.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Produces and checks password hashes.
///
/// Implementations are CPU bound and synchronous.
pub trait PasswordHasher: Send + Sync {
    /// Hash a validated password with a fresh salt.
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    /// Whether `password` matches `hash`. Malformed hashes never match.
    fn verify(&self, password: &str, hash: &PasswordHash) -> bool;
}
