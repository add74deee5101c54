//! Login credentials and the session lifetime policy.
//!
//! A session carries two expiries. The access expiry gates protected routes
//! and is short; the refresh expiry bounds how long the access expiry may be
//! extended without logging in again.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use zeroize::Zeroizing;

use super::user::{Email, UserId, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    Email(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl LoginValidationError {
    /// Request field the failure relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "Password is required"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `email` passes [`Email`] validation.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use portfolio_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email).map_err(LoginValidationError::Email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Password provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Default lifetime of the access expiry.
pub const DEFAULT_ACCESS_TTL_SECS: u64 = 15 * 60;
/// Default lifetime of the refresh expiry.
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Lifetimes applied when issuing and renewing sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            access_ttl: TimeDelta::minutes(15),
            refresh_ttl: TimeDelta::days(7),
        }
    }
}

impl SessionPolicy {
    /// Build a policy from lifetimes in seconds. Returns `None` when either
    /// lifetime is zero or out of range.
    #[must_use]
    pub fn from_secs(access_ttl: u64, refresh_ttl: u64) -> Option<Self> {
        let to_delta = |secs: u64| {
            i64::try_from(secs)
                .ok()
                .filter(|secs| *secs > 0)
                .and_then(TimeDelta::try_seconds)
        };
        Some(Self {
            access_ttl: to_delta(access_ttl)?,
            refresh_ttl: to_delta(refresh_ttl)?,
        })
    }

    /// Access lifetime.
    #[must_use]
    pub const fn access_ttl(&self) -> TimeDelta {
        self.access_ttl
    }

    /// Refresh lifetime.
    #[must_use]
    pub const fn refresh_ttl(&self) -> TimeDelta {
        self.refresh_ttl
    }

    /// Start a session for `user_id` at `now`.
    #[must_use]
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> SessionGrant {
        SessionGrant {
            user_id,
            access_expires_at: now + self.access_ttl,
            refresh_expires_at: now + self.refresh_ttl,
        }
    }

    /// Extend the access expiry of `grant`.
    ///
    /// Returns `None` once the refresh expiry has passed. The renewed access
    /// expiry never outlives the refresh expiry.
    #[must_use]
    pub fn renew(&self, grant: &SessionGrant, now: DateTime<Utc>) -> Option<SessionGrant> {
        if !grant.is_refresh_valid(now) {
            return None;
        }
        Some(SessionGrant {
            access_expires_at: (now + self.access_ttl).min(grant.refresh_expires_at),
            ..*grant
        })
    }
}

/// Authenticated session state as stored in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionGrant {
    pub user_id: UserId,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl SessionGrant {
    /// Whether protected routes may be served at `now`.
    #[must_use]
    pub fn is_access_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.access_expires_at
    }

    /// Whether the session may still be renewed at `now`.
    #[must_use]
    pub fn is_refresh_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.refresh_expires_at
    }
}
