//! User accounts.
//!
//! [`User`] is the safe projection handed to adapters: it has no password
//! field at all. Password material only exists as a plain [`Password`] on
//! the way in and as an opaque [`PasswordHash`] inside persistence.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use pagination::PageRequest;
use regex::Regex;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Maximum length of a user's display name.
pub const USER_NAME_MAX: usize = 100;
/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 255;
/// Minimum length of a new password.
pub const PASSWORD_MIN: usize = 8;

/// Validation failures for user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    EmptyName,
    NameTooLong { max: usize },
    UnknownRole(String),
    PasswordTooShort { min: usize },
}

impl UserValidationError {
    /// Request field the failure relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyEmail | Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::UnknownRole(_) => "role",
            Self::PasswordTooShort { .. } => "password",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "Email is required"),
            Self::InvalidEmail => write!(f, "Email must be a valid email address"),
            Self::EmailTooLong { max } => write!(f, "Email must be at most {max} characters"),
            Self::EmptyName => write!(f, "Name is required"),
            Self::NameTooLong { max } => write!(f, "Name must be at most {max} characters"),
            Self::UnknownRole(role) => {
                write!(f, "Role must be one of admin, editor, user (got {role})")
            }
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a textual UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref().trim())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID, for example a database key.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address, trimmed but otherwise stored exactly as given.
///
/// Case is preserved and comparisons are case-sensitive, so `Ada@x.io` and
/// `ada@x.io` are distinct addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and construct an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let email = email.as_ref().trim();
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name shown in the CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a display name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if name.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(name.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Access level of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UserRole {
    /// Full access, including user management.
    Admin,
    /// Manages content.
    Editor,
    /// Read-only access.
    #[default]
    User,
}

impl UserRole {
    /// Lowercase wire and storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::User => "user",
        }
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "user" => Ok(Self::User),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain-text password supplied when creating an account. Wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a new password.
    pub fn new(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = Zeroizing::new(password.into());
        if password.chars().count() < PASSWORD_MIN {
            return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(password))
    }

    /// Password text.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(..)")
    }
}

/// Stored password hash in PHC string format. Never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC hash string.
    #[must_use]
    pub const fn new(phc: String) -> Self {
        Self(phc)
    }

    /// PHC hash string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Account as exposed outside persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: UserName,
    pub role: UserRole,
    /// Avatar image URL.
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Last modification; equal to `created_at` until the first update.
    pub updated_at: DateTime<Utc>,
}

/// Account together with its password hash, for credential checks only.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: PasswordHash,
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: UserName,
    pub password: Password,
    pub role: UserRole,
    pub avatar: Option<String>,
}

/// Partial update of an account. Email and password cannot be changed
/// through this path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<UserName>,
    pub role: Option<UserRole>,
    pub avatar: Option<String>,
}

impl UserChanges {
    /// Whether nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.avatar.is_none()
    }
}

/// Filters applied to both the list and the count query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    /// Case-insensitive substring matched against email or name.
    pub search: Option<String>,
}

impl UserFilter {
    /// Build a filter, discarding a blank search term.
    #[must_use]
    pub fn new(role: Option<UserRole>, search: Option<&str>) -> Self {
        Self {
            role,
            search: normalise_search(search),
        }
    }
}

/// One page of users under a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListQuery {
    pub page: PageRequest,
    pub filter: UserFilter,
}

pub(crate) fn normalise_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", "ada@example.com")]
    #[case("  Ada@Example.com ", "Ada@Example.com")]
    fn email_is_trimmed_and_keeps_case(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Email::new(raw).expect("valid email").as_ref(), expected);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("ada", UserValidationError::InvalidEmail)]
    #[case("ada@example", UserValidationError::InvalidEmail)]
    #[case("a da@example.com", UserValidationError::InvalidEmail)]
    fn invalid_emails_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn differently_cased_emails_are_distinct() {
        let lower = Email::new("ada@example.com").expect("valid");
        let upper = Email::new("ADA@example.com").expect("valid");
        assert_ne!(lower, upper);
    }

    #[rstest]
    #[case("admin", UserRole::Admin)]
    #[case("editor", UserRole::Editor)]
    #[case("user", UserRole::User)]
    fn roles_parse_from_lowercase(#[case] raw: &str, #[case] role: UserRole) {
        assert_eq!(raw.parse::<UserRole>(), Ok(role));
        assert_eq!(role.as_str(), raw);
    }

    #[rstest]
    fn unknown_role_is_rejected() {
        let err = "owner".parse::<UserRole>().expect_err("unknown role");
        assert_eq!(err.field(), "role");
    }

    #[rstest]
    fn default_role_is_user() {
        assert_eq!(UserRole::default(), UserRole::User);
    }

    #[rstest]
    fn name_length_is_bounded() {
        assert_eq!(UserName::new(" "), Err(UserValidationError::EmptyName));
        assert!(UserName::new("a".repeat(USER_NAME_MAX)).is_ok());
        assert_eq!(
            UserName::new("a".repeat(USER_NAME_MAX + 1)),
            Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX
            })
        );
    }

    #[rstest]
    fn short_passwords_are_rejected() {
        assert!(Password::new("hunter2").is_err());
        assert!(Password::new("correct horse").is_ok());
    }

    #[rstest]
    fn secrets_are_redacted_in_debug_output() {
        let password = Password::new("correct horse").expect("valid");
        let hash = PasswordHash::new("$argon2id$v=19$...".to_owned());
        assert_eq!(format!("{password:?}"), "Password(..)");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }

    #[rstest]
    #[case(Some("  "), None)]
    #[case(None, None)]
    #[case(Some(" ada "), Some("ada"))]
    fn blank_search_terms_are_dropped(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let filter = UserFilter::new(None, raw);
        assert_eq!(filter.search.as_deref(), expected);
    }
}
