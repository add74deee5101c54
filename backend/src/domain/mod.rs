//! Domain types, ports, and services.
//!
//! Nothing in here knows about HTTP or SQL. Inbound adapters call the
//! services; outbound adapters implement [`ports`].
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: failures returned by every service.
//! - [`UsersService`], [`ProjectsService`], [`SettingsService`],
//!   [`AuthService`]: the use-cases.
//! - [`SessionPolicy`] and [`SessionGrant`]: session lifetime rules.

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod ports;
pub mod project;
pub mod projects_service;
pub mod setting;
pub mod settings_service;
#[cfg(test)]
pub(crate) mod test_support;
pub mod trace_id;
pub mod user;
pub mod users_service;

pub use self::auth::{LoginCredentials, LoginValidationError, SessionGrant, SessionPolicy};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode};
pub use self::project::{
    NewProject, Project, ProjectChanges, ProjectFilter, ProjectId, ProjectListQuery,
    ProjectStatus, ProjectTitle, ProjectValidationError, Slug,
};
pub use self::projects_service::ProjectsService;
pub use self::setting::{InvalidSettingKey, Setting, SettingKey, WELL_KNOWN_KEYS};
pub use self::settings_service::SettingsService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, NewUser, Password, PasswordHash, User, UserChanges, UserCredentials, UserFilter,
    UserId, UserListQuery, UserName, UserRole, UserValidationError,
};
pub use self::users_service::UsersService;

/// Name of the response header echoing the request [`TraceId`].
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use portfolio_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
