//! Domain ports for the hexagonal boundary.
//!
//! Outbound adapters implement these traits; services depend on them through
//! `Arc<dyn _>` so tests can substitute in-memory doubles.

mod macros;
pub(crate) use macros::define_port_error;

mod clock;
mod password_hasher;
mod project_repository;
mod settings_repository;
mod user_repository;

pub use clock::{Clock, SystemClock};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use project_repository::{ProjectPersistenceError, ProjectRepository};
pub use settings_repository::{SettingsPersistenceError, SettingsRepository};
pub use user_repository::{UserPersistenceError, UserRepository};
