//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool through
//! `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use portfolio_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/portfolio")).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_helpers;
mod diesel_project_repository;
mod diesel_settings_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_settings_repository::DieselSettingsRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
