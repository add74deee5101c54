//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only talk to domain services,
//! so they stay testable without I/O.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::ports::{
    Clock, PasswordHasher, ProjectRepository, SettingsRepository, UserRepository,
};
use crate::domain::{AuthService, ProjectsService, SessionPolicy, SettingsService, UsersService};

/// Parameter object bundling the port implementations behind the services.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: UsersService,
    pub projects: ProjectsService,
    pub settings: SettingsService,
    pub auth: AuthService,
    pub session_policy: SessionPolicy,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Wire the services over `ports`.
    #[must_use]
    pub fn new(ports: HttpStatePorts, session_policy: SessionPolicy, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            users,
            projects,
            settings,
            hasher,
        } = ports;
        Self {
            users: UsersService::new(Arc::clone(&users), Arc::clone(&hasher)),
            projects: ProjectsService::new(projects),
            settings: SettingsService::new(settings),
            auth: AuthService::new(users, hasher),
            session_policy,
            clock,
        }
    }

    /// Current time according to the configured clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
