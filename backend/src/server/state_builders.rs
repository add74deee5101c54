//! Builders choosing the repository adapters behind the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use portfolio_backend::domain::ports::{PasswordHasher, SystemClock};
use portfolio_backend::inbound::http::state::{HttpState, HttpStatePorts};
use portfolio_backend::outbound::memory::{
    InMemoryProjectRepository, InMemorySettingsRepository, InMemoryUserRepository,
};
use portfolio_backend::outbound::persistence::{
    DbPool, DieselProjectRepository, DieselSettingsRepository, DieselUserRepository,
};
use portfolio_backend::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Repositories backed by PostgreSQL when a pool is configured, otherwise by
/// process memory.
fn build_ports(pool: Option<&DbPool>, hasher: Arc<dyn PasswordHasher>) -> HttpStatePorts {
    match pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            HttpStatePorts {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                projects: Arc::new(DieselProjectRepository::new(pool.clone())),
                settings: Arc::new(DieselSettingsRepository::new(pool.clone())),
                hasher,
            }
        }
        None => {
            info!("no database configured; using in-memory repositories");
            HttpStatePorts {
                users: Arc::new(InMemoryUserRepository::default()),
                projects: Arc::new(InMemoryProjectRepository::default()),
                settings: Arc::new(InMemorySettingsRepository::default()),
                hasher,
            }
        }
    }
}

/// Shared handler state for the configured adapters.
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = build_ports(
        config.db_pool.as_ref(),
        Arc::new(Argon2PasswordHasher::default()),
    );
    web::Data::new(HttpState::new(
        ports,
        config.session_policy,
        Arc::new(SystemClock),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_backend::domain::{
        Email, Error, NewUser, Password, PasswordHash, UserName, UserRole,
    };
    use portfolio_backend::domain::ports::PasswordHashError;
    use rstest::rstest;

    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
            Ok(PasswordHash::new(password.expose().to_owned()))
        }

        fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
            hash.as_str() == password
        }
    }

    #[rstest]
    #[tokio::test]
    async fn pool_absent_selects_in_memory_repositories() -> Result<(), Error> {
        let ports = build_ports(None, Arc::new(PlainHasher));
        let state = HttpState::new(
            ports,
            portfolio_backend::domain::SessionPolicy::default(),
            Arc::new(SystemClock),
        );
        let new_user = NewUser {
            email: Email::new("ada@example.com").expect("email"),
            name: UserName::new("Ada").expect("name"),
            password: Password::new("correct horse").expect("password"),
            role: UserRole::Admin,
            avatar: None,
        };

        let created = state.users.create(&new_user).await?;
        let fetched = state.users.find_by_id(&created.id).await?;

        assert_eq!(fetched, created);
        Ok(())
    }
}
