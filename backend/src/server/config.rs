//! Server settings loaded via OrthoConfig and the resolved server config.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use portfolio_backend::domain::SessionPolicy;
use portfolio_backend::domain::auth::{DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS};
use portfolio_backend::outbound::persistence::DbPool;

use super::session_key::{BuildMode, SessionConfigError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Environment and CLI driven settings, prefixed `PORTFOLIO_`.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTFOLIO")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. In-memory storage is used when unset.
    pub database_url: Option<String>,
    /// File holding at least 64 bytes of session key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`. Defaults to on.
    pub cookie_secure: Option<bool>,
    /// `Strict`, `Lax`, or `None`.
    pub same_site: Option<String>,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_key: bool,
    /// Lifetime of the access window in seconds.
    pub access_ttl_secs: Option<u64>,
    /// Lifetime of the refresh window in seconds.
    pub refresh_ttl_secs: Option<u64>,
}

impl ServerSettings {
    /// Parsed bind address.
    ///
    /// # Errors
    /// [`SessionConfigError::InvalidValue`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SessionConfigError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SessionConfigError::InvalidValue {
            name: "bind_addr",
            value: raw.to_owned(),
            expected: "host:port",
        })
    }

    /// Configured database URL, ignoring blank values.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    #[must_use]
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Cookie `SameSite` policy. `None` requires a secure cookie in release
    /// builds.
    ///
    /// # Errors
    /// When the value is unknown, or `None` is combined with an insecure
    /// cookie in release builds.
    pub fn same_site(&self, mode: BuildMode) -> Result<SameSite, SessionConfigError> {
        let Some(raw) = self.same_site.as_deref() else {
            return Ok(SameSite::Lax);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" if !self.cookie_secure() && mode == BuildMode::Release => {
                Err(SessionConfigError::InsecureSameSiteNone)
            }
            "none" => Ok(SameSite::None),
            _ => Err(SessionConfigError::InvalidValue {
                name: "same_site",
                value: raw.to_owned(),
                expected: "Strict|Lax|None",
            }),
        }
    }

    /// Session lifetimes, falling back to 15 minutes and 7 days.
    ///
    /// # Errors
    /// When either lifetime is zero or too large.
    pub fn session_policy(&self) -> Result<SessionPolicy, SessionConfigError> {
        let access = self.access_ttl_secs.unwrap_or(DEFAULT_ACCESS_TTL_SECS);
        let refresh = self.refresh_ttl_secs.unwrap_or(DEFAULT_REFRESH_TTL_SECS);
        SessionPolicy::from_secs(access, refresh).ok_or_else(|| SessionConfigError::InvalidValue {
            name: "access_ttl_secs/refresh_ttl_secs",
            value: format!("{access}/{refresh}"),
            expected: "positive seconds",
        })
    }
}

/// Everything the server needs once settings have been resolved.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session_policy: SessionPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub const fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        session_policy: SessionPolicy,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            session_policy,
            db_pool: None,
        }
    }

    /// Use PostgreSQL-backed repositories instead of in-memory ones.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
