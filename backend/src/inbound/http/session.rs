//! Session helpers keeping HTTP handlers free of framework details.
//!
//! The cookie stores the user id and two unix timestamps: when the access
//! window closes and when the refresh window closes. Handlers only see
//! [`SessionGrant`] values.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, SessionGrant, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ACCESS_EXP_KEY: &str = "access_exp";
pub(crate) const REFRESH_EXP_KEY: &str = "refresh_exp";

const AUTH_REQUIRED: &str = "Authentication required";
const ACCESS_EXPIRED: &str = "Access token expired";

/// Newtype wrapper exposing session operations in domain terms.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the underlying Actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store `grant` in the session cookie, replacing any previous grant.
    ///
    /// # Errors
    /// Internal error when the session cannot be serialised.
    pub fn persist_grant(&self, grant: &SessionGrant) -> Result<(), Error> {
        self.0.renew();
        self.insert(USER_ID_KEY, grant.user_id.to_string())?;
        self.insert(ACCESS_EXP_KEY, grant.access_expires_at.timestamp())?;
        self.insert(REFRESH_EXP_KEY, grant.refresh_expires_at.timestamp())
    }

    fn insert<T: serde::Serialize>(&self, key: &str, value: T) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        self.0
            .get::<T>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Grant stored in the session, if a complete and well-formed one exists.
    ///
    /// # Errors
    /// Internal error when the session cannot be read.
    pub fn grant(&self) -> Result<Option<SessionGrant>, Error> {
        let (Some(raw_id), Some(access), Some(refresh)) = (
            self.get::<String>(USER_ID_KEY)?,
            self.get::<i64>(ACCESS_EXP_KEY)?,
            self.get::<i64>(REFRESH_EXP_KEY)?,
        ) else {
            return Ok(None);
        };

        let user_id = match UserId::new(&raw_id) {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                return Ok(None);
            }
        };
        let (Some(access_expires_at), Some(refresh_expires_at)) = (
            DateTime::<Utc>::from_timestamp(access, 0),
            DateTime::<Utc>::from_timestamp(refresh, 0),
        ) else {
            warn!("invalid expiry in session cookie");
            return Ok(None);
        };

        Ok(Some(SessionGrant {
            user_id,
            access_expires_at,
            refresh_expires_at,
        }))
    }

    /// Require a grant whose access window is still open at `now`.
    ///
    /// # Errors
    /// `401` when no grant is stored or the access window has closed.
    pub fn require_user(&self, now: DateTime<Utc>) -> Result<UserId, Error> {
        let grant = self
            .grant()?
            .ok_or_else(|| Error::unauthorized(AUTH_REQUIRED))?;
        if grant.is_access_valid(now) {
            Ok(grant.user_id)
        } else {
            Err(Error::unauthorized(ACCESS_EXPIRED))
        }
    }

    /// Drop everything stored in the session and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
