//! Test helpers for inbound HTTP components.

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;
use chrono::{DateTime, TimeDelta, Utc};

use super::state::{HttpState, HttpStatePorts};
use crate::domain::SessionPolicy;
use crate::domain::ports::Clock;
use crate::domain::test_support::PlainHasher;
use crate::outbound::memory::{
    InMemoryProjectRepository, InMemorySettingsRepository, InMemoryUserRepository,
};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Fixed instant used as "now" across handler tests.
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("fixed timestamp")
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.0.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

/// State over fresh in-memory repositories, plus the clock driving it.
pub fn test_state() -> (web::Data<HttpState>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let ports = HttpStatePorts {
        users: Arc::new(InMemoryUserRepository::default()),
        projects: Arc::new(InMemoryProjectRepository::default()),
        settings: Arc::new(InMemorySettingsRepository::default()),
        hasher: Arc::new(PlainHasher),
    };
    let state = HttpState::new(ports, SessionPolicy::default(), clock.clone());
    (web::Data::new(state), clock)
}

/// Account seeded by [`seed_user`]; its password is [`SEED_PASSWORD`].
pub const SEED_EMAIL: &str = "ada@example.com";
pub const SEED_PASSWORD: &str = "correct horse";

/// Insert the fixture account straight through the service.
pub async fn seed_user(state: &HttpState) -> crate::domain::User {
    let new_user = crate::domain::test_support::new_user(SEED_EMAIL, "Ada Lovelace");
    state.users.create(&new_user).await.expect("seed user")
}

/// App serving every `/api` route over `state`, as the server mounts it.
macro_rules! api_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state)
                .wrap(crate::Trace)
                .service(
                    actix_web::web::scope("/api")
                        .wrap(crate::inbound::http::test_utils::test_session_middleware())
                        .configure(crate::inbound::http::configure),
                ),
        )
        .await
    };
}
pub(crate) use api_app;

/// Session cookie from a response, if one was set.
pub fn session_cookie(
    res: &actix_web::dev::ServiceResponse,
) -> Option<actix_web::cookie::Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(actix_web::cookie::Cookie::into_owned)
}

/// Login request for the seeded account.
pub fn login_request() -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({ "email": SEED_EMAIL, "password": SEED_PASSWORD }))
}
