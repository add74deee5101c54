//! Session handlers.
//!
//! ```text
//! POST /api/auth/login {"email":"ada@example.com","password":"..."}
//! POST /api/auth/refresh
//! POST /api/auth/logout
//! GET  /api/auth/me
//! ```

use actix_web::{get, post, web};
use pagination::Envelope;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::ApiResult;
use super::error::ErrorEnvelope;
use super::schemas::{AckSchema, EnvelopeSchema};
use super::session::SessionContext;
use super::state::HttpState;
use super::users::UserDto;
use super::validation::FieldErrors;
use crate::domain::{Error, LoginCredentials};

const SESSION_EXPIRED: &str = "Session expired";

/// Body of `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();
        errors
            .check(Self::try_from_parts(&value.email, &value.password))
            .ok_or_else(|| errors.into_error())
    }
}

/// Verify credentials and start a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = EnvelopeSchema<UserDto>,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 401, description = "Invalid email or password", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<Envelope<UserDto>>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let user = state.auth.login(&credentials).await?;
    let grant = state.session_policy.issue(user.id, state.now());
    session.persist_grant(&grant)?;
    Ok(web::Json(Envelope::ok("Login successful", user.into())))
}

/// Extend the access window while the refresh window is open.
///
/// A session past its refresh window is cleared and answered with `401`.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Session refreshed", body = AckSchema),
        (status = 401, description = "No session to refresh", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "refresh"
)]
#[post("/auth/refresh")]
pub async fn refresh(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Envelope<()>>> {
    let now = state.now();
    let renewed = session
        .grant()?
        .and_then(|grant| state.session_policy.renew(&grant, now));
    let Some(grant) = renewed else {
        session.purge();
        return Err(Error::unauthorized(SESSION_EXPIRED));
    };
    session.persist_grant(&grant)?;
    info!(user_id = %grant.user_id, "session refreshed");
    Ok(web::Json(Envelope::acknowledged("Session refreshed")))
}

/// End the session. Succeeds without a session too.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Signed out", body = AckSchema)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> web::Json<Envelope<()>> {
    session.purge();
    web::Json(Envelope::acknowledged("Logged out"))
}

/// The signed-in user.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = EnvelopeSchema<UserDto>),
        (status = 401, description = "Not signed in", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Envelope<UserDto>>> {
    let id = session.require_user(state.now())?;
    let user = state.auth.current_user(&id).await?;
    Ok(web::Json(Envelope::ok("Current user", user.into())))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
