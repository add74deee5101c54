//! Users API handlers.
//!
//! ```text
//! GET    /api/users?page=1&limit=10&role=editor&q=ada
//! POST   /api/users {"email":"ada@example.com","name":"Ada","password":"..."}
//! GET    /api/users/{id}
//! PUT    /api/users/{id} {"name":"Ada L."}
//! DELETE /api/users/{id}
//! ```
//!
//! Every route requires an authenticated session.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{Envelope, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::ApiResult;
use super::error::ErrorEnvelope;
use super::schemas::{AckSchema, EnvelopeSchema, PageEnvelopeSchema};
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldErrors, parse_user_id};
use crate::domain::{
    Email, NewUser, Password, User, UserChanges, UserFilter, UserListQuery, UserName, UserRole,
};

/// Account as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "editor")]
    pub role: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.to_string(),
            name: user.name.as_ref().to_owned(),
            role: user.role.as_str().to_owned(),
            avatar: user.avatar,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Query string for `GET /api/users`. Page values are parsed leniently.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListParams {
    /// One-based page; invalid values fall back to 1.
    pub page: Option<String>,
    /// Page size; invalid values fall back to 10, capped at 100.
    pub limit: Option<String>,
    /// `admin`, `editor`, or `user`.
    pub role: Option<String>,
    /// Case-insensitive match against email or name.
    pub q: Option<String>,
}

impl TryFrom<UserListParams> for UserListQuery {
    type Error = crate::domain::Error;

    fn try_from(params: UserListParams) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();
        let role = errors.check_opt(
            params
                .role
                .as_deref()
                .filter(|role| !role.trim().is_empty())
                .map(str::parse::<UserRole>),
        );
        if !errors.is_empty() {
            return Err(errors.into_error());
        }
        Ok(Self {
            page: PageRequest::parse(params.page.as_deref(), params.limit.as_deref()),
            filter: UserFilter::new(role, params.q.as_deref()),
        })
    }
}

/// Body of `POST /api/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// At least 8 characters.
    pub password: String,
    /// Defaults to `user`.
    pub role: Option<String>,
    pub avatar: Option<String>,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = crate::domain::Error;

    fn try_from(body: CreateUserRequest) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();
        let email = errors.check(Email::new(&body.email));
        let name = errors.check(UserName::new(&body.name));
        let password = errors.check(Password::new(body.password));
        let role = errors.check_opt(body.role.as_deref().map(str::parse::<UserRole>));

        match (email, name, password) {
            (Some(email), Some(name), Some(password)) if errors.is_empty() => Ok(Self {
                email,
                name,
                password,
                role: role.unwrap_or_default(),
                avatar: body.avatar,
            }),
            _ => Err(errors.into_error()),
        }
    }
}

/// Body of `PUT /api/users/{id}`. Email and password cannot be changed here.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub avatar: Option<String>,
}

impl TryFrom<UpdateUserRequest> for UserChanges {
    type Error = crate::domain::Error;

    fn try_from(body: UpdateUserRequest) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();
        let name = errors.check_opt(body.name.as_deref().map(UserName::new));
        let role = errors.check_opt(body.role.as_deref().map(str::parse::<UserRole>));
        if !errors.is_empty() {
            return Err(errors.into_error());
        }
        Ok(Self {
            name,
            role,
            avatar: body.avatar,
        })
    }
}

/// List users, newest first.
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListParams),
    responses(
        (status = 200, description = "One page of users", body = PageEnvelopeSchema<UserDto>),
        (status = 400, description = "Invalid filter", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 503, description = "Storage unavailable", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<UserListParams>,
) -> ApiResult<web::Json<Envelope<Vec<UserDto>>>> {
    session.require_user(state.now())?;
    let query = UserListQuery::try_from(params.into_inner())?;
    let page = state.users.find_all(&query).await?;
    Ok(web::Json(Envelope::page(
        "Users fetched",
        page.map(UserDto::from),
    )))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = EnvelopeSchema<UserDto>),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 409, description = "Email already exists", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    session.require_user(state.now())?;
    let new_user = NewUser::try_from(payload.into_inner())?;
    let user = state.users.create(&new_user).await?;
    Ok(HttpResponse::Created().json(Envelope::ok("User created", UserDto::from(user))))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = EnvelopeSchema<UserDto>),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<UserDto>>> {
    session.require_user(state.now())?;
    let id = parse_user_id(&path)?;
    let user = state.users.find_by_id(&id).await?;
    Ok(web::Json(Envelope::ok("User fetched", user.into())))
}

/// Partially update an account.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = EnvelopeSchema<UserDto>),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<Envelope<UserDto>>> {
    session.require_user(state.now())?;
    let id = parse_user_id(&path)?;
    let changes = UserChanges::try_from(payload.into_inner())?;
    let user = state.users.update(&id, &changes).await?;
    Ok(web::Json(Envelope::ok("User updated", user.into())))
}

/// Delete an account.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = AckSchema),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<()>>> {
    session.require_user(state.now())?;
    let id = parse_user_id(&path)?;
    state.users.delete(&id).await?;
    Ok(web::Json(Envelope::acknowledged("User deleted")))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
