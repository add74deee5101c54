//! OpenAPI documentation for the REST API.
//!
//! [`ApiDoc`] registers every `/api` handler, the health probes, and the
//! envelope schemas from [`crate::inbound::http::schemas`]. Swagger UI
//! serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::schemas::{AckSchema, FieldErrorSchema, PageMetaSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Portfolio CMS API",
        description = "Content API behind the portfolio site and its CMS.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::refresh,
        crate::inbound::http::auth::me,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::get_project_by_slug,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::projects::update_project,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::settings::get_setting,
        crate::inbound::http::settings::update_setting,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorEnvelope, FieldErrorSchema, PageMetaSchema, AckSchema)),
    tags(
        (name = "auth", description = "Session lifecycle"),
        (name = "users", description = "CMS accounts"),
        (name = "projects", description = "Portfolio entries"),
        (name = "settings", description = "Site-wide key/value settings"),
        (name = "health", description = "Orchestrator probes")
    )
)]
pub struct ApiDoc;
