//! HTTP inbound adapter exposing the REST endpoints under `/api`.

pub mod auth;
pub mod error;
pub mod health;
pub mod projects;
pub mod schemas;
pub mod session;
pub mod settings;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` route together with the extractor configs that
/// render malformed input as an error envelope.
///
/// The caller mounts this inside a scope wrapped by the session middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(auth::login)
        .service(auth::logout)
        .service(auth::refresh)
        .service(auth::me)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(projects::list_projects)
        .service(projects::create_project)
        .service(projects::get_project_by_slug)
        .service(projects::get_project)
        .service(projects::update_project)
        .service(projects::delete_project)
        .service(settings::get_setting)
        .service(settings::update_setting);
}
