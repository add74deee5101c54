//! Site settings handlers.
//!
//! A setting's value is an arbitrary JSON document owned by the CMS view
//! that edits it. `data` in both responses is that document.

use actix_web::{get, put, web};
use pagination::Envelope;
use serde_json::Value;

use super::ApiResult;
use super::error::ErrorEnvelope;
use super::schemas::ValueEnvelopeSchema;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::parse_setting_key;
use crate::domain::Error;

/// Read one setting.
#[utoipa::path(
    get,
    path = "/api/settings/{key}",
    params(("key" = String, Path, description = "Setting key, e.g. `branding`")),
    responses(
        (status = 200, description = "Stored value", body = ValueEnvelopeSchema),
        (status = 400, description = "Malformed key", body = ErrorEnvelope),
        (status = 404, description = "Setting not found", body = ErrorEnvelope)
    ),
    tags = ["settings"],
    operation_id = "getSetting",
    security([])
)]
#[get("/settings/{key}")]
pub async fn get_setting(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<Value>>> {
    let key = parse_setting_key(&path)?;
    let setting = state.settings.get(&key).await?;
    Ok(web::Json(Envelope::ok("Setting fetched", setting.value)))
}

/// Replace one setting, creating it when absent.
#[utoipa::path(
    put,
    path = "/api/settings/{key}",
    params(("key" = String, Path, description = "Setting key, e.g. `branding`")),
    request_body(content = Object, description = "New value"),
    responses(
        (status = 200, description = "Stored value", body = ValueEnvelopeSchema),
        (status = 400, description = "Malformed key or value", body = ErrorEnvelope),
        (status = 401, description = "Not signed in", body = ErrorEnvelope)
    ),
    tags = ["settings"],
    operation_id = "updateSetting"
)]
#[put("/settings/{key}")]
pub async fn update_setting(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<Envelope<Value>>> {
    session.require_user(state.now())?;
    let key = parse_setting_key(&path)?;
    let value = payload.into_inner();
    if value.is_null() {
        return Err(Error::invalid_request("Setting value is required")
            .with_field_error("value", "Setting value is required"));
    }
    let setting = state.settings.update(&key, &value).await?;
    Ok(web::Json(Envelope::ok("Setting updated", setting.value)))
}
