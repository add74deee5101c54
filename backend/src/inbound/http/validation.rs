//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies are checked field by field and every failure is reported
//! at once as a `400` with one entry per offending field.

use std::fmt;

use crate::domain::{
    Error, InvalidSettingKey, LoginValidationError, ProjectId, ProjectValidationError,
    SettingKey, Slug, UserId, UserValidationError,
};

pub(crate) const VALIDATION_FAILED: &str = "Validation failed";

/// Domain validation failure that knows which request field it concerns.
pub(crate) trait FieldFailure: fmt::Display {
    fn field(&self) -> &'static str;
}

impl FieldFailure for UserValidationError {
    fn field(&self) -> &'static str {
        Self::field(self)
    }
}

impl FieldFailure for ProjectValidationError {
    fn field(&self) -> &'static str {
        Self::field(self)
    }
}

impl FieldFailure for LoginValidationError {
    fn field(&self) -> &'static str {
        Self::field(self)
    }
}

impl FieldFailure for InvalidSettingKey {
    fn field(&self) -> &'static str {
        "key"
    }
}

/// Accumulates field failures while a request body is converted.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    /// Keep the value on success, record the failure otherwise.
    pub(crate) fn check<T, E: FieldFailure>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.0.push((error.field(), error.to_string()));
                None
            }
        }
    }

    /// Like [`Self::check`] for an optional input; `None` passes through.
    pub(crate) fn check_opt<T, E: FieldFailure>(
        &mut self,
        result: Option<Result<T, E>>,
    ) -> Option<T> {
        result.and_then(|result| self.check(result))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Single `400` carrying every recorded failure.
    pub(crate) fn into_error(self) -> Error {
        self.0.into_iter().fold(
            Error::invalid_request(VALIDATION_FAILED),
            |error, (field, message)| error.with_field_error(field, message),
        )
    }
}

fn single<E: FieldFailure>(error: &E) -> Error {
    Error::invalid_request(error.to_string()).with_field_error(error.field(), error.to_string())
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|error| single(&error))
}

pub(crate) fn parse_project_id(raw: &str) -> Result<ProjectId, Error> {
    ProjectId::new(raw).map_err(|error| single(&error))
}

pub(crate) fn parse_slug(raw: &str) -> Result<Slug, Error> {
    Slug::new(raw).map_err(|error| single(&error))
}

pub(crate) fn parse_setting_key(raw: &str) -> Result<SettingKey, Error> {
    SettingKey::new(raw).map_err(|error| single(&error))
}
