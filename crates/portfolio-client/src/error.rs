//! Client error taxonomy and user-facing message extraction.

use pagination::FieldError;
use tracing::{error, warn};

/// Message carried by [`ApiError::Network`].
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

pub(crate) const UNAUTHORIZED: u16 = 401;
const TOO_MANY_REQUESTS: u16 = 429;

/// Every way an API call can fail.
///
/// Call sites branch on the variant (or on [`ApiError::status_code`]) instead
/// of inspecting thrown values at runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server could not be reached at all. Status code 0.
    #[error("{message}")]
    Network {
        /// Human-readable description.
        message: String,
    },
    /// The server rejected the request with a 4xx status.
    #[error("{message}")]
    Client {
        /// HTTP status.
        status: u16,
        /// Envelope message, or a status-derived fallback.
        message: String,
        /// Field-level validation failures, possibly empty.
        errors: Vec<FieldError>,
    },
    /// The server failed with a 5xx (or otherwise unexpected) status.
    #[error("{message}")]
    Server {
        /// HTTP status.
        status: u16,
        /// Envelope message, or a status-derived fallback.
        message: String,
    },
    /// A 401 that could not be recovered because the session refresh failed.
    /// Carries the message of the original 401 response.
    #[error("{message}")]
    SessionExpired {
        /// Message from the original 401 response.
        message: String,
    },
    /// A 2xx response whose body was not a successful envelope with data.
    #[error("{message}")]
    InvalidResponse {
        /// HTTP status of the response.
        status: u16,
        /// Description of what was wrong with the body.
        message: String,
    },
    /// The request could not be built (bad URL or unserialisable body).
    #[error("{message}")]
    Encode {
        /// Description of the encoding failure.
        message: String,
    },
}

impl ApiError {
    /// Network failure with the fixed user-facing message.
    pub fn network() -> Self {
        Self::Network {
            message: NETWORK_ERROR_MESSAGE.to_owned(),
        }
    }

    /// Request encoding failure.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Classify a non-2xx response by status.
    pub fn from_status(status: u16, message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        let message = message.into();
        if (400..500).contains(&status) {
            Self::Client {
                status,
                message,
                errors,
            }
        } else {
            Self::Server { status, message }
        }
    }

    /// HTTP status associated with the failure; 0 when no response was
    /// received.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Network { .. } | Self::Encode { .. } => 0,
            Self::SessionExpired { .. } => UNAUTHORIZED,
            Self::Client { status, .. }
            | Self::Server { status, .. }
            | Self::InvalidResponse { status, .. } => *status,
        }
    }

    /// Top-level message.
    pub fn message(&self) -> &str {
        match self {
            Self::Network { message }
            | Self::Client { message, .. }
            | Self::Server { message, .. }
            | Self::SessionExpired { message }
            | Self::InvalidResponse { message, .. }
            | Self::Encode { message } => message,
        }
    }

    /// Field-level validation failures, empty for non-validation errors.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Client { errors, .. } => errors.as_slice(),
            _ => &[],
        }
    }

    /// 4xx rejection, including an unrecovered 401.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Client { .. } | Self::SessionExpired { .. })
    }

    /// 5xx failure.
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// The server could not be reached.
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// `429 Too Many Requests`; callers show tailored retry copy.
    pub const fn is_rate_limited(&self) -> bool {
        self.status_code() == TOO_MANY_REQUESTS
    }

    /// Best message to show a user: field errors joined with `", "` when
    /// present, otherwise the top-level message.
    pub fn user_message(&self) -> String {
        let errors = self.field_errors();
        if errors.is_empty() {
            self.message().to_owned()
        } else {
            errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Log the failure with a severity matching its class: client and
    /// network failures are expected in normal operation and log at `warn`,
    /// server and protocol failures log at `error`.
    pub fn log(&self, path: &str) {
        let status = self.status_code();
        match self {
            Self::Client { .. } | Self::SessionExpired { .. } => {
                warn!(path, status, message = self.message(), "api request rejected");
            }
            Self::Network { .. } => {
                warn!(path, "api request could not reach the server");
            }
            Self::Server { .. } | Self::InvalidResponse { .. } | Self::Encode { .. } => {
                error!(path, status, message = self.message(), "api request failed");
            }
        }
    }
}

/// Human-readable message for any caught error.
///
/// Priority: an [`ApiError`] with field errors yields them joined with
/// `", "`; any other [`ApiError`] yields its message; any other error
/// yields its display text; anything else (no error, or an error that
/// renders as blank) yields `fallback`.
///
/// # Examples
/// ```
/// use portfolio_client::{ApiError, FieldError, error_message};
///
/// let err = ApiError::from_status(
///     422,
///     "Validation failed",
///     vec![FieldError::new("a"), FieldError::new("b")],
/// );
/// assert_eq!(error_message(Some(&err), "Something went wrong"), "a, b");
/// assert_eq!(error_message(None, "Something went wrong"), "Something went wrong");
/// ```
pub fn error_message(error: Option<&(dyn std::error::Error + 'static)>, fallback: &str) -> String {
    let Some(error) = error else {
        return fallback.to_owned();
    };
    if let Some(api_error) = error.downcast_ref::<ApiError>() {
        return api_error.user_message();
    }
    let text = error.to_string();
    if text.trim().is_empty() {
        fallback.to_owned()
    } else {
        text
    }
}
