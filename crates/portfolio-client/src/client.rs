//! Request execution: envelope decoding, 401 recovery, and retries.

use std::sync::Arc;
use std::time::Duration;

use pagination::Envelope;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientSettings;
use crate::error::{ApiError, UNAUTHORIZED};
use crate::events::{ClientEvents, NoOpClientEvents, Notification};
use crate::refresh::RefreshCoordinator;
use crate::request::ApiRequest;
use crate::resources::{
    AuthApi, ContactApi, CrudResource, MediaApi, Page, PostsApi, SettingsApi, StatsApi,
};
use crate::transport::{RawResponse, ReqwestTransport, Transport};

/// Path of the session refresh endpoint.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Shared handle to the portfolio API.
///
/// Cloning is cheap; clones share the transport, cookie session, and
/// refresh coordinator.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: String,
    transport: Arc<dyn Transport>,
    events: Arc<dyn ClientEvents>,
    refresh: RefreshCoordinator,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("refresh", &self.inner.refresh)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: String,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
    events: Arc<dyn ClientEvents>,
}

impl ApiClientBuilder {
    /// Per-request timeout of the default reqwest transport.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the default reqwest transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Receive session, message, and notification events.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn ClientEvents>) -> Self {
        self.events = events;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns [`ApiError::Encode`] when the default HTTP client cannot be
    /// constructed.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let transport = ReqwestTransport::new(self.timeout).map_err(|error| {
                    ApiError::encode(format!("failed to build HTTP client: {error}"))
                })?;
                Arc::new(transport)
            }
        };
        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                base_url: self.base_url,
                transport,
                events: self.events,
                refresh: RefreshCoordinator::new(),
            }),
        })
    }
}

impl ApiClient {
    /// Start building a client rooted at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            transport: None,
            events: Arc::new(NoOpClientEvents),
        }
    }

    /// Build a client with the reqwest transport from loaded settings.
    ///
    /// # Errors
    /// See [`ApiClientBuilder::build`].
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ApiError> {
        Self::builder(settings.base_url())
            .timeout(settings.timeout())
            .build()
    }

    /// Base URL every request path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Whether a session refresh is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_refreshing()
    }

    /// Forward a notification to the injected events sink.
    pub fn notify(&self, notification: Notification) {
        self.inner.events.notify(notification);
    }

    pub(crate) fn events(&self) -> &dyn ClientEvents {
        self.inner.events.as_ref()
    }

    /// Send `request` and decode the envelope's `data` as `T`.
    ///
    /// # Errors
    /// Any [`ApiError`]; a successful envelope without data is
    /// [`ApiError::InvalidResponse`].
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let (status, envelope) = self.execute(&request).await?;
        let data = envelope.data.ok_or_else(|| ApiError::InvalidResponse {
            status,
            message: "Response did not include data".to_owned(),
        })?;
        decode_data(status, data)
    }

    /// Send a list request and decode `data` as items plus pagination meta.
    ///
    /// # Errors
    /// As [`ApiClient::send`].
    pub async fn send_page<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Page<T>, ApiError> {
        let (status, envelope) = self.execute(&request).await?;
        let data = envelope.data.ok_or_else(|| ApiError::InvalidResponse {
            status,
            message: "Response did not include data".to_owned(),
        })?;
        Ok(Page {
            items: decode_data(status, data)?,
            meta: envelope.meta,
        })
    }

    /// Send a request whose success envelope carries no data, such as a
    /// delete or logout. Returns the envelope message.
    ///
    /// # Errors
    /// Any [`ApiError`] other than a missing `data` field.
    pub async fn send_ack(&self, request: ApiRequest) -> Result<String, ApiError> {
        let (_, envelope) = self.execute(&request).await?;
        Ok(envelope.message)
    }

    async fn execute(&self, request: &ApiRequest) -> Result<(u16, Envelope<Value>), ApiError> {
        let result = self.attempt(request).await;
        if let Err(error) = &result {
            error.log(request.path());
        }
        result
    }

    async fn attempt(&self, request: &ApiRequest) -> Result<(u16, Envelope<Value>), ApiError> {
        let response = self.dispatch(request).await?;
        if response.status != UNAUTHORIZED || request.is_auth_endpoint() || request.is_retry() {
            return interpret(response);
        }

        let original = failure(&response);
        debug!(path = request.path(), "session rejected, joining refresh");
        if !self.recover_session().await {
            return Err(ApiError::SessionExpired {
                message: original.message().to_owned(),
            });
        }

        let retry = request.as_retry();
        let response = self.dispatch(&retry).await?;
        interpret(response)
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let url = request.url(&self.inner.base_url)?;
        self.inner
            .transport
            .send(url, request)
            .await
            .map_err(|error| {
                warn!(path = request.path(), %error, "request did not reach the server");
                ApiError::network()
            })
    }

    async fn recover_session(&self) -> bool {
        let transport = Arc::clone(&self.inner.transport);
        let events = Arc::clone(&self.inner.events);
        let base_url = self.inner.base_url.clone();
        self.inner
            .refresh
            .refresh(move || async move {
                let renewed = request_refresh(transport.as_ref(), &base_url).await;
                if renewed {
                    info!("session refreshed");
                } else {
                    warn!("session refresh failed");
                    events.session_expired();
                }
                renewed
            })
            .await
    }
}

async fn request_refresh(transport: &dyn Transport, base_url: &str) -> bool {
    let request = ApiRequest::post(REFRESH_PATH);
    let Ok(url) = request.url(base_url) else {
        return false;
    };
    match transport.send(url, &request).await {
        Ok(response) => interpret(response).is_ok(),
        Err(error) => {
            warn!(%error, "refresh request did not reach the server");
            false
        }
    }
}

fn interpret(response: RawResponse) -> Result<(u16, Envelope<Value>), ApiError> {
    if !response.is_success() {
        return Err(failure(&response));
    }
    let envelope: Envelope<Value> =
        serde_json::from_slice(&response.body).map_err(|error| ApiError::InvalidResponse {
            status: response.status,
            message: format!("Response body is not a valid envelope: {error}"),
        })?;
    if !envelope.success {
        let message = if envelope.message.is_empty() {
            "Request was not successful".to_owned()
        } else {
            envelope.message
        };
        return Err(ApiError::InvalidResponse {
            status: response.status,
            message,
        });
    }
    Ok((response.status, envelope))
}

fn failure(response: &RawResponse) -> ApiError {
    match serde_json::from_slice::<Envelope<Value>>(&response.body) {
        Ok(envelope) if !envelope.message.trim().is_empty() => {
            let errors = envelope.errors.unwrap_or_default();
            ApiError::from_status(response.status, envelope.message, errors)
        }
        Ok(envelope) => ApiError::from_status(
            response.status,
            status_fallback(response.status),
            envelope.errors.unwrap_or_default(),
        ),
        Err(_) => ApiError::from_status(response.status, status_fallback(response.status), Vec::new()),
    }
}

fn status_fallback(status: u16) -> String {
    format!("Request failed with status {status}")
}

fn decode_data<T: DeserializeOwned>(status: u16, data: Value) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|error| ApiError::InvalidResponse {
        status,
        message: format!("Response data has an unexpected shape: {error}"),
    })
}

impl ApiClient {
    /// Authentication endpoints.
    #[must_use]
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Portfolio projects.
    #[must_use]
    pub const fn projects(&self) -> CrudResource<'_> {
        CrudResource::new(self, "/projects")
    }

    /// Blog posts.
    #[must_use]
    pub const fn posts(&self) -> PostsApi<'_> {
        PostsApi::new(self)
    }

    /// Post and project categories.
    #[must_use]
    pub const fn categories(&self) -> CrudResource<'_> {
        CrudResource::new(self, "/categories")
    }

    /// Certifications.
    #[must_use]
    pub const fn certifications(&self) -> CrudResource<'_> {
        CrudResource::new(self, "/certifications")
    }

    /// Offered services.
    #[must_use]
    pub const fn services(&self) -> CrudResource<'_> {
        CrudResource::new(self, "/services")
    }

    /// Work experience entries.
    #[must_use]
    pub const fn experiments(&self) -> CrudResource<'_> {
        CrudResource::new(self, "/experiments")
    }

    /// User accounts.
    #[must_use]
    pub const fn users(&self) -> CrudResource<'_> {
        CrudResource::new(self, "/users")
    }

    /// Uploaded media.
    #[must_use]
    pub const fn media(&self) -> MediaApi<'_> {
        MediaApi::new(self)
    }

    /// Site settings.
    #[must_use]
    pub const fn settings(&self) -> SettingsApi<'_> {
        SettingsApi::new(self)
    }

    /// Contact form messages.
    #[must_use]
    pub const fn contact(&self) -> ContactApi<'_> {
        ContactApi::new(self)
    }

    /// Dashboard statistics.
    #[must_use]
    pub const fn stats(&self) -> StatsApi<'_> {
        StatsApi::new(self)
    }
}
