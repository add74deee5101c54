use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;

/// Well-known setting keys with dedicated convenience methods.
pub mod keys {
    /// Contact details shown on the public site.
    pub const CONTACT: &str = "contact";
    /// Home page hero content.
    pub const HOME: &str = "home";
    /// About page content.
    pub const ABOUT: &str = "about";
    /// Logo, colours, and site name.
    pub const BRANDING: &str = "branding";
    /// Footer links and copy.
    pub const FOOTER: &str = "footer";
}

/// Key/value site settings.
#[derive(Debug, Clone, Copy)]
pub struct SettingsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SettingsApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /settings/{key}`.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, ApiError> {
        self.client
            .send(ApiRequest::get(format!("/settings/{key}")))
            .await
    }

    /// `PUT /settings/{key}`. Returns the stored value.
    ///
    /// # Errors
    /// Any [`ApiError`] from encoding or the request.
    pub async fn update<T, B>(&self, key: &str, value: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::put(format!("/settings/{key}")).with_json(value)?;
        self.client.send(request).await
    }

    /// Contact settings.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn contact<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.get(keys::CONTACT).await
    }

    /// Home page settings.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn home<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.get(keys::HOME).await
    }

    /// About page settings.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn about<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.get(keys::ABOUT).await
    }

    /// Branding settings.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn branding<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.get(keys::BRANDING).await
    }

    /// Footer settings.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn footer<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.get(keys::FOOTER).await
    }
}
