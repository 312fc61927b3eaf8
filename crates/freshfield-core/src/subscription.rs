use std::sync::Arc;

use async_trait::async_trait;
use freshfield_api::{
    FreshfieldError, HttpRequest, HttpTransport, SubscriptionAdded, SubscriptionResponse,
    SubscriptionStatus,
};
use reqwest::Method;
use serde_json::json;

use crate::config::{ClientConfig, Credentials};

const SUBSCRIBE_PATH: &str = "/api/widget/subscribe";

/// Minimal binding used by the subscription form to submit an address.
#[async_trait]
pub trait SubscriptionSink: Send + Sync {
    async fn subscribe(
        &self,
        email: &str,
    ) -> Result<SubscriptionResponse<SubscriptionAdded>, FreshfieldError>;
}

/// Authenticated pass-through to the subscription endpoints.
#[derive(Clone)]
pub struct SubscriptionApi {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    credentials: Option<Credentials>,
}

impl SubscriptionApi {
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            credentials: None,
        }
    }

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.credentials.is_some()
    }

    /// Subscribe `email` to update notifications.
    ///
    /// # Errors
    /// Fails before any request when the SDK is not initialized or `email` is
    /// blank; otherwise fails on transport errors and non-2xx responses, with
    /// the response body preserved.
    pub async fn add(
        &self,
        email: &str,
    ) -> Result<SubscriptionResponse<SubscriptionAdded>, FreshfieldError> {
        const OPERATION: &str = "add subscription";
        let credentials = self.credentials()?;
        let email = require_email(email, OPERATION)?;

        let request = self
            .authenticated(Method::POST, self.config.endpoint(SUBSCRIBE_PATH)?, credentials)
            .with_json(json!({ "email": email }));
        self.execute(request, OPERATION).await
    }

    /// Look up whether `email` is subscribed.
    ///
    /// # Errors
    /// Same preconditions and failure modes as [`Self::add`].
    pub async fn get_status(
        &self,
        email: &str,
    ) -> Result<SubscriptionResponse<SubscriptionStatus>, FreshfieldError> {
        const OPERATION: &str = "get subscription status";
        let credentials = self.credentials()?;
        let email = require_email(email, OPERATION)?;

        let mut url = self.config.endpoint(SUBSCRIBE_PATH)?;
        url.query_pairs_mut().append_pair("email", email);
        let request = self.authenticated(Method::GET, url, credentials);
        self.execute(request, OPERATION).await
    }

    /// Subscribe or unsubscribe `email`. Deployments with an elevated header
    /// configured also require the elevated credential.
    ///
    /// # Errors
    /// Same as [`Self::add`], plus
    /// [`FreshfieldError::MissingElevatedCredential`].
    pub async fn update_status(
        &self,
        email: &str,
        subscribed: bool,
    ) -> Result<SubscriptionResponse<SubscriptionAdded>, FreshfieldError> {
        const OPERATION: &str = "update subscription status";
        let credentials = self.credentials()?;
        let email = require_email(email, OPERATION)?;

        let mut request = self
            .authenticated(Method::PUT, self.config.endpoint(SUBSCRIBE_PATH)?, credentials)
            .with_json(json!({ "email": email, "subscribed": subscribed }));
        if let Some(header) = &self.config.elevated_header {
            let elevated = credentials
                .elevated()
                .ok_or(FreshfieldError::MissingElevatedCredential {
                    operation: OPERATION,
                })?;
            request = request.with_header(header.as_str(), elevated);
        }
        self.execute(request, OPERATION).await
    }

    fn credentials(&self) -> Result<&Credentials, FreshfieldError> {
        self.credentials
            .as_ref()
            .ok_or(FreshfieldError::NotInitialized)
    }

    fn authenticated(
        &self,
        method: Method,
        url: reqwest::Url,
        credentials: &Credentials,
    ) -> HttpRequest {
        HttpRequest::new(method, url).with_header(self.config.auth_header.name(), credentials.key())
    }

    async fn execute<T>(
        &self,
        request: HttpRequest,
        operation: &'static str,
    ) -> Result<SubscriptionResponse<T>, FreshfieldError>
    where
        T: serde::de::DeserializeOwned,
    {
        self.transport
            .send(request)
            .await?
            .error_for_status(operation)?
            .json(operation)
    }
}

#[async_trait]
impl SubscriptionSink for SubscriptionApi {
    async fn subscribe(
        &self,
        email: &str,
    ) -> Result<SubscriptionResponse<SubscriptionAdded>, FreshfieldError> {
        self.add(email).await
    }
}

fn require_email<'a>(email: &'a str, operation: &'static str) -> Result<&'a str, FreshfieldError> {
    let email = email.trim();
    if email.is_empty() {
        Err(FreshfieldError::MissingEmail { operation })
    } else {
        Ok(email)
    }
}
