use std::sync::Arc;

use freshfield_api::{
    FreshfieldError, HttpTransport, IconFormat, SubscriptionAdded, SubscriptionResponse,
    SubscriptionStatus, Update,
};
use freshfield_core::{
    ClientConfig, Credentials, DEFAULT_LIMIT, DEFAULT_OFFSET, FeedClient, FetchOptions,
    IconLookup, IconResolver, ReqwestTransport, SubscriptionApi,
};
use log::{error, info};

use crate::dom::{Document, Node, SUBSCRIPTION_CONTAINER_ID, UPDATES_CONTAINER_ID};
use crate::form::{SubscriptionForm, SubscriptionWidgetOptions};
use crate::modal::{self, ModalHandle, ModalOptions};
use crate::render::project_update_list;

/// Page selection for [`Freshfield::html`]. Icons are always resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlOptions {
    pub limit: u32,
    pub offset: u32,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

/// Entry point for an embedding page.
pub struct Freshfield {
    config: ClientConfig,
    document: Document,
    feed: FeedClient,
    subscriptions: SubscriptionApi,
}

impl Freshfield {
    /// SDK with the default deployment talking to the network through
    /// `reqwest`.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(document: Document) -> Result<Self, FreshfieldError> {
        Self::with_config(ClientConfig::default(), document)
    }

    /// # Errors
    /// Returns an error when the HTTP client cannot be built.
    pub fn with_config(config: ClientConfig, document: Document) -> Result<Self, FreshfieldError> {
        let transport = Arc::new(ReqwestTransport::with_default_client()?);
        Ok(Self::with_transport(config, document, transport))
    }

    pub fn with_transport(
        config: ClientConfig,
        document: Document,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let icons = Arc::new(IconResolver::new(config.clone(), Arc::clone(&transport)));
        Self::with_parts(config, document, transport, icons)
    }

    pub fn with_parts(
        config: ClientConfig,
        document: Document,
        transport: Arc<dyn HttpTransport>,
        icons: Arc<dyn IconLookup>,
    ) -> Self {
        let feed = FeedClient::new(config.clone(), Arc::clone(&transport), icons);
        let subscriptions = SubscriptionApi::new(config.clone(), transport);
        Self {
            config,
            document,
            feed,
            subscriptions,
        }
    }

    /// Store the site credential.
    ///
    /// # Errors
    /// Returns [`FreshfieldError::MissingCredential`] for a blank key.
    pub fn init(&mut self, key: &str) -> Result<(), FreshfieldError> {
        self.install(Credentials::new(key)?);
        Ok(())
    }

    /// Store the site credential and the elevated credential needed for
    /// privileged subscription changes.
    ///
    /// # Errors
    /// Returns a configuration error when either key is blank.
    pub fn init_with_elevated(
        &mut self,
        key: &str,
        elevated_key: &str,
    ) -> Result<(), FreshfieldError> {
        self.install(Credentials::new(key)?.with_elevated(elevated_key)?);
        Ok(())
    }

    fn install(&mut self, credentials: Credentials) {
        self.feed.set_credentials(credentials.clone());
        self.subscriptions.set_credentials(credentials);
        info!("Freshfield initialized");
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.feed.is_initialized()
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Fetch a page of updates as data.
    ///
    /// # Errors
    /// See [`FeedClient::fetch_updates`].
    pub async fn json(&self, options: FetchOptions) -> Result<Vec<Update>, FreshfieldError> {
        self.feed.fetch_updates(options).await
    }

    /// Fetch a page of updates and render it into the updates container.
    /// Returns the container as rendered.
    ///
    /// # Errors
    /// Returns [`FreshfieldError::ContainerNotFound`] without fetching when
    /// the page lacks the updates container, and any fetch failure.
    pub async fn html(&self, options: HtmlOptions) -> Result<Node, FreshfieldError> {
        if !self.document.has_container(UPDATES_CONTAINER_ID) {
            let failure = FreshfieldError::container_not_found(UPDATES_CONTAINER_ID);
            error!("Failed to render updates: {failure}");
            return Err(failure);
        }

        let updates = self
            .feed
            .fetch_updates(FetchOptions {
                limit: options.limit,
                offset: options.offset,
                icon_format: IconFormat::Svg,
            })
            .await
            .inspect_err(|failure| error!("Failed to render updates: {failure}"))?;

        self.document
            .replace_container_content(UPDATES_CONTAINER_ID, project_update_list(&updates))
    }

    /// Present the latest update as a modal when it passes the caller's gate
    /// and the age limit. Failures never reach the caller.
    pub async fn show_last_update_modal(&self, options: ModalOptions) -> Option<ModalHandle> {
        modal::show_last_update_modal(&self.feed, &self.document, options).await
    }

    #[must_use]
    pub fn subscription(&self) -> Subscription<'_> {
        Subscription {
            api: &self.subscriptions,
            document: &self.document,
        }
    }

    /// Shorthand for `subscription().widget(options)`.
    ///
    /// # Errors
    /// See [`Subscription::widget`].
    pub fn subscription_widget(
        &self,
        options: SubscriptionWidgetOptions,
    ) -> Result<SubscriptionForm, FreshfieldError> {
        self.subscription().widget(options)
    }
}

/// Subscription operations of an initialized SDK.
#[derive(Clone, Copy)]
pub struct Subscription<'a> {
    api: &'a SubscriptionApi,
    document: &'a Document,
}

impl Subscription<'_> {
    /// # Errors
    /// See [`SubscriptionApi::add`].
    pub async fn add(
        &self,
        email: &str,
    ) -> Result<SubscriptionResponse<SubscriptionAdded>, FreshfieldError> {
        self.api.add(email).await
    }

    /// # Errors
    /// See [`SubscriptionApi::get_status`].
    pub async fn get_status(
        &self,
        email: &str,
    ) -> Result<SubscriptionResponse<SubscriptionStatus>, FreshfieldError> {
        self.api.get_status(email).await
    }

    /// # Errors
    /// See [`SubscriptionApi::update_status`].
    pub async fn update_status(
        &self,
        email: &str,
        subscribed: bool,
    ) -> Result<SubscriptionResponse<SubscriptionAdded>, FreshfieldError> {
        self.api.update_status(email, subscribed).await
    }

    /// Render a subscription form into the subscription container.
    ///
    /// # Errors
    /// Returns [`FreshfieldError::NotInitialized`] before `init`, and
    /// [`FreshfieldError::ContainerNotFound`] when the page lacks the
    /// subscription container.
    pub fn widget(
        &self,
        options: SubscriptionWidgetOptions,
    ) -> Result<SubscriptionForm, FreshfieldError> {
        if !self.api.is_initialized() {
            return Err(FreshfieldError::NotInitialized);
        }
        SubscriptionForm::new(Arc::new(self.api.clone()), options)
            .mount(self.document, SUBSCRIPTION_CONTAINER_ID)
            .inspect_err(|failure| error!("Failed to render subscription form: {failure}"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use freshfield_api::HttpResponse;
    use serde_json::json;

    use super::*;
    use crate::test_support::{ScriptedTransport, update_json};

    fn sdk(transport: &ScriptedTransport, document: Document) -> Freshfield {
        Freshfield::with_transport(ClientConfig::default(), document, Arc::new(transport.clone()))
    }

    #[test]
    fn blank_key_is_rejected() {
        let transport = ScriptedTransport::json(200, json!([]));
        let mut sdk = sdk(&transport, Document::new());

        assert_eq!(sdk.init("   "), Err(FreshfieldError::MissingCredential));
        assert!(!sdk.is_initialized());
    }

    #[tokio::test]
    async fn json_before_init_fails_without_request() {
        let transport = ScriptedTransport::json(200, json!([]));
        let sdk = sdk(&transport, Document::new());

        let result = sdk.json(FetchOptions::default()).await;

        assert_eq!(result, Err(FreshfieldError::NotInitialized));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn html_requires_container_before_fetching() {
        let transport = ScriptedTransport::json(200, json!([]));
        let mut sdk = sdk(&transport, Document::new());
        sdk.init("site-key").expect("valid key");

        let result = sdk.html(HtmlOptions::default()).await;

        assert_eq!(
            result,
            Err(FreshfieldError::container_not_found(UPDATES_CONTAINER_ID))
        );
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn html_renders_page_into_container() {
        let transport = ScriptedTransport::json(
            200,
            json!([update_json("u1", Utc::now()), update_json("u2", Utc::now())]),
        );
        let document = Document::new().with_container(UPDATES_CONTAINER_ID);
        let mut sdk = sdk(&transport, document.clone());
        sdk.init("site-key").expect("valid key");

        let container = sdk
            .html(HtmlOptions {
                limit: 2,
                offset: 4,
            })
            .await
            .expect("render should succeed");

        assert_eq!(container.count_by_class("_ffUpdate"), 2);
        let request = &transport.requests()[0];
        assert_eq!(request.query("limit").as_deref(), Some("2"));
        assert_eq!(request.query("offset").as_deref(), Some("4"));
        assert_eq!(request.query("iconFormat").as_deref(), Some("svg"));
        assert_eq!(document.container(UPDATES_CONTAINER_ID), Some(container));
    }

    #[tokio::test]
    async fn html_propagates_fetch_failure_and_leaves_container() {
        let transport = ScriptedTransport::new(|_| Ok(HttpResponse::new(503, "")));
        let document = Document::new().with_container(UPDATES_CONTAINER_ID);
        let mut sdk = sdk(&transport, document.clone());
        sdk.init("site-key").expect("valid key");

        let result = sdk.html(HtmlOptions::default()).await;

        assert_eq!(result.as_ref().err().and_then(FreshfieldError::status), Some(503));
        assert_eq!(
            document.container_html(UPDATES_CONTAINER_ID).as_deref(),
            Some("<div id=\"_ffUpdatesContainer\"></div>")
        );
    }

    #[test]
    fn widget_requires_init_and_container() {
        let transport = ScriptedTransport::json(200, json!({}));
        let mut sdk = sdk(&transport, Document::new());

        assert!(matches!(
            sdk.subscription_widget(SubscriptionWidgetOptions::default()),
            Err(FreshfieldError::NotInitialized)
        ));

        sdk.init("site-key").expect("valid key");
        assert!(matches!(
            sdk.subscription_widget(SubscriptionWidgetOptions::default()),
            Err(FreshfieldError::ContainerNotFound { .. })
        ));

        sdk.document().add_container(SUBSCRIPTION_CONTAINER_ID);
        sdk.subscription_widget(SubscriptionWidgetOptions::default())
            .expect("widget should mount");
        assert!(
            sdk.document()
                .container(SUBSCRIPTION_CONTAINER_ID)
                .is_some_and(|container| container.find_by_class("_ffSubscriptionForm").is_some())
        );
    }

    #[tokio::test]
    async fn update_status_sends_elevated_credential_when_configured() {
        let transport = ScriptedTransport::json(
            200,
            json!({ "code": 200, "message": "ok", "data": { "email": "a@b.co" } }),
        );
        let config = ClientConfig {
            elevated_header: Some("X-Admin-Key".to_string()),
            ..ClientConfig::default()
        };
        let mut sdk =
            Freshfield::with_transport(config, Document::new(), Arc::new(transport.clone()));
        sdk.init_with_elevated(" site-key ", " admin-key ")
            .expect("valid keys");

        sdk.subscription()
            .update_status("a@b.co", false)
            .await
            .expect("update should succeed");

        let request = &transport.requests()[0];
        assert_eq!(request.header("X-Widget-Key"), Some("site-key"));
        assert_eq!(request.header("X-Admin-Key"), Some("admin-key"));
    }

    #[tokio::test]
    async fn update_status_without_elevated_credential_fails() {
        let transport = ScriptedTransport::json(200, json!({}));
        let config = ClientConfig {
            elevated_header: Some("X-Admin-Key".to_string()),
            ..ClientConfig::default()
        };
        let mut sdk =
            Freshfield::with_transport(config, Document::new(), Arc::new(transport.clone()));
        sdk.init("site-key").expect("valid key");

        let result = sdk.subscription().update_status("a@b.co", true).await;

        assert!(matches!(
            result,
            Err(FreshfieldError::MissingElevatedCredential { .. })
        ));
        assert_eq!(transport.call_count(), 0);
    }
}
