use std::sync::Arc;

use freshfield_api::{FreshfieldError, HttpRequest, HttpTransport, IconFormat, Update};
use futures_util::future::join_all;
use log::{debug, warn};

use crate::config::{ClientConfig, Credentials};
use crate::icons::IconLookup;

pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_OFFSET: u32 = 0;

const UPDATES_PATH: &str = "/api/widget/updates";
const FETCH_OPERATION: &str = "fetch updates";

/// Page selection and icon rendering mode for a feed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Maximum number of updates, default 10.
    pub limit: u32,
    /// Number of updates to skip, default 0.
    pub offset: u32,
    /// `Svg` resolves feature icons to markup; `Text` leaves the raw
    /// reference in place.
    pub icon_format: IconFormat,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
            icon_format: IconFormat::Svg,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn latest() -> Self {
        Self {
            limit: 1,
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct FeedClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    icons: Arc<dyn IconLookup>,
    credentials: Option<Credentials>,
}

impl FeedClient {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        icons: Arc<dyn IconLookup>,
    ) -> Self {
        Self {
            config,
            transport,
            icons,
            credentials: None,
        }
    }

    /// Store the site credential, trimmed.
    ///
    /// # Errors
    /// Returns [`FreshfieldError::MissingCredential`] when `credential` is
    /// empty or whitespace-only.
    pub fn initialize(&mut self, credential: &str) -> Result<(), FreshfieldError> {
        self.credentials = Some(Credentials::new(credential)?);
        Ok(())
    }

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.credentials.is_some()
    }

    /// Fetch one page of updates, decorating feature icons when
    /// `options.icon_format` is [`IconFormat::Svg`].
    ///
    /// # Errors
    /// Returns [`FreshfieldError::NotInitialized`] before [`Self::initialize`],
    /// [`FreshfieldError::HttpStatus`] for a non-2xx response, and a network
    /// error when the request fails or the body does not decode.
    pub async fn fetch_updates(
        &self,
        options: FetchOptions,
    ) -> Result<Vec<Update>, FreshfieldError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(FreshfieldError::NotInitialized)?;

        let mut url = self.config.endpoint(UPDATES_PATH)?;
        url.query_pairs_mut()
            .append_pair("limit", &options.limit.to_string())
            .append_pair("offset", &options.offset.to_string())
            .append_pair("iconFormat", options.icon_format.as_str());

        let request =
            HttpRequest::get(url).with_header(self.config.auth_header.name(), credentials.key());
        let response = self
            .transport
            .send(request)
            .await?
            .error_for_status(FETCH_OPERATION)?;
        let updates: Vec<Update> = response.json(FETCH_OPERATION)?;
        debug!("Fetched {} updates", updates.len());

        if options.icon_format == IconFormat::Svg {
            Ok(decorate_icons(self.icons.as_ref(), updates).await)
        } else {
            Ok(updates)
        }
    }

    /// Fetch the most recent update, if any.
    ///
    /// # Errors
    /// Same as [`Self::fetch_updates`].
    pub async fn fetch_latest(&self) -> Result<Option<Update>, FreshfieldError> {
        let updates = self.fetch_updates(FetchOptions::latest()).await?;
        Ok(updates.into_iter().next())
    }
}

/// Resolve every feature icon of the page concurrently. Results are written
/// back in original order; a failed lookup only clears its own icon.
async fn decorate_icons(icons: &dyn IconLookup, mut updates: Vec<Update>) -> Vec<Update> {
    let lookups = updates
        .iter()
        .flat_map(|update| update.features.iter())
        .map(|feature| resolve_feature_icon(icons, feature.icon.as_deref()));
    let resolved = join_all(lookups).await;

    let features = updates
        .iter_mut()
        .flat_map(|update| update.features.iter_mut());
    for (feature, icon) in features.zip(resolved) {
        feature.icon = icon;
    }
    updates
}

async fn resolve_feature_icon(icons: &dyn IconLookup, icon: Option<&str>) -> Option<String> {
    let reference = match icon {
        Some(reference) if !reference.is_empty() => reference,
        other => return other.map(str::to_string),
    };

    match icons.lookup(reference).await {
        Ok(markup) if !markup.is_empty() => Some(markup),
        Ok(_) => None,
        Err(error) => {
            warn!("Failed to load icon {reference}, using text fallback: {error}");
            None
        }
    }
}
