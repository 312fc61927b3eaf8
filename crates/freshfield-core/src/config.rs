use std::fmt;

use freshfield_api::FreshfieldError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://pb.freshfield.io";
pub const DEFAULT_ICON_HOST: &str = "https://api.iconify.design";

/// Header carrying the site credential. Deployments differ in the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthHeader {
    #[default]
    WidgetKey,
    ApiKey,
}

impl AuthHeader {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::WidgetKey => "X-Widget-Key",
            Self::ApiKey => "X-Api-Key",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_icon_host")]
    pub icon_host: String,

    #[serde(default)]
    pub auth_header: AuthHeader,

    /// When set, status updates require an elevated credential sent under
    /// this header.
    #[serde(default)]
    pub elevated_header: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_icon_host() -> String {
    DEFAULT_ICON_HOST.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            icon_host: default_icon_host(),
            auth_header: AuthHeader::default(),
            elevated_header: None,
        }
    }
}

impl ClientConfig {
    /// Resolve `path` against the configured base URL.
    ///
    /// # Errors
    /// Returns [`FreshfieldError::InvalidEndpoint`] when the base URL does not
    /// parse.
    pub fn endpoint(&self, path: &str) -> Result<Url, FreshfieldError> {
        join_url(&self.base_url, path)
    }

    /// URL of an icon set document on the icon registry.
    ///
    /// # Errors
    /// Returns [`FreshfieldError::InvalidEndpoint`] when the icon host does
    /// not parse.
    pub fn icon_set_url(&self, authority: &str) -> Result<Url, FreshfieldError> {
        join_url(&self.icon_host, &format!("/{authority}.json"))
    }
}

fn join_url(base: &str, path: &str) -> Result<Url, FreshfieldError> {
    let raw = format!("{}{path}", base.trim_end_matches('/'));
    Url::parse(&raw).map_err(|error| FreshfieldError::InvalidEndpoint {
        url: raw,
        details: error.to_string(),
    })
}

/// Site credential plus the optional elevated credential. Both are trimmed
/// and never blank.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    elevated: Option<String>,
}

impl Credentials {
    /// # Errors
    /// Returns [`FreshfieldError::MissingCredential`] for a blank key.
    pub fn new(key: &str) -> Result<Self, FreshfieldError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(FreshfieldError::MissingCredential);
        }
        Ok(Self {
            key: key.to_string(),
            elevated: None,
        })
    }

    /// # Errors
    /// Returns [`FreshfieldError::MissingElevatedCredential`] for a blank key.
    pub fn with_elevated(mut self, elevated: &str) -> Result<Self, FreshfieldError> {
        let elevated = elevated.trim();
        if elevated.is_empty() {
            return Err(FreshfieldError::MissingElevatedCredential {
                operation: "initialize",
            });
        }
        self.elevated = Some(elevated.to_string());
        Ok(self)
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn elevated(&self) -> Option<&str> {
        self.elevated.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"<redacted>")
            .field("elevated", &self.elevated.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
