use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use freshfield_api::{FreshfieldError, HttpRequest, HttpTransport};
use log::warn;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ClientConfig;

pub const FALLBACK_ICON_SIZE: f64 = 24.0;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("Invalid icon format: {reference}. Expected format: \"prefix:name\"")]
    InvalidReference { reference: String },
    #[error("Icon {reference} not found in response")]
    NotFound { reference: String },
    #[error(transparent)]
    Transport(#[from] FreshfieldError),
}

/// Outcome of resolving an icon reference. Failures never surface as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconResolution {
    Resolved(String),
    Unresolved,
}

impl IconResolution {
    /// Markup, or the empty string when unresolved.
    #[must_use]
    pub fn markup(&self) -> &str {
        match self {
            Self::Resolved(markup) => markup,
            Self::Unresolved => "",
        }
    }

    #[must_use]
    pub fn into_markup(self) -> Option<String> {
        match self {
            Self::Resolved(markup) if !markup.is_empty() => Some(markup),
            _ => None,
        }
    }
}

/// Something that can turn an `authority:name` reference into SVG markup.
#[async_trait]
pub trait IconLookup: Send + Sync {
    async fn lookup(&self, reference: &str) -> Result<String, IconError>;
}

#[derive(Debug, Default, Deserialize)]
struct IconSet {
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    icons: HashMap<String, IconData>,
    #[serde(default)]
    aliases: HashMap<String, IconAlias>,
}

#[derive(Debug, Deserialize)]
struct IconData {
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    body: String,
}

#[derive(Debug, Deserialize)]
struct IconAlias {
    parent: String,
}

impl IconSet {
    fn find(&self, name: &str) -> Option<&IconData> {
        self.icons.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|alias| self.icons.get(&alias.parent))
        })
    }

    fn render_svg(&self, name: &str) -> Option<String> {
        let icon = self.find(name)?;
        let width = first_positive(icon.width, self.width);
        let height = first_positive(icon.height, self.height);
        Some(format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100%\" height=\"100%\" viewBox=\"0 0 {width} {height}\" fill=\"currentColor\">{}</svg>",
            icon.body
        ))
    }
}

fn first_positive(own: Option<f64>, inherited: Option<f64>) -> f64 {
    own.filter(|value| *value > 0.0)
        .or(inherited.filter(|value| *value > 0.0))
        .unwrap_or(FALLBACK_ICON_SIZE)
}

/// Split on the first `:`; both halves must be non-empty.
#[must_use]
pub fn parse_reference(reference: &str) -> Option<(&str, &str)> {
    let (authority, name) = reference.trim().split_once(':')?;
    if authority.is_empty() || name.is_empty() {
        return None;
    }
    Some((authority, name))
}

/// Resolves icon references against an Iconify-compatible registry.
#[derive(Clone)]
pub struct IconResolver {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
}

impl IconResolver {
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Resolve `reference`, degrading to [`IconResolution::Unresolved`] on
    /// any failure. The failure is logged, never returned.
    pub async fn resolve(&self, reference: &str) -> IconResolution {
        match self.lookup(reference).await {
            Ok(markup) => IconResolution::Resolved(markup),
            Err(error) => {
                warn!("Failed to resolve icon {reference}: {error}");
                IconResolution::Unresolved
            }
        }
    }
}

#[async_trait]
impl IconLookup for IconResolver {
    async fn lookup(&self, reference: &str) -> Result<String, IconError> {
        let (authority, name) =
            parse_reference(reference).ok_or_else(|| IconError::InvalidReference {
                reference: reference.to_string(),
            })?;

        let mut url = self.config.icon_set_url(authority)?;
        url.query_pairs_mut().append_pair("icons", name);

        let response = self
            .transport
            .send(HttpRequest::get(url))
            .await?
            .error_for_status("fetch icon")?;
        let set: IconSet = response.json("fetch icon")?;

        set.render_svg(name).ok_or_else(|| IconError::NotFound {
            reference: reference.to_string(),
        })
    }
}
