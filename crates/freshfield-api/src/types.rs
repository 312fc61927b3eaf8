use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One announcement from the update feed. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub id: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created: DateTime<Utc>,
    pub title: String,
    /// Trusted markup supplied by the feed owner.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl Update {
    /// Version label, if present and not blank.
    #[must_use]
    pub fn version_label(&self) -> Option<&str> {
        self.version
            .as_deref()
            .map(str::trim)
            .filter(|version| !version.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// `authority:name` reference as served, or resolved SVG markup after
    /// decoration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Feature {
    /// Icon content, if present and not blank.
    #[must_use]
    pub fn icon_content(&self) -> Option<&str> {
        self.icon
            .as_deref()
            .filter(|icon| !icon.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FeatureKind {
    New,
    Fix,
    Improvement,
    Other(String),
}

impl FeatureKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Fix => "fix",
            Self::Improvement => "improvement",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for FeatureKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "new" => Self::New,
            "fix" => Self::Fix,
            "improvement" => Self::Improvement,
            _ => Self::Other(value),
        }
    }
}

impl From<FeatureKind> for String {
    fn from(value: FeatureKind) -> Self {
        match value {
            FeatureKind::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconFormat {
    Text,
    #[default]
    Svg,
}

impl IconFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Svg => "svg",
        }
    }
}

/// Envelope shared by every subscription endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResponse<T> {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionAdded {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    pub email: String,
    #[serde(default)]
    pub subscribed: bool,
}

// The feed backend emits `2024-03-01 09:15:00.000Z`; accept RFC 3339 too.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid timestamp: {raw}"))
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.fZ", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
