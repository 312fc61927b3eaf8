use std::collections::HashMap;

use freshfield_api::FreshfieldError;
use serde_json::Value;

const BODY_MESSAGE_FIELDS: [&str; 3] = ["message", "error", "details"];

/// User-facing texts of the subscription form. Every field can be
/// overridden by the embedding page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionMessages {
    pub required: String,
    pub invalid: String,
    /// Shown when `before_send` declines the submission.
    pub cancelled: String,
    /// Failure text for an exact HTTP status, e.g. `409`.
    pub by_status: HashMap<u16, String>,
    /// Failure text for any 5xx status without an exact entry.
    pub server_error: Option<String>,
    /// Failure text used before falling back to the response body.
    pub default_error: Option<String>,
}

impl Default for SubscriptionMessages {
    fn default() -> Self {
        Self {
            required: "Email is required".to_string(),
            invalid: "Please enter a valid email address".to_string(),
            cancelled: "Subscription was cancelled".to_string(),
            by_status: HashMap::new(),
            server_error: None,
            default_error: None,
        }
    }
}

impl SubscriptionMessages {
    #[must_use]
    pub fn with_status_message(mut self, status: u16, message: impl Into<String>) -> Self {
        self.by_status.insert(status, message.into());
        self
    }

    /// Text for a failed subscription call: caller text for the exact
    /// status, caller text for server errors, caller default, a message
    /// carried by the response body, then a built-in text for the status.
    #[must_use]
    pub fn resolve_failure(&self, error: &FreshfieldError) -> String {
        let status = error.status();

        if let Some(status) = status {
            if let Some(message) = self.by_status.get(&status) {
                return message.clone();
            }
            if (500..600).contains(&status)
                && let Some(message) = &self.server_error
            {
                return message.clone();
            }
        }

        if let Some(message) = &self.default_error {
            return message.clone();
        }

        if let Some(message) = error.body().and_then(body_message) {
            return message;
        }

        builtin_message(status).to_string()
    }
}

/// Extract a readable message from an error response body.
fn body_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => BODY_MESSAGE_FIELDS.iter().find_map(|field| {
            fields
                .get(*field)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
        }),
        Ok(Value::String(message)) if !message.trim().is_empty() => {
            Some(message.trim().to_string())
        }
        Ok(_) => None,
        Err(_) if body.starts_with('<') => None,
        Err(_) => Some(body.to_string()),
    }
}

fn builtin_message(status: Option<u16>) -> &'static str {
    match status {
        Some(400) => "Please check your email address and try again.",
        Some(409) => "This email is already subscribed.",
        Some(429) => "Too many requests. Please try again later.",
        Some(500..=599) => "Server error. Please try again later.",
        _ => "Subscription failed. Please try again.",
    }
}
