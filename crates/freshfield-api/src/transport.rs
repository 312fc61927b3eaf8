use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;

use crate::error::FreshfieldError;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub json_body: Option<serde_json::Value>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            json_body: None,
        }
    }

    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.json_body = Some(body);
        self
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn query(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`FreshfieldError::HttpStatus`].
    ///
    /// # Errors
    /// Returns the response as an error when its status is not 2xx.
    pub fn error_for_status(self, operation: &'static str) -> Result<Self, FreshfieldError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FreshfieldError::HttpStatus {
                operation,
                status: self.status,
                status_text: self.status_text,
                body: self.body,
            })
        }
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    /// Returns a parse-stage network error when the body is not valid JSON
    /// for `T`.
    pub fn json<T: DeserializeOwned>(&self, operation: &'static str) -> Result<T, FreshfieldError> {
        serde_json::from_str(&self.body)
            .map_err(|error| FreshfieldError::network_parse_from(operation, error))
    }
}

/// Sends one request and returns the full response. Implementations must not
/// retry; a single attempt per call is the contract.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FreshfieldError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("test url should parse")
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = HttpRequest::get(url("https://example.com/"))
            .with_header("X-Widget-Key", "secret");

        assert_eq!(request.header("x-widget-key"), Some("secret"));
        assert!(request.header("X-Api-Key").is_none());
    }

    #[test]
    fn query_lookup_decodes_values() {
        let request = HttpRequest::get(url("https://example.com/?email=a%40b.co&limit=1"));

        assert_eq!(request.query("email").as_deref(), Some("a@b.co"));
        assert_eq!(request.query("limit").as_deref(), Some("1"));
        assert!(request.query("offset").is_none());
    }

    #[test]
    fn new_response_fills_canonical_status_text() {
        let response = HttpResponse::new(404, "");
        assert_eq!(response.status_text, "Not Found");
        assert!(!response.is_success());
    }

    #[test]
    fn error_for_status_keeps_body() {
        let error = HttpResponse::new(409, r#"{"message":"exists"}"#)
            .error_for_status("add subscription")
            .expect_err("409 should be an error");

        assert_eq!(error.status(), Some(409));
        assert_eq!(error.body(), Some(r#"{"message":"exists"}"#));
    }

    #[test]
    fn json_parse_failure_is_parse_stage() {
        let response = HttpResponse::new(200, "not json");
        let result: Result<Vec<u32>, _> = response.json("fetch updates");

        assert!(matches!(
            result,
            Err(FreshfieldError::Network {
                stage: crate::NetworkStage::ResponseParse,
                ..
            })
        ));
    }
}
