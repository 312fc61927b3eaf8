use async_trait::async_trait;
use freshfield_api::{FreshfieldError, HttpRequest, HttpResponse, HttpTransport};
use log::debug;

/// [`HttpTransport`] backed by a shared `reqwest` client. Timeouts are the
/// client's own; no retries are attempted.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a transport with a `freshfield/<version>` user agent.
    ///
    /// # Errors
    /// Returns an error if the underlying client cannot be constructed.
    pub fn with_default_client() -> Result<Self, FreshfieldError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("freshfield/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| FreshfieldError::network_request_from("build http client", error))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FreshfieldError> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.json_body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|error| FreshfieldError::network_request_from("send request", error))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| FreshfieldError::network_parse_from("read response body", error))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}
