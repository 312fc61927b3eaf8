use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FreshfieldError {
    #[error("API token is required")]
    MissingCredential,

    #[error("Elevated API token is required to {operation}")]
    MissingElevatedCredential { operation: &'static str },

    #[error("SDK not initialized. Call init() first.")]
    NotInitialized,

    #[error("Container element with ID \"{id}\" not found")]
    ContainerNotFound { id: String },

    #[error("Invalid endpoint URL {url}: {details}")]
    InvalidEndpoint { url: String, details: String },

    #[error("Email is required to {operation}")]
    MissingEmail { operation: &'static str },

    #[error("Failed to {operation} ({status}): {status_text}")]
    HttpStatus {
        operation: &'static str,
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Network error during {operation} ({stage}): {details}")]
    Network {
        operation: &'static str,
        stage: NetworkStage,
        details: String,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStage {
    #[error("request")]
    Request,
    #[error("response parse")]
    ResponseParse,
}

/// Coarse classification used to decide whether a failure is the caller's
/// fault or the backend's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
}

impl FreshfieldError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential
            | Self::MissingElevatedCredential { .. }
            | Self::NotInitialized
            | Self::ContainerNotFound { .. }
            | Self::InvalidEndpoint { .. }
            | Self::MissingEmail { .. } => ErrorKind::Configuration,
            Self::HttpStatus { .. } | Self::Network { .. } => ErrorKind::Transport,
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body of the failed response, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }

    pub fn container_not_found(id: impl Into<String>) -> Self {
        Self::ContainerNotFound { id: id.into() }
    }

    pub fn network_request(operation: &'static str, details: impl Into<String>) -> Self {
        Self::Network {
            operation,
            stage: NetworkStage::Request,
            details: details.into(),
        }
    }

    pub fn network_request_from<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::network_request(operation, error.to_string())
    }

    pub fn network_parse(operation: &'static str, details: impl Into<String>) -> Self {
        Self::Network {
            operation,
            stage: NetworkStage::ResponseParse,
            details: details.into(),
        }
    }

    pub fn network_parse_from<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::network_parse(operation, error.to_string())
    }
}
