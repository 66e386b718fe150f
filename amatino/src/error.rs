use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmatinoError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Authentication failed")]
    Authentication,

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Amatino API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },
}

pub type AmatinoResult<T> = Result<T, AmatinoError>;

impl AmatinoError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status to an error, keeping the response body
    /// for statuses without a dedicated variant.
    pub(crate) fn from_status(status: StatusCode, resource: &str, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => Self::Authentication,
            404 => Self::NotFound {
                resource: resource.to_string(),
            },
            429 => Self::RateLimit,
            503 => Self::ServiceUnavailable {
                message: format!("{} unavailable", resource),
            },
            code => Self::Api {
                status: code,
                message: body,
            },
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::ServiceUnavailable {
                message: "Request timeout".to_string(),
            }
        } else if err.is_connect() {
            Self::ServiceUnavailable {
                message: "Cannot connect to Amatino API".to_string(),
            }
        } else {
            Self::Network(err)
        }
    }
}
