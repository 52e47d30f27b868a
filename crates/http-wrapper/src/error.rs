//! HTTP error types

use thiserror::Error;

/// Error raised by a response translation hook
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during a call
#[derive(Debug, Error)]
pub enum HttpError {
    /// Non-success HTTP response
    #[error("HTTP error ({status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body, decoded as lossy UTF-8
        body: String,
    },
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Request timeout
    #[error("Request timeout")]
    Timeout,
    /// Any other failure below the HTTP layer
    #[error("Transport error: {0}")]
    Transport(String),
    /// The caller cancelled the call
    #[error("Request cancelled")]
    Cancelled,
    /// The request payload could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A successful response carried a body that is not the expected JSON
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// Failure raised by a response translation hook
    #[error("{0}")]
    Translated(BoxError),
    /// Base address or request URL is not usable
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Proxy error
    #[error("Proxy error: {0}")]
    Proxy(String),
    /// Client build error
    #[error("Client build error: {0}")]
    Build(String),
}

impl HttpError {
    /// Wrap a hook failure
    pub fn translated<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HttpError::Translated(Box::new(err))
    }

    /// Status code of an [`HttpError::Api`] error
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body of an [`HttpError::Api`] error
    pub fn body(&self) -> Option<&str> {
        match self {
            HttpError::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True for a non-success HTTP response
    pub fn is_api(&self) -> bool {
        matches!(self, HttpError::Api { .. })
    }

    /// True for connectivity, timeout and other transport faults
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            HttpError::Connection(_) | HttpError::Timeout | HttpError::Transport(_)
        )
    }

    /// True when the caller cancelled the call
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HttpError::Cancelled)
    }

    /// Borrow the hook failure as a concrete type
    pub fn downcast_translated<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            HttpError::Translated(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else if err.is_builder() {
            HttpError::Build(err.to_string())
        } else if err.is_connect() {
            HttpError::Connection(err.to_string())
        } else {
            HttpError::Transport(err.to_string())
        }
    }
}
