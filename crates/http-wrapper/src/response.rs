//! HTTP response types

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// HTTP Response type - generic over the body type R and error type E
/// This is the primary return type for all HTTP operations
pub type Response<R, E = HttpError> = Result<R, E>;

/// Status line and headers, available before the body is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    status: u16,
    headers: Vec<(String, String)>,
}

impl ResponseHead {
    /// Create a response head
    pub fn new(status: u16, headers: Vec<(String, String)>) -> Self {
        Self { status, headers }
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// All headers, in the order the transport reported them
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value with the given name, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Check if the response status is a success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Response body delivered as a stream of chunks
#[async_trait]
pub trait ResponseBody: Send {
    /// Next chunk of the body, `None` once the body is exhausted
    async fn chunk(&mut self) -> Response<Option<Vec<u8>>>;
}

/// A body that is already in memory
#[derive(Debug, Clone, Default)]
pub struct BufferedBody {
    data: Option<Vec<u8>>,
}

impl BufferedBody {
    /// Wrap a complete body
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }
}

#[async_trait]
impl ResponseBody for BufferedBody {
    async fn chunk(&mut self) -> Response<Option<Vec<u8>>> {
        Ok(self.data.take().filter(|data| !data.is_empty()))
    }
}

/// Raw HTTP response with status code and body access
pub struct RawResponse<B> {
    head: ResponseHead,
    body: B,
}

impl<B> std::fmt::Debug for RawResponse<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawResponse")
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

impl<B: ResponseBody> RawResponse<B> {
    /// Create a new RawResponse from its head and an unread body
    pub fn new(head: ResponseHead, body: B) -> Self {
        Self { head, body }
    }

    /// Status line and headers
    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.head.status()
    }

    /// First header value with the given name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.header(name)
    }

    /// Check if the response status is a success (2xx)
    pub fn is_success(&self) -> bool {
        self.head.is_success()
    }

    /// Check if the response status is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.head.is_client_error()
    }

    /// Check if the response status is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.head.is_server_error()
    }

    /// Split into head and unread body
    pub fn into_parts(self) -> (ResponseHead, B) {
        (self.head, self.body)
    }

    /// Get the response body as bytes
    pub async fn bytes(mut self) -> Response<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(chunk) = self.body.chunk().await? {
            out.extend_from_slice(&chunk);
        }
        Ok(out)
    }

    /// Get the response body as text
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected so error
    /// bodies always survive for diagnostics.
    pub async fn text(self) -> Response<String> {
        let bytes = self.bytes().await?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    /// Get the response body as JSON
    ///
    /// An empty body decodes as JSON `null`, which succeeds for `()` and
    /// `Option<T>` and fails for anything else.
    pub async fn json<T: DeserializeOwned>(self) -> Response<T> {
        let bytes = self.bytes().await?;
        decode_json(&bytes)
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Response<T> {
    let result = if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_slice(bytes)
    };
    result.map_err(|e| HttpError::Deserialization(e.to_string()))
}
