//! HTTP request types

use std::fmt;

use serde::Serialize;

use crate::error::HttpError;
use crate::multipart::Multipart;
use crate::response::Response;

/// Content type attached to JSON request bodies
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Content type attached to form-url-encoded request bodies
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request handed to a [`Transport`](crate::Transport)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URL
    pub url: String,
    /// Request headers, in insertion order
    pub headers: Vec<(String, String)>,
    /// Request body; `None` sends no body at all
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    /// First header value with the given name, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Request payload before it is turned into bytes
#[derive(Debug, Default)]
pub(crate) enum RequestBody {
    #[default]
    Empty,
    Json(Vec<u8>),
    Form(String),
    Multipart(Multipart),
}

impl RequestBody {
    /// Compact UTF-8 JSON, no BOM and no whitespace
    pub(crate) fn json<T: Serialize + ?Sized>(value: &T) -> Response<Self> {
        serde_json::to_vec(value)
            .map(RequestBody::Json)
            .map_err(|e| HttpError::Serialization(e.to_string()))
    }

    /// Form-url-encoded pairs, kept in caller order
    pub(crate) fn form<K, V>(pairs: &[(K, V)]) -> Response<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(key, value)| (key.as_ref(), value.as_ref()))
            .collect();
        serde_urlencoded::to_string(&pairs)
            .map(RequestBody::Form)
            .map_err(|e| HttpError::Serialization(e.to_string()))
    }

    /// Content type header value and encoded bytes
    pub(crate) fn into_parts(self) -> (Option<String>, Option<Vec<u8>>) {
        match self {
            RequestBody::Empty => (None, None),
            RequestBody::Json(bytes) => (Some(CONTENT_TYPE_JSON.to_string()), Some(bytes)),
            RequestBody::Form(encoded) => {
                (Some(CONTENT_TYPE_FORM.to_string()), Some(encoded.into_bytes()))
            }
            RequestBody::Multipart(form) => (Some(form.content_type()), Some(form.encode())),
        }
    }
}
