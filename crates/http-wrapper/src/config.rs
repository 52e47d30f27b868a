//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::request_url::validate_base_url;
use crate::response::Response;

/// Client configuration.
///
/// Usually embedded in an application's own config file; every field except
/// `base_url` may be omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Absolute base address request paths are joined onto
    pub base_url: String,

    /// Total timeout per request, in seconds.
    pub timeout_secs: Option<u64>,

    /// Value of the `User-Agent` header.
    pub user_agent: Option<String>,

    /// Proxy URL.
    pub proxy: Option<String>,

    /// Only proxy hosts matching this regex; all hosts when unset.
    pub proxy_host_matcher: Option<String>,

    /// Accept invalid TLS certificates.
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Config with only a base address
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Timeout as a [`Duration`]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Check that the base address is usable
    pub fn validate(&self) -> Response<()> {
        validate_base_url(&self.base_url).map(|_| ())
    }
}
