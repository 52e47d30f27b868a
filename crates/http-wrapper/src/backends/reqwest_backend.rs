//! reqwest-based Transport implementation

use std::time::Duration;

use async_trait::async_trait;

use crate::client::JsonClient;
use crate::config::ClientConfig;
use crate::error::HttpError;
use crate::request::{Method, TransportRequest};
use crate::request_url::validate_base_url;
use crate::response::{RawResponse, Response, ResponseBody, ResponseHead};
use crate::transport::Transport;

/// reqwest-based transport with a fixed base address
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport with default reqwest settings
    pub fn new(base_url: &str) -> Response<Self> {
        Self::from_reqwest(reqwest::Client::new(), base_url)
    }

    /// Create a transport from a configured reqwest::Client
    pub fn from_reqwest(client: reqwest::Client, base_url: &str) -> Response<Self> {
        Ok(Self {
            inner: client,
            base_url: validate_base_url(base_url)?,
        })
    }
}

/// Streamed body of a reqwest response
#[derive(Debug)]
pub struct ReqwestBody {
    inner: reqwest::Response,
}

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn chunk(&mut self) -> Response<Option<Vec<u8>>> {
        let chunk = self.inner.chunk().await.map_err(HttpError::from)?;
        Ok(chunk.map(|bytes| bytes.to_vec()))
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Put => reqwest::Method::PUT,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    type Body = ReqwestBody;

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: TransportRequest) -> Response<RawResponse<ReqwestBody>> {
        let mut builder = self
            .inner
            .request(to_reqwest_method(request.method), &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        // reqwest resolves `send` once the head is in; the body stays on the wire
        let response = builder.send().await.map_err(HttpError::from)?;

        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let head = ResponseHead::new(response.status().as_u16(), headers);

        Ok(RawResponse::new(head, ReqwestBody { inner: response }))
    }
}

/// Builder for a reqwest-backed [`JsonClient`]
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    accept_invalid_certs: bool,
    proxy: Option<ProxyConfig>,
}

#[derive(Debug)]
struct ProxyConfig {
    url: url::Url,
    matcher: Option<regex::Regex>,
}

impl HttpClientBuilder {
    /// Start from a configuration
    pub fn from_config(config: &ClientConfig) -> Response<Self> {
        let mut builder = Self::default()
            .base_url(&config.base_url)
            .accept_invalid_certs(config.accept_invalid_certs);

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(proxy) = &config.proxy {
            let url = url::Url::parse(proxy)
                .map_err(|e| HttpError::Proxy(format!("Invalid proxy URL: {}", e)))?;
            builder = match &config.proxy_host_matcher {
                Some(pattern) => builder.proxy_with_matcher(url, pattern)?,
                None => builder.proxy(url),
            };
        }

        Ok(builder)
    }

    /// Set the base address every request path is joined onto
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    /// Total timeout per request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Value of the `User-Agent` header
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Accept invalid TLS certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, url: url::Url) -> Self {
        self.proxy = Some(ProxyConfig { url, matcher: None });
        self
    }

    /// Set a proxy URL with a host pattern matcher
    pub fn proxy_with_matcher(mut self, url: url::Url, pattern: &str) -> Response<Self> {
        let matcher = regex::Regex::new(pattern)
            .map_err(|e| HttpError::Proxy(format!("Invalid proxy pattern: {}", e)))?;
        self.proxy = Some(ProxyConfig {
            url,
            matcher: Some(matcher),
        });
        Ok(self)
    }

    /// Build the transport alone
    pub fn build_transport(self) -> Response<ReqwestTransport> {
        let base_url = self
            .base_url
            .ok_or_else(|| HttpError::Build("base URL is required".to_string()))?;

        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(self.accept_invalid_certs);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(proxy_config) = self.proxy {
            let proxy_url = proxy_config.url.to_string();
            let proxy = if let Some(matcher) = proxy_config.matcher {
                reqwest::Proxy::custom(move |url| {
                    if matcher.is_match(url.host_str().unwrap_or("")) {
                        Some(proxy_url.clone())
                    } else {
                        None
                    }
                })
            } else {
                reqwest::Proxy::all(&proxy_url).map_err(|e| HttpError::Proxy(e.to_string()))?
            };
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(HttpError::from)?;
        ReqwestTransport::from_reqwest(client, &base_url)
    }

    /// Build the HTTP client
    pub fn build(self) -> Response<JsonClient<ReqwestTransport>> {
        self.build_transport().map(JsonClient::with_transport)
    }
}

impl JsonClient<ReqwestTransport> {
    /// Create a reqwest-backed client with default settings
    pub fn new(base_url: &str) -> Response<Self> {
        ReqwestTransport::new(base_url).map(JsonClient::with_transport)
    }

    /// Create a new HTTP client builder
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a reqwest-backed client from configuration
    pub fn from_config(config: &ClientConfig) -> Response<Self> {
        HttpClientBuilder::from_config(config)?.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new() {
        let client = JsonClient::new("http://localhost:3338").expect("valid base");
        assert_eq!(client.base_url(), "http://localhost:3338");
        assert_eq!(client.url_for("v1/info"), "http://localhost:3338/v1/info");
    }

    #[test]
    fn test_client_new_rejects_relative_base() {
        let result = JsonClient::new("localhost/api");
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = HttpClientBuilder::default().build();
        match result {
            Err(HttpError::Build(msg)) => assert!(msg.contains("base URL")),
            other => panic!("Expected HttpError::Build, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_build() {
        let result = JsonClient::builder()
            .base_url("https://example.com/api/")
            .timeout(Duration::from_secs(5))
            .user_agent("http-wrapper-tests")
            .build();
        let client = result.expect("valid builder");
        assert_eq!(client.url_for("/users"), "https://example.com/api/users");
    }

    #[test]
    fn test_builder_accept_invalid_certs() {
        let result = HttpClientBuilder::default()
            .base_url("https://localhost")
            .accept_invalid_certs(true)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_proxy() {
        let proxy_url = url::Url::parse("http://localhost:8080").expect("Valid proxy URL");
        let result = HttpClientBuilder::default()
            .base_url("http://example.com")
            .proxy(proxy_url)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_proxy_with_valid_matcher() {
        let proxy_url = url::Url::parse("http://localhost:8080").expect("Valid proxy URL");
        let builder = HttpClientBuilder::default()
            .base_url("http://example.com")
            .proxy_with_matcher(proxy_url, r".*\.onion$")
            .expect("Valid matcher should succeed");
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_builder_proxy_with_invalid_matcher() {
        let proxy_url = url::Url::parse("http://localhost:8080").expect("Valid proxy URL");
        let result = HttpClientBuilder::default().proxy_with_matcher(proxy_url, r"[invalid");

        if let Err(HttpError::Proxy(msg)) = result {
            assert!(msg.contains("Invalid proxy pattern"));
        } else {
            panic!("Expected HttpError::Proxy");
        }
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9000/".to_string(),
            timeout_secs: Some(3),
            proxy: Some("http://127.0.0.1:9050".to_string()),
            proxy_host_matcher: Some(r"\.onion$".to_string()),
            ..Default::default()
        };
        let client = JsonClient::from_config(&config).expect("valid config");
        assert_eq!(client.base_url(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_from_config_rejects_bad_proxy() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9000".to_string(),
            proxy: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            HttpClientBuilder::from_config(&config),
            Err(HttpError::Proxy(_))
        ));
    }
}
