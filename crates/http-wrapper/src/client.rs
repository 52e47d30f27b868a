//! JSON call adapter
//!
//! Every verb funnels into [`CallBuilder`], which joins the URL, encodes the
//! body, sends through the [`Transport`], runs the translation hook and then
//! classifies the response.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::error::{BoxError, HttpError};
use crate::multipart::Multipart;
use crate::request::{Method, RequestBody, TransportRequest};
use crate::request_url::join_url;
use crate::response::{RawResponse, Response, ResponseBody, ResponseHead};
use crate::translate::ResponseTranslator;
use crate::transport::Transport;

/// JSON client over a shared transport
#[derive(Debug)]
pub struct JsonClient<T> {
    transport: Arc<T>,
}

impl<T> Clone for JsonClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> JsonClient<T> {
    /// Create a client around a transport
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Create a client around a transport that is already shared
    pub fn from_shared(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Base address of the transport
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Absolute URL a request for `path` is sent to
    pub fn url_for(&self, path: &str) -> String {
        join_url(self.transport.base_url(), path)
    }

    /// Request builder for calls that need a hook, cancellation or headers
    pub fn request(&self, method: Method, path: &str) -> CallBuilder<'_, T> {
        CallBuilder::new(self, method, path)
    }

    // === Verb wrappers ===

    /// GET, returns JSON deserialized to R
    pub async fn get<R>(&self, path: &str) -> Response<R>
    where
        R: DeserializeOwned,
    {
        self.request(Method::Get, path).send_json().await
    }

    /// GET with a JSON body, returns JSON deserialized to R
    pub async fn get_with_body<B, R>(&self, path: &str, body: &B) -> Response<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::Get, path).json(body).send_json().await
    }

    /// PUT with a JSON body, returns JSON deserialized to R
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Response<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::Put, path).json(body).send_json().await
    }

    /// PUT with a JSON body, ignoring the response body
    pub async fn put_unit<B>(&self, path: &str, body: &B) -> Response<()>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::Put, path).json(body).send().await
    }

    /// POST with a JSON body, returns JSON deserialized to R
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Response<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::Post, path).json(body).send_json().await
    }

    /// POST with a JSON body, ignoring the response body
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Response<()>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::Post, path).json(body).send().await
    }

    /// POST without a body, returns JSON deserialized to R
    pub async fn post_empty<R>(&self, path: &str) -> Response<R>
    where
        R: DeserializeOwned,
    {
        self.request(Method::Post, path).send_json().await
    }

    /// POST with form data in the given order, returns JSON deserialized to R
    pub async fn post_form<K, V, R>(&self, path: &str, pairs: &[(K, V)]) -> Response<R>
    where
        K: AsRef<str>,
        V: AsRef<str>,
        R: DeserializeOwned,
    {
        self.request(Method::Post, path).form(pairs).send_json().await
    }

    /// POST a multipart payload, returns JSON deserialized to R
    pub async fn post_multipart<R>(&self, path: &str, form: Multipart) -> Response<R>
    where
        R: DeserializeOwned,
    {
        self.request(Method::Post, path)
            .multipart(form)
            .send_json()
            .await
    }

    /// DELETE, returns JSON deserialized to R
    pub async fn delete<R>(&self, path: &str) -> Response<R>
    where
        R: DeserializeOwned,
    {
        self.request(Method::Delete, path).send_json().await
    }

    /// DELETE with a JSON body, returns JSON deserialized to R
    pub async fn delete_with_body<B, R>(&self, path: &str, body: &B) -> Response<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::Delete, path)
            .json(body)
            .send_json()
            .await
    }
}

/// A single call being prepared.
///
/// Encoding failures are held until the call is sent so the builder chain
/// stays infallible.
pub struct CallBuilder<'a, T> {
    client: &'a JsonClient<T>,
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: RequestBody,
    error: Option<HttpError>,
    translator: Option<Arc<dyn ResponseTranslator>>,
    cancel: Option<CancellationToken>,
}

impl<T> std::fmt::Debug for CallBuilder<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallBuilder")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("error", &self.error)
            .field("translator", &self.translator.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a, T: Transport> CallBuilder<'a, T> {
    fn new(client: &'a JsonClient<T>, method: Method, path: &str) -> Self {
        Self {
            client,
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            error: None,
            translator: None,
            cancel: None,
        }
    }

    fn with_body(mut self, body: Response<RequestBody>) -> Self {
        match body {
            Ok(body) => {
                self.body = body;
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Add a header to the request.
    ///
    /// An explicit `Content-Type` replaces the one derived from the body.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set the request body as JSON
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Self {
        let body = RequestBody::json(body);
        self.with_body(body)
    }

    /// Set the request body as form data, keeping pair order
    pub fn form<K, V>(self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let body = RequestBody::form(pairs);
        self.with_body(body)
    }

    /// Set the request body to a pre-built multipart payload
    pub fn multipart(self, form: Multipart) -> Self {
        self.with_body(Ok(RequestBody::Multipart(form)))
    }

    /// Classify responses with a closure before the default handling
    pub fn translate_with<F>(self, hook: F) -> Self
    where
        F: Fn(&ResponseHead) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.translator(Arc::new(hook))
    }

    /// Classify responses with a shared translator before the default handling
    pub fn translator(mut self, translator: Arc<dyn ResponseTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Abort the call when `token` is cancelled
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Send the request and deserialize a successful response as JSON
    pub async fn send_json<R: DeserializeOwned>(self) -> Response<R> {
        let cancel = self.cancel.clone();
        cancellable(cancel, async move {
            let response = self.round_trip().await?;
            let status = response.status();
            response.json().await.inspect_err(|err| {
                tracing::warn!(status = status, "Could not decode response body: {}", err);
            })
        })
        .await
    }

    /// Send the request; a successful response body is not read
    pub async fn send(self) -> Response<()> {
        let cancel = self.cancel.clone();
        cancellable(cancel, async move { self.round_trip().await.map(|_| ()) }).await
    }

    /// Send the request and hand back the response with its body unread.
    ///
    /// The translation hook still runs; the status is not classified.
    pub async fn send_raw(self) -> Response<RawResponse<T::Body>> {
        let cancel = self.cancel.clone();
        cancellable(cancel, self.dispatch()).await
    }

    /// Dispatch and turn any non-2xx response into [`HttpError::Api`]
    async fn round_trip(self) -> Response<RawResponse<T::Body>> {
        let response = self.dispatch().await?;
        if response.is_success() {
            return Ok(response);
        }
        Err(api_error(response).await)
    }

    #[instrument(skip_all, fields(method = %self.method, url = tracing::field::Empty))]
    async fn dispatch(self) -> Response<RawResponse<T::Body>> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let url = self.client.url_for(&self.path);
        tracing::Span::current().record("url", url.as_str());

        let (content_type, body) = self.body.into_parts();
        let mut headers = self.headers;
        let has_content_type = headers
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case("content-type"));
        if let Some(content_type) = content_type.filter(|_| !has_content_type) {
            headers.push(("Content-Type".to_string(), content_type));
        }

        let request = TransportRequest {
            method: self.method,
            url,
            headers,
            body,
        };

        tracing::debug!("Sending request");
        let response = self.client.transport.send(request).await?;
        tracing::debug!(status = response.status(), "Received response head");

        if let Some(translator) = &self.translator {
            translator
                .translate(response.head())
                .map_err(HttpError::Translated)?;
        }

        Ok(response)
    }
}

async fn api_error<B: ResponseBody>(response: RawResponse<B>) -> HttpError {
    let status = response.status();
    match response.text().await {
        Ok(body) => {
            tracing::warn!(status = status, "Http request failed: {}", body);
            HttpError::Api { status, body }
        }
        Err(err) => err,
    }
}

async fn cancellable<F, R>(token: Option<CancellationToken>, call: F) -> Response<R>
where
    F: Future<Output = Response<R>>,
{
    let Some(token) = token else {
        return call.await;
    };

    tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::debug!("Request cancelled");
            Err(HttpError::Cancelled)
        }
        result = call => result,
    }
}
