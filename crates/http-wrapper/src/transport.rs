//! HTTP transport seam
//!
//! The call adapter never talks to the network itself. A [`Transport`] owns
//! connection management, TLS, redirects and the base address; the adapter
//! only hands it fully resolved [`TransportRequest`]s.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::request::TransportRequest;
use crate::response::{RawResponse, Response, ResponseBody};

/// Expected HTTP Transport
///
/// Implementations must accept concurrent in-flight requests from a shared
/// reference.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Streamed response body type
    type Body: ResponseBody + 'static;

    /// Absolute base address every request path is joined onto
    fn base_url(&self) -> &str;

    /// Send a request.
    ///
    /// Resolves once the status line and headers have arrived; the body is
    /// read afterwards through [`RawResponse`].
    async fn send(&self, request: TransportRequest) -> Response<RawResponse<Self::Body>>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    type Body = T::Body;

    fn base_url(&self) -> &str {
        (**self).base_url()
    }

    async fn send(&self, request: TransportRequest) -> Response<RawResponse<Self::Body>> {
        (**self).send(request).await
    }
}
