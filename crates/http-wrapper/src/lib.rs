//! JSON call adapter over a pluggable HTTP transport
//!
//! Joins request paths onto a fixed base address, encodes request payloads as
//! JSON (or form / multipart), sends them through a [`Transport`] and turns
//! the response into either a decoded value or an [`HttpError`]. A non-2xx
//! response always becomes [`HttpError::Api`] carrying the status code and the
//! raw body text.
//!
//! # Example
//!
//! ```no_run
//! use http_wrapper::{CancellationToken, JsonClient, Method, Response};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct NewUser {
//!     name: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! async fn example(cancel: CancellationToken) -> Response<User> {
//!     let client = JsonClient::new("https://api.example.com/v1")?;
//!
//!     let created: User = client
//!         .post("/users", &NewUser { name: "ferris".to_string() })
//!         .await?;
//!
//!     client
//!         .request(Method::Get, &format!("users/{}", created.id))
//!         .cancel_on(cancel)
//!         .send_json()
//!         .await
//! }
//! ```

mod backends;
mod client;
mod config;
mod error;
mod multipart;
mod request;
mod request_url;
mod response;
mod translate;
mod transport;

#[cfg(feature = "reqwest")]
pub use backends::{HttpClientBuilder, ReqwestBody, ReqwestTransport};
pub use client::{CallBuilder, JsonClient};
pub use config::ClientConfig;
pub use error::{BoxError, HttpError};
pub use multipart::{Multipart, Part};
pub use request::{Method, TransportRequest, CONTENT_TYPE_FORM, CONTENT_TYPE_JSON};
pub use request_url::join_url;
pub use response::{BufferedBody, RawResponse, Response, ResponseBody, ResponseHead};
pub use tokio_util::sync::CancellationToken;
pub use translate::ResponseTranslator;
pub use transport::Transport;
