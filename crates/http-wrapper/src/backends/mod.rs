//! Transport backends

#[cfg(feature = "reqwest")]
pub mod reqwest_backend;

#[cfg(feature = "reqwest")]
pub use reqwest_backend::{HttpClientBuilder, ReqwestBody, ReqwestTransport};
