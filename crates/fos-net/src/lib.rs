//! fOS Networking
//!
//! HTTP resource loading behind the [`Fetcher`] seam, so document logic can
//! be driven by the real network or by an in-memory table in tests.

use std::future::Future;

pub mod loader;

pub use loader::{Request, ResourceLoader};
pub use url::Url;

/// Fetch a URL with a default loader
pub async fn fetch(url: &str) -> Result<Response, NetError> {
    ResourceLoader::new()?.fetch(url).await
}

/// Anything that can turn a URL into a response
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Response, NetError>>;
}

/// HTTP Response
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// 200 response with an HTML body
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".into(), "text/html; charset=utf-8".into())],
            body: body.into().into_bytes(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Network error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
