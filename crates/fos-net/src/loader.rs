//! Resource Loader
//!
//! HTTP GET over a blocking `reqwest` client. Requests run on smol's
//! blocking thread pool so callers only ever see a future.

use std::collections::HashMap;

use url::Url;

use crate::{Fetcher, NetError, Response};

const USER_AGENT: &str = "fOS-Engine/0.1";

/// Request configuration
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub url: String,
    pub headers: HashMap<String, String>,
}

impl Request {
    pub fn get(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }
}

/// Load resources from network
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    client: reqwest::blocking::Client,
    base: Option<Url>,
}

impl ResourceLoader {
    pub fn new() -> Result<Self, NetError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NetError::Network(e.to_string()))?;

        Ok(Self { client, base: None })
    }

    /// Resolve relative URLs against `base`
    pub fn with_base(mut self, base: &str) -> Result<Self, NetError> {
        let base = Url::parse(base).map_err(|e| NetError::InvalidUrl(format!("{base}: {e}")))?;
        self.base = Some(base);
        Ok(self)
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Absolute form of `url`
    pub fn resolve(&self, url: &str) -> Result<Url, NetError> {
        let parsed = match &self.base {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        parsed.map_err(|e| NetError::InvalidUrl(format!("{url}: {e}")))
    }

    /// Fetch a URL with GET
    pub async fn fetch(&self, url: &str) -> Result<Response, NetError> {
        self.request(Request::get(url)).await
    }

    /// Make an HTTP request
    pub async fn request(&self, req: Request) -> Result<Response, NetError> {
        let url = self.resolve(&req.url)?;
        tracing::info!("HTTP GET {}", url);

        let client = self.client.clone();
        smol::unblock(move || send(&client, url, req.headers)).await
    }
}

impl Fetcher for ResourceLoader {
    async fn fetch(&self, url: &str) -> Result<Response, NetError> {
        ResourceLoader::fetch(self, url).await
    }
}

fn send(
    client: &reqwest::blocking::Client,
    url: Url,
    headers: HashMap<String, String>,
) -> Result<Response, NetError> {
    let mut builder = client.get(url);
    for (key, value) in &headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    let response = builder.send().map_err(|e| NetError::Network(e.to_string()))?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();
    let body = response
        .bytes()
        .map_err(|e| NetError::Network(e.to_string()))?
        .to_vec();

    let response = Response { status, headers, body };
    if !response.is_success() {
        tracing::debug!("HTTP status {}", status);
        return Err(NetError::HttpError { status });
    }
    Ok(response)
}
