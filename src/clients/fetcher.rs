//! One-shot resource fetching over HTTP(S)

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::warn;

use crate::errors::DigestError;

pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const MAX_REDIRECTS: usize = 10;

/// Whatever came back from a single GET. Non-success statuses are returned,
/// not raised; only transport failures are errors.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl FetchedResource {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, DigestError>;
}

/// reqwest-backed fetcher with a fixed timeout, redirect following and a
/// browser-like identity.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// `accept_invalid_certs` disables certificate validation entirely. It is
    /// meant for pulling public page assets off misconfigured hosts and must
    /// never be enabled for anything that carries credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the reqwest client cannot be built.
    pub fn new(timeout: Duration, accept_invalid_certs: bool) -> Result<Self, DigestError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        if accept_invalid_certs {
            warn!("Certificate validation is disabled for resource fetches");
        }

        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .default_headers(headers)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, DigestError> {
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        Ok(FetchedResource {
            status,
            bytes,
            content_type,
        })
    }
}
