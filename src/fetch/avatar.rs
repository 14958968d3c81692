use std::io::Read as _;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::{
    assets::decode::decode_image,
    foundation::error::{PosterError, PosterResult},
};

/// Network settings for avatar retrieval.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout (connect + headers + body) in milliseconds.
    pub timeout_ms: u64,
    /// Largest accepted response body.
    pub max_body_bytes: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_body_bytes: 16 * 1024 * 1024,
            user_agent: concat!("poster/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Source of decoded avatar images.
///
/// [`HttpAvatarFetcher`] is the network implementation; tests and offline callers can supply
/// their own.
pub trait AvatarSource: Send + Sync {
    /// Retrieve and decode the avatar at `url`.
    fn fetch_avatar(&self, url: &str) -> PosterResult<image::DynamicImage>;
}

/// Blocking HTTP(S) avatar fetcher with a bounded timeout.
///
/// One GET per call, never retried.
#[derive(Clone, Debug)]
pub struct HttpAvatarFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpAvatarFetcher {
    /// Build the HTTP client once; it is reused across requests.
    pub fn new(config: FetchConfig) -> PosterResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PosterError::fetch(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Download the raw response body for `url`.
    pub fn fetch_bytes(&self, url: &str) -> PosterResult<Vec<u8>> {
        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                PosterError::fetch(format!(
                    "GET {url} timed out after {}ms",
                    self.config.timeout_ms
                ))
            } else {
                PosterError::fetch(format!("GET {url} failed: {e}"))
            }
        })?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(PosterError::fetch(format!(
                "GET {url} returned status {}",
                status.as_u16()
            )));
        }

        let limit = self.config.max_body_bytes;
        if let Some(len) = resp.content_length()
            && len > limit
        {
            return Err(PosterError::fetch(format!(
                "avatar body of {len} bytes exceeds limit of {limit} bytes"
            )));
        }

        let mut body = Vec::new();
        resp.take(limit.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|e| PosterError::fetch(format!("failed to read response body: {e}")))?;
        if body.len() as u64 > limit {
            return Err(PosterError::fetch(format!(
                "avatar body exceeds limit of {limit} bytes"
            )));
        }
        Ok(body)
    }
}

impl AvatarSource for HttpAvatarFetcher {
    #[tracing::instrument(skip(self))]
    fn fetch_avatar(&self, url: &str) -> PosterResult<image::DynamicImage> {
        let bytes = self.fetch_bytes(url).inspect_err(|e| {
            tracing::warn!(error = %e, "avatar fetch failed");
        })?;
        tracing::debug!(bytes = bytes.len(), "avatar downloaded");
        decode_avatar(&bytes)
    }
}

/// Decode downloaded avatar bytes, sniffing the format from content.
pub fn decode_avatar(bytes: &[u8]) -> PosterResult<image::DynamicImage> {
    decode_image(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/avatar.rs"]
mod tests;
