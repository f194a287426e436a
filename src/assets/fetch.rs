use crate::assets::{AssetError, AssetFetcher, NormalizedImage, normalize};
use bytes::Bytes;
use reqwest::blocking::Client;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches logos over HTTP(S).
///
/// A request that fails during the TLS handshake or certificate check is
/// retried once with certificate verification disabled.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, AssetError> {
        Ok(Self {
            client: build_client(timeout, false)?,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Download raw bytes, applying the TLS fallback.
    pub fn download(&self, url: &str) -> Result<Bytes, AssetError> {
        match get(&self.client, url) {
            Err(AssetError::Http(err)) if url.starts_with("https://") && is_tls_failure(&err) => {
                warn!(url, error = %err, "TLS failure, retrying without certificate verification");
                let insecure = build_client(self.timeout, true)?;
                get(&insecure, url)
            },
            other => other,
        }
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch_and_normalize(&self, url: &str) -> Option<NormalizedImage> {
        let data = match self.download(url) {
            Ok(data) => data,
            Err(err) => {
                warn!(url, error = %err, "could not download image");
                return None;
            },
        };
        debug!(url, bytes = data.len(), "image downloaded");

        match normalize(&data) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!(url, error = %err, "could not normalize image");
                None
            },
        }
    }
}

/// A fetcher that never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

impl AssetFetcher for OfflineFetcher {
    fn fetch_and_normalize(&self, url: &str) -> Option<NormalizedImage> {
        debug!(url, "offline, skipping image");
        None
    }
}

fn build_client(timeout: Duration, accept_invalid_certs: bool) -> Result<Client, AssetError> {
    Ok(Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()?)
}

fn get(client: &Client, url: &str) -> Result<Bytes, AssetError> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(AssetError::Status(status.as_u16()));
    }
    Ok(response.bytes()?)
}

/// Whether a request error was caused by TLS or certificate validation.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    if !err.is_connect() && !err.is_request() {
        return false;
    }
    let mut source: Option<&dyn StdError> = Some(err);
    while let Some(current) = source {
        if mentions_tls(&current.to_string()) {
            return true;
        }
        source = current.source();
    }
    false
}

fn mentions_tls(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["certificate", "tls", "ssl", "handshake"]
        .iter()
        .any(|needle| message.contains(needle))
}
