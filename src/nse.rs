use std::time::Duration;

use reqwest::{
    Client, Response, Url,
    header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{NSE_BASE, NSE_CHAIN_PAGE};
use crate::chain::OptionChainResponse;

const BROWSER_UA: &str =
    "Mozilla/5.0 (Linux; Android 12; Mobile) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Mobile Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NseError {
    /// Timeout, connection failure or an HTTP error status.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The body came back but did not have the shape we expect.
    #[error("unexpected response shape: {0}")]
    Schema(String),
    #[error("invalid url")]
    InvalidUrl,
}

/// Client for the NSE public JSON endpoints. The site rejects bare
/// clients, so every request carries browser-like headers and the
/// cookie jar is primed by [`NseClient::warmup`].
pub struct NseClient {
    client: Client,
    base_url: Url,
}

impl NseClient {
    pub fn new() -> Result<Self, NseError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: NSE_BASE.parse().map_err(|_| NseError::InvalidUrl)?,
        })
    }

    /// Hits the option-chain page once so the session cookies the API
    /// endpoints expect end up in the jar. Failure is reported but not
    /// fatal; the API calls may still get through.
    pub async fn warmup(&self) {
        match self.get(NSE_CHAIN_PAGE.parse().unwrap()).await {
            Ok(res) => debug!("warmup ok: {}", res.status()),
            Err(e) => warn!("warmup failed: {e}"),
        }
    }

    pub async fn option_chain(&self, symbol: &str) -> Result<OptionChainResponse, NseError> {
        let url = self.api_url("/api/option-chain-indices", symbol)?;
        self.get_json(url).await
    }

    /// Raw JSON for the derivative quote endpoint. The schema varies, so
    /// no model here; callers mine it with [`crate::scan::find_oi_volume`].
    pub async fn derivative_quote(&self, symbol: &str) -> Result<Value, NseError> {
        let url = self.api_url("/api/quote-derivative", symbol)?;
        self.get_json(url).await
    }

    fn api_url(&self, path: &str, symbol: &str) -> Result<Url, NseError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|_| NseError::InvalidUrl)?;
        url.query_pairs_mut().append_pair("symbol", symbol);

        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Response, NseError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_UA)
            .header(REFERER, NSE_CHAIN_PAGE)
            .header(ACCEPT, "*/*")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        Ok(response.error_for_status()?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, NseError> {
        let response = self.get(url).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| NseError::Schema(format!("couldnt parse json response: {e}")))
    }
}
