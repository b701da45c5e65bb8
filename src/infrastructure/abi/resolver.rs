//! Remote ABI resolution via Etherscan and Sourcify APIs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::abi::{AbiFetchError, AbiResolver};

pub const DEFAULT_ETHERSCAN_URL: &str = "https://api.etherscan.io/v2/api";
pub const DEFAULT_SOURCIFY_URL: &str = "https://sourcify.dev/server";

/// Etherscan API response structure
#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: serde_json::Value,
}

/// Sourcify API response structure
#[derive(Debug, Deserialize)]
struct SourcifyResponse {
    #[serde(default)]
    abi: Option<serde_json::Value>,
}

/// In-memory cache of resolved ABIs keyed by (chain_id, lowercase address).
///
/// Only successes are cached, so a failed lookup is retried on the next request.
#[derive(Debug, Clone, Default)]
struct AbiCache {
    abis: Arc<RwLock<HashMap<(u64, String), serde_json::Value>>>,
}

impl AbiCache {
    async fn get(&self, chain_id: u64, address: &str) -> Option<serde_json::Value> {
        let cache = self.abis.read().await;
        cache.get(&(chain_id, address.to_string())).cloned()
    }

    async fn insert(&self, chain_id: u64, address: &str, abi: serde_json::Value) {
        let mut cache = self.abis.write().await;
        cache.insert((chain_id, address.to_string()), abi);
    }

    async fn len(&self) -> usize {
        self.abis.read().await.len()
    }
}

fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

fn transport_error(err: reqwest::Error) -> AbiFetchError {
    if err.is_timeout() {
        AbiFetchError::Unreachable(format!("request timed out: {err}"))
    } else {
        AbiFetchError::Unreachable(err.to_string())
    }
}

/// Classify an Etherscan failure message
fn classify_etherscan_failure(message: &str) -> AbiFetchError {
    let lower = message.to_lowercase();
    if lower.contains("rate limit") {
        AbiFetchError::RateLimited(message.to_string())
    } else if lower.contains("api key") || lower.contains("apikey") {
        AbiFetchError::InvalidCredential(message.to_string())
    } else {
        AbiFetchError::NotFound(message.to_string())
    }
}

/// ABI resolver backed by the Etherscan `contract/getabi` endpoint
pub struct EtherscanResolver {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    cache: AbiCache,
}

impl EtherscanResolver {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            cache: AbiCache::default(),
        })
    }

    /// Number of cached ABIs
    pub async fn cached(&self) -> usize {
        self.cache.len().await
    }

    async fn query(&self, chain_id: u64, address: &str) -> Result<serde_json::Value, AbiFetchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AbiFetchError::InvalidCredential(
                "Etherscan API key is not configured".to_string(),
            ));
        };

        let chain_id = chain_id.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("chainid", chain_id.as_str()),
                ("module", "contract"),
                ("action", "getabi"),
                ("address", address),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AbiFetchError::RateLimited(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(AbiFetchError::Unreachable(format!("HTTP {status}")));
        }

        let data: EtherscanResponse = response
            .json()
            .await
            .map_err(|e| AbiFetchError::Malformed(e.to_string()))?;

        let result = data.result.as_str().unwrap_or_default();
        if data.status != "1" {
            let message = if result.is_empty() {
                data.message.unwrap_or_else(|| "unknown error".to_string())
            } else {
                result.to_string()
            };
            return Err(classify_etherscan_failure(&message));
        }

        serde_json::from_str(result)
            .map_err(|e| AbiFetchError::Malformed(format!("ABI payload is not JSON: {e}")))
    }
}

#[async_trait]
impl AbiResolver for EtherscanResolver {
    fn name(&self) -> &'static str {
        "etherscan"
    }

    async fn fetch_abi(
        &self,
        chain_id: u64,
        address: &str,
    ) -> Result<serde_json::Value, AbiFetchError> {
        let address = address.trim().to_lowercase();
        if let Some(abi) = self.cache.get(chain_id, &address).await {
            tracing::debug!(%address, chain_id, "abi cache hit");
            return Ok(abi);
        }

        let abi = self.query(chain_id, &address).await?;
        tracing::debug!(%address, chain_id, "abi fetched from etherscan");
        self.cache.insert(chain_id, &address, abi.clone()).await;
        Ok(abi)
    }
}

/// ABI resolver backed by the Sourcify v2 contract API
pub struct SourcifyResolver {
    http: reqwest::Client,
    base_url: String,
    cache: AbiCache,
}

impl SourcifyResolver {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: AbiCache::default(),
        })
    }

    /// Number of cached ABIs
    pub async fn cached(&self) -> usize {
        self.cache.len().await
    }

    async fn query(&self, chain_id: u64, address: &str) -> Result<serde_json::Value, AbiFetchError> {
        let url = format!("{}/v2/contract/{}/{}", self.base_url, chain_id, address);

        let response = self
            .http
            .get(&url)
            .query(&[("fields", "abi")])
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(AbiFetchError::NotFound(format!(
                    "{address} is not verified on chain {chain_id}"
                )))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(AbiFetchError::RateLimited("HTTP 429".to_string()))
            }
            status if !status.is_success() => {
                return Err(AbiFetchError::Unreachable(format!("HTTP {status}")))
            }
            _ => {}
        }

        let data: SourcifyResponse = response
            .json()
            .await
            .map_err(|e| AbiFetchError::Malformed(e.to_string()))?;

        data.abi
            .ok_or_else(|| AbiFetchError::Malformed("response has no abi field".to_string()))
    }
}

#[async_trait]
impl AbiResolver for SourcifyResolver {
    fn name(&self) -> &'static str {
        "sourcify"
    }

    async fn fetch_abi(
        &self,
        chain_id: u64,
        address: &str,
    ) -> Result<serde_json::Value, AbiFetchError> {
        let address = address.trim().to_lowercase();
        if let Some(abi) = self.cache.get(chain_id, &address).await {
            tracing::debug!(%address, chain_id, "abi cache hit");
            return Ok(abi);
        }

        let abi = self.query(chain_id, &address).await?;
        tracing::debug!(%address, chain_id, "abi fetched from sourcify");
        self.cache.insert(chain_id, &address, abi.clone()).await;
        Ok(abi)
    }
}
