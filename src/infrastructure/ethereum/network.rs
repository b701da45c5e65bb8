//! Chain identifier of the active network

use std::time::Duration;

use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{Context, Result};
use tokio::sync::OnceCell;

/// Where the domain `chainId` comes from when a request does not carry one
#[derive(Debug)]
pub enum ChainIdSource {
    /// Fixed by configuration
    Fixed(u64),
    /// Queried once via `eth_chainId` and memoized
    Rpc {
        url: String,
        timeout: Duration,
        cached: OnceCell<u64>,
    },
    /// Nothing configured; every request must supply its own chain id
    Unconfigured,
}

impl ChainIdSource {
    pub fn rpc(url: impl Into<String>, timeout: Duration) -> Self {
        Self::Rpc {
            url: url.into(),
            timeout,
            cached: OnceCell::new(),
        }
    }

    /// Resolve the chain id of the active network
    pub async fn chain_id(&self) -> Result<u64> {
        match self {
            Self::Fixed(chain_id) => Ok(*chain_id),
            Self::Rpc {
                url,
                timeout,
                cached,
            } => cached
                .get_or_try_init(|| async {
                    let chain_id = query_chain_id(url, *timeout).await?;
                    tracing::info!(rpc = %url, chain_id, "resolved chain id from rpc");
                    Ok::<u64, anyhow::Error>(chain_id)
                })
                .await
                .copied(),
            Self::Unconfigured => {
                anyhow::bail!("no chain id configured: set network.chain_id or network.rpc_url")
            }
        }
    }
}

async fn query_chain_id(url: &str, timeout: Duration) -> Result<u64> {
    let rpc_url = url.parse().context("Invalid HTTP URL")?;
    let provider = ProviderBuilder::new().connect_http(rpc_url);

    tokio::time::timeout(timeout, provider.get_chain_id())
        .await
        .with_context(|| format!("eth_chainId timed out after {}s", timeout.as_secs()))?
        .context("eth_chainId failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_chain_id() {
        assert_eq!(ChainIdSource::Fixed(10).chain_id().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_unconfigured_fails() {
        let err = ChainIdSource::Unconfigured.chain_id().await.unwrap_err();
        assert!(err.to_string().contains("no chain id"));
    }

    #[tokio::test]
    async fn test_rpc_unreachable_is_not_cached() {
        let source = ChainIdSource::rpc("http://127.0.0.1:9", Duration::from_secs(2));
        assert!(source.chain_id().await.is_err());
        let ChainIdSource::Rpc { cached, .. } = &source else {
            unreachable!();
        };
        assert!(cached.get().is_none());
    }

    #[tokio::test]
    async fn test_rpc_bad_url() {
        let source = ChainIdSource::rpc("not a url", Duration::from_secs(1));
        assert!(source.chain_id().await.is_err());
    }
}
