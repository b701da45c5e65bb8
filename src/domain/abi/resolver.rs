//! ABI resolution contract

use async_trait::async_trait;
use thiserror::Error;

/// Why a contract ABI could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiFetchError {
    #[error("ABI not found: {0}")]
    NotFound(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
    #[error("resolver unreachable: {0}")]
    Unreachable(String),
    #[error("malformed resolver response: {0}")]
    Malformed(String),
}

/// Source of contract ABIs, keyed by chain and address
#[async_trait]
pub trait AbiResolver: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Fetch the JSON ABI of `address` on `chain_id`
    async fn fetch_abi(
        &self,
        chain_id: u64,
        address: &str,
    ) -> Result<serde_json::Value, AbiFetchError>;
}
