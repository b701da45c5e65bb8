//! Application coordinator: one call verification, request to typed data

use std::str::FromStr;
use std::sync::Arc;

use alloy_primitives::Address;
use anyhow::Result as AnyResult;
use serde::Deserialize;
use tracing::Instrument;

use crate::config::{Config, DomainConfig, ResolverKind};
use crate::domain::abi::{AbiResolver, CallDecoder, ContractAbi};
use crate::domain::eip712::{build_typed_data, Eip712Domain, TypedDataDocument};
use crate::error::{ConvertError, Result};
use crate::infrastructure::abi::{
    parse_calldata, AlloyCallDecoder, EtherscanResolver, SourcifyResolver,
};
use crate::infrastructure::ethereum::ChainIdSource;

/// A pending call to be turned into typed data
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Contract being called
    pub contract_address: Option<String>,
    /// Hex-encoded calldata, selector included
    pub transaction_data: Option<String>,
    /// Sender
    pub from: Option<String>,
    /// Destination
    pub to: Option<String>,
    /// Native value sent along (string or number)
    pub value: Option<serde_json::Value>,
    /// Pre-supplied ABI; fetched from the resolver when absent
    pub abi: Option<serde_json::Value>,
    /// Overrides the active network's chain id
    pub chain_id: Option<u64>,
    /// Overrides the configured domain name
    pub app_name: Option<String>,
    /// Overrides the configured domain version
    pub app_version: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Shared, immutable service state. All per-conversion state is created
/// inside [`App::verify_transaction`].
pub struct App {
    resolver: Arc<dyn AbiResolver>,
    decoder: AlloyCallDecoder,
    network: ChainIdSource,
    domain: DomainConfig,
}

impl App {
    pub fn new(resolver: Arc<dyn AbiResolver>, network: ChainIdSource, domain: DomainConfig) -> Self {
        Self {
            resolver,
            decoder: AlloyCallDecoder::new(),
            network,
            domain,
        }
    }

    /// Wire the resolver backend and chain id source described by `config`
    pub fn from_config(config: &Config) -> AnyResult<Self> {
        let resolver_config = &config.resolver;
        let resolver: Arc<dyn AbiResolver> = match resolver_config.kind {
            ResolverKind::Etherscan => Arc::new(EtherscanResolver::new(
                resolver_config.base_url(),
                resolver_config.api_key(),
                resolver_config.timeout(),
            )?),
            ResolverKind::Sourcify => Arc::new(SourcifyResolver::new(
                resolver_config.base_url(),
                resolver_config.timeout(),
            )?),
        };

        let network = match (&config.network.chain_id, &config.network.rpc_url) {
            (Some(chain_id), _) => ChainIdSource::Fixed(*chain_id),
            (None, Some(url)) => ChainIdSource::rpc(url.clone(), resolver_config.timeout()),
            (None, None) => ChainIdSource::Unconfigured,
        };

        tracing::info!(resolver = resolver.name(), ?network, "app configured");
        Ok(Self::new(resolver, network, config.domain.clone()))
    }

    /// Turn a pending call into a complete typed-data document
    pub async fn verify_transaction(&self, request: VerifyRequest) -> Result<TypedDataDocument> {
        let span = tracing::info_span!(
            "verify_transaction",
            contract = present(&request.contract_address).unwrap_or_default(),
            from = present(&request.from).unwrap_or_default(),
            to = present(&request.to).unwrap_or_default(),
        );
        self.convert(request).instrument(span).await
    }

    async fn convert(&self, request: VerifyRequest) -> Result<TypedDataDocument> {
        let mut missing = Vec::new();
        if present(&request.contract_address).is_none() {
            missing.push("contractAddress");
        }
        if present(&request.transaction_data).is_none() {
            missing.push("transactionData");
        }
        let (Some(contract), Some(calldata)) = (
            present(&request.contract_address),
            present(&request.transaction_data),
        ) else {
            return Err(ConvertError::Validation(missing));
        };

        let contract = Address::from_str(contract).map_err(|e| {
            ConvertError::MalformedInput(format!("contract address {contract} is invalid: {e}"))
        })?;

        let chain_id = match request.chain_id {
            Some(chain_id) => chain_id,
            None => self
                .network
                .chain_id()
                .await
                .map_err(|e| ConvertError::Config(format!("{e:#}")))?,
        };

        let abi = match request.abi.as_ref().filter(|abi| !abi.is_null()) {
            Some(abi) => ContractAbi::from_json(abi)?,
            None => {
                tracing::info!(resolver = self.resolver.name(), chain_id, "stage=abi.fetch");
                let raw = self
                    .resolver
                    .fetch_abi(chain_id, &contract.to_string())
                    .await?;
                ContractAbi::from_json(&raw)?
            }
        };

        let data = parse_calldata(calldata)?;
        let call = self.decoder.decode_by_selector(&abi, &data)?;
        tracing::info!(signature = %call.signature, "stage=decode.ok");

        let domain = Eip712Domain {
            name: present(&request.app_name)
                .map(str::to_string)
                .unwrap_or_else(|| self.domain.name.clone()),
            version: present(&request.app_version)
                .map(str::to_string)
                .unwrap_or_else(|| self.domain.version.clone()),
            chain_id,
            verifying_contract: contract.to_checksum(None),
        };

        let document = build_typed_data(&call, domain)?;
        tracing::info!(
            primary_type = %document.primary_type,
            types = document.types.len(),
            "stage=assemble.ok"
        );
        Ok(document)
    }
}
