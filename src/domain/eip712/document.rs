//! EIP-712 typed-data document assembly

use std::collections::BTreeMap;

use alloy_dyn_abi::TypedData;
use alloy_primitives::B256;
use anyhow::{anyhow, Result as AnyResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::registry::{TypeField, TypeRegistry};
use crate::error::{ConvertError, Result};

/// Name of the fixed domain type
pub const DOMAIN_TYPE_NAME: &str = "EIP712Domain";

/// Domain separator fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: String,
}

/// Field list of `EIP712Domain`, matching the fields of [`Eip712Domain`]
pub fn domain_type() -> Vec<TypeField> {
    vec![
        TypeField::new("name", "string"),
        TypeField::new("version", "string"),
        TypeField::new("chainId", "uint256"),
        TypeField::new("verifyingContract", "address"),
    ]
}

/// A complete typed-data document, ready to be shown and signed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDocument {
    pub types: BTreeMap<String, Vec<TypeField>>,
    pub domain: Eip712Domain,
    pub primary_type: String,
    pub message: Map<String, Value>,
}

impl TypedDataDocument {
    /// Merge the domain type, the registry and the primary type into one document.
    ///
    /// Fails if the registry already defines the primary or domain type, or if
    /// any field references a struct that was never registered.
    pub fn assemble(
        domain: Eip712Domain,
        registry: TypeRegistry,
        primary_type: &str,
        primary_fields: Vec<TypeField>,
        message: Map<String, Value>,
    ) -> Result<Self> {
        for reserved in [primary_type, DOMAIN_TYPE_NAME] {
            if registry.contains(reserved) {
                return Err(ConvertError::TypeResolution(format!(
                    "struct name {reserved} collides with a reserved type"
                )));
            }
        }

        let mut registry = registry;
        registry.insert(primary_type, primary_fields);
        registry.insert(DOMAIN_TYPE_NAME, domain_type());

        let dangling = registry.dangling_references();
        if !dangling.is_empty() {
            return Err(ConvertError::TypeResolution(format!(
                "unregistered types referenced: {}",
                dangling.join(", ")
            )));
        }

        Ok(Self {
            types: registry.into_inner(),
            domain,
            primary_type: primary_type.to_string(),
            message,
        })
    }

    /// Compact JSON, as handed to the signing device
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// EIP-712 digest of this document (what a device would sign)
    pub fn signing_hash(&self) -> AnyResult<B256> {
        let value = serde_json::to_value(self)?;
        let typed: TypedData = serde_json::from_value(value)
            .map_err(|e| anyhow!("document is not valid EIP-712 typed data: {e}"))?;
        typed
            .eip712_signing_hash()
            .map_err(|e| anyhow!("failed computing EIP-712 digest: {e}"))
    }
}
