//! Contract ABI - function signatures indexed by selector

use std::collections::HashMap;

use alloy_primitives::keccak256;
use serde::Deserialize;

use super::param::{Param, RawParam};
use crate::error::{ConvertError, Result};

/// A function signature with its parsed inputs
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    /// 4-byte function selector
    pub selector: [u8; 4],
    /// Function name
    pub name: String,
    /// Full signature string (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// Input parameters in declaration order
    pub inputs: Vec<Param>,
}

impl FunctionSignature {
    /// Build a signature from a name and parsed inputs, computing the selector
    pub fn new(name: impl Into<String>, inputs: Vec<Param>) -> Self {
        let name = name.into();
        let types: Vec<String> = inputs.iter().map(Param::canonical_type).collect();
        let signature = format!("{}({})", name, types.join(","));
        let selector = compute_selector(&signature);
        Self {
            selector,
            name,
            signature,
            inputs,
        }
    }
}

/// One entry of a JSON ABI; only functions are kept
#[derive(Debug, Deserialize)]
struct RawAbiItem {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<RawParam>,
}

/// Functions of one contract indexed by 4-byte selector
#[derive(Debug, Default, Clone)]
pub struct ContractAbi {
    functions: HashMap<[u8; 4], FunctionSignature>,
}

impl ContractAbi {
    /// Create a new empty ABI
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON ABI.
    ///
    /// Accepts a raw item array, an artifact object with an `abi` field, or a
    /// string holding either of those JSON-encoded (as block explorers return it).
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(encoded) => {
                let decoded: serde_json::Value = serde_json::from_str(encoded).map_err(|e| {
                    ConvertError::MalformedInput(format!("ABI string is not valid JSON: {e}"))
                })?;
                Self::from_json(&decoded)
            }
            serde_json::Value::Object(object) => match object.get("abi") {
                Some(abi) => Self::from_json(abi),
                None => Err(ConvertError::MalformedInput(
                    "ABI object has no \"abi\" field".to_string(),
                )),
            },
            serde_json::Value::Array(items) => {
                let mut abi = Self::new();
                for item in items {
                    let item = RawAbiItem::deserialize(item).map_err(|e| {
                        ConvertError::MalformedInput(format!("invalid ABI entry: {e}"))
                    })?;
                    // "type" may be omitted and then defaults to "function"
                    if item.kind.as_deref().unwrap_or("function") != "function" {
                        continue;
                    }
                    let Some(name) = item.name.filter(|n| !n.is_empty()) else {
                        return Err(ConvertError::MalformedInput(
                            "ABI function entry has no name".to_string(),
                        ));
                    };
                    let inputs = item
                        .inputs
                        .iter()
                        .map(Param::parse)
                        .collect::<Result<Vec<_>>>()?;
                    abi.insert(FunctionSignature::new(name, inputs));
                }
                Ok(abi)
            }
            other => Err(ConvertError::MalformedInput(format!(
                "ABI must be an array of entries, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Insert a function signature
    ///
    /// Note: First function for a given selector wins (no overwrite)
    pub fn insert(&mut self, function: FunctionSignature) {
        self.functions.entry(function.selector).or_insert(function);
    }

    /// Look up a function by selector
    pub fn lookup(&self, selector: [u8; 4]) -> Option<&FunctionSignature> {
        self.functions.get(&selector)
    }

    /// Look up a function by selector hex string (e.g., "0xa9059cbb")
    pub fn lookup_hex(&self, selector_hex: &str) -> Option<&FunctionSignature> {
        let normalized = selector_hex
            .strip_prefix("0x")
            .or_else(|| selector_hex.strip_prefix("0X"))
            .unwrap_or(selector_hex);

        if normalized.len() != 8 {
            return None;
        }

        let bytes = hex::decode(normalized).ok()?;
        let selector: [u8; 4] = bytes.try_into().ok()?;
        self.lookup(selector)
    }

    /// Get the number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the ABI has no functions
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Get all functions
    pub fn functions(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.functions.values()
    }
}

/// Compute the 4-byte function selector from a signature
pub fn compute_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
