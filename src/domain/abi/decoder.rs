//! Call decoder trait and types

use alloy_dyn_abi::DynSolValue;

use super::{ContractAbi, FunctionSignature, Param};
use crate::error::Result;

/// A decoded function argument
#[derive(Debug, Clone)]
pub struct DecodedArg {
    /// Parameter name (or "arg{n}" if unnamed)
    pub name: String,
    /// Descriptor the value was decoded against
    pub param: Param,
    /// Decoded value
    pub value: DynSolValue,
}

/// Result of decoding a function call
#[derive(Debug, Clone)]
pub struct DecodedCall {
    /// Function name
    pub function_name: String,
    /// Full function signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// Decoded arguments in declaration order
    pub arguments: Vec<DecodedArg>,
}

/// Trait for call data decoding implementations
pub trait CallDecoder: Send + Sync {
    /// Decode calldata (including the 4-byte selector) against one function
    fn decode_calldata(&self, function: &FunctionSignature, data: &[u8]) -> Result<DecodedCall>;

    /// Decode calldata by looking its selector up in the contract ABI
    ///
    /// Fails with a decode error if no function in the ABI has that selector.
    fn decode_by_selector(&self, abi: &ContractAbi, data: &[u8]) -> Result<DecodedCall>;
}
