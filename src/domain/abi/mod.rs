//! ABI domain models and contracts
//!
//! This module defines the traits and types for ABI parsing, call decoding
//! and ABI resolution, independent of the underlying implementation
//! (alloy-dyn-abi, reqwest).

mod decoder;
mod param;
mod registry;
mod resolver;

pub use decoder::{CallDecoder, DecodedArg, DecodedCall};
pub use param::{array_suffix, Param, ParamKind, RawParam};
pub use registry::{compute_selector, ContractAbi, FunctionSignature};
pub use resolver::{AbiFetchError, AbiResolver};
