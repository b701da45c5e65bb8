//! Domain layer - implementation-independent models and contracts
//!
//! - `abi`: parameter descriptors, function lookup, call decoding and ABI resolution traits
//! - `eip712`: type mapping, struct naming, value formatting and document assembly

pub mod abi;
pub mod eip712;
