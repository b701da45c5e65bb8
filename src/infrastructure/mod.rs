//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - ABI decoding using alloy-dyn-abi
//! - Etherscan and Sourcify ABI resolvers over reqwest
//! - Chain id discovery through an alloy HTTP provider

pub mod abi;
pub mod ethereum;
