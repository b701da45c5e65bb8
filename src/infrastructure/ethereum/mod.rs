//! Ethereum network access via alloy providers

mod network;

pub use network::ChainIdSource;
