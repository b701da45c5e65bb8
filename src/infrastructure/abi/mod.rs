//! ABI infrastructure - alloy-based decoding and remote ABI resolution

mod decoder;
mod resolver;

pub use decoder::{parse_calldata, AlloyCallDecoder};
pub use resolver::{EtherscanResolver, SourcifyResolver, DEFAULT_ETHERSCAN_URL, DEFAULT_SOURCIFY_URL};
