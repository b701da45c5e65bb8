//! Error taxonomy for one calldata-to-typed-data conversion

use thiserror::Error;

use crate::domain::abi::AbiFetchError;

/// Everything that can stop a conversion.
///
/// There is no partial result: a conversion either produces a complete
/// typed-data document or one of these.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A required request field is missing (client fault)
    #[error("missing required fields: {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    /// The ABI could not be obtained from the resolver
    #[error("failed to fetch ABI: {0}")]
    AbiFetch(#[from] AbiFetchError),

    /// Call data does not match any function in the ABI, or its layout is wrong
    #[error("decode error: {0}")]
    Decode(String),

    /// A structure value could not be matched to a registered type
    #[error("type resolution error: {0}")]
    TypeResolution(String),

    /// A parameter descriptor is unusable (e.g. lacks a type)
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Domain parameters could not be determined from request or network
    #[error("configuration error: {0}")]
    Config(String),
}

impl ConvertError {
    /// Whether the caller (rather than this service or its upstreams) is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
