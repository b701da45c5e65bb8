//! Call decoder implementation using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue};

use crate::domain::abi::{
    CallDecoder, ContractAbi, DecodedArg, DecodedCall, FunctionSignature, Param, ParamKind,
};
use crate::error::{ConvertError, Result};

/// Call decoder implementation using alloy-dyn-abi
#[derive(Debug, Default, Clone, Copy)]
pub struct AlloyCallDecoder;

impl AlloyCallDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl CallDecoder for AlloyCallDecoder {
    fn decode_calldata(&self, function: &FunctionSignature, data: &[u8]) -> Result<DecodedCall> {
        let selector = selector_of(data)?;
        if selector != function.selector {
            return Err(ConvertError::Decode(format!(
                "selector mismatch: got 0x{}, expected 0x{}",
                hex::encode(selector),
                hex::encode(function.selector)
            )));
        }

        let args_data = &data[4..];

        let types = function
            .inputs
            .iter()
            .map(sol_type)
            .collect::<Result<Vec<_>>>()?;

        let decoded_values = if types.is_empty() {
            if !args_data.is_empty() {
                return Err(ConvertError::Decode(format!(
                    "function {} has no parameters but calldata has {} extra bytes",
                    function.signature,
                    args_data.len()
                )));
            }
            Vec::new()
        } else {
            let decoded = DynSolType::Tuple(types)
                .abi_decode_params(args_data)
                .map_err(|e| {
                    ConvertError::Decode(format!(
                        "calldata does not match {}: {e}",
                        function.signature
                    ))
                })?;

            match decoded {
                DynSolValue::Tuple(values) => values,
                other => vec![other],
            }
        };

        let arguments = function
            .inputs
            .iter()
            .zip(decoded_values)
            .enumerate()
            .map(|(idx, (param, value))| {
                let name = if param.name.trim().is_empty() {
                    format!("arg{idx}")
                } else {
                    param.name.clone()
                };

                DecodedArg {
                    name,
                    param: param.clone(),
                    value,
                }
            })
            .collect();

        Ok(DecodedCall {
            function_name: function.name.clone(),
            signature: function.signature.clone(),
            arguments,
        })
    }

    fn decode_by_selector(&self, abi: &ContractAbi, data: &[u8]) -> Result<DecodedCall> {
        let selector = selector_of(data)?;
        match abi.lookup(selector) {
            Some(function) => self.decode_calldata(function, data),
            None => Err(ConvertError::Decode(format!(
                "no function in the ABI matches selector 0x{}",
                hex::encode(selector)
            ))),
        }
    }
}

/// Decode a hex calldata string, with or without `0x` prefix
pub fn parse_calldata(calldata: &str) -> Result<Vec<u8>> {
    let trimmed = calldata.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(payload).map_err(|e| ConvertError::Decode(format!("invalid hex in calldata: {e}")))
}

fn selector_of(data: &[u8]) -> Result<[u8; 4]> {
    data.get(..4)
        .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
        .ok_or_else(|| {
            ConvertError::Decode(format!(
                "calldata too short: {} bytes (need at least 4 for selector)",
                data.len()
            ))
        })
}

/// Build the alloy type for a parsed descriptor
fn sol_type(param: &Param) -> Result<DynSolType> {
    match &param.kind {
        ParamKind::Elementary(ty) => DynSolType::parse(ty).map_err(|e| {
            ConvertError::MalformedInput(format!(
                "failed to parse type '{ty}' for param '{}': {e}",
                param.name
            ))
        }),
        ParamKind::Array {
            element,
            size: None,
        } => Ok(DynSolType::Array(Box::new(sol_type(element)?))),
        ParamKind::Array {
            element,
            size: Some(n),
        } => Ok(DynSolType::FixedArray(Box::new(sol_type(element)?), *n)),
        ParamKind::Structure(components) => components
            .iter()
            .map(sol_type)
            .collect::<Result<Vec<_>>>()
            .map(DynSolType::Tuple),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use serde_json::json;

    fn erc20() -> ContractAbi {
        ContractAbi::from_json(&json!([{
            "type": "function",
            "name": "transfer",
            "inputs": [
                { "name": "to", "type": "address" },
                { "name": "amount", "type": "uint256" }
            ]
        }, {
            "type": "function",
            "name": "totalSupply",
            "inputs": []
        }]))
        .unwrap()
    }

    #[test]
    fn test_decode_transfer() {
        // transfer(0x1234567890123456789012345678901234567890, 1000)
        let calldata = parse_calldata(
            "0xa9059cbb000000000000000000000000123456789012345678901234567890123456789000000000000000000000000000000000000000000000000000000000000003e8",
        )
        .unwrap();

        let result = AlloyCallDecoder::new().decode_by_selector(&erc20(), &calldata).unwrap();

        assert_eq!(result.function_name, "transfer");
        assert_eq!(result.signature, "transfer(address,uint256)");
        assert_eq!(result.arguments.len(), 2);
        assert_eq!(result.arguments[0].name, "to");
        assert_eq!(result.arguments[1].name, "amount");
        assert_eq!(result.arguments[1].value, DynSolValue::Uint(U256::from(1000), 256));
    }

    #[test]
    fn test_decode_dynamic_params() {
        let abi = ContractAbi::from_json(&json!([{
            "type": "function",
            "name": "store",
            "inputs": [{ "name": "blob", "type": "bytes" }]
        }]))
        .unwrap();
        let function = abi.functions().next().unwrap();

        let mut calldata = function.selector.to_vec();
        calldata.extend(
            hex::decode(concat!(
                "0000000000000000000000000000000000000000000000000000000000000020",
                "0000000000000000000000000000000000000000000000000000000000000003",
                "aabbcc0000000000000000000000000000000000000000000000000000000000"
            ))
            .unwrap(),
        );

        let result = AlloyCallDecoder::new().decode_calldata(function, &calldata).unwrap();
        assert_eq!(result.arguments[0].value, DynSolValue::Bytes(vec![0xaa, 0xbb, 0xcc]));
    }

    #[test]
    fn test_decode_no_params() {
        let calldata = parse_calldata("0x18160ddd").unwrap();
        let result = AlloyCallDecoder::new().decode_by_selector(&erc20(), &calldata).unwrap();
        assert_eq!(result.function_name, "totalSupply");
        assert!(result.arguments.is_empty());
    }

    #[test]
    fn test_unknown_selector() {
        let calldata = parse_calldata("0xdeadbeef").unwrap();
        let err = AlloyCallDecoder::new()
            .decode_by_selector(&erc20(), &calldata)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Decode(_)));
        assert!(err.to_string().contains("0xdeadbeef"));
    }

    #[test]
    fn test_truncated_calldata() {
        // transfer selector with half an argument
        let calldata = parse_calldata("0xa9059cbb0000000000000000").unwrap();
        assert!(matches!(
            AlloyCallDecoder::new().decode_by_selector(&erc20(), &calldata),
            Err(ConvertError::Decode(_))
        ));

        assert!(matches!(
            AlloyCallDecoder::new().decode_by_selector(&erc20(), &[0xa9, 0x05]),
            Err(ConvertError::Decode(_))
        ));
    }

    #[test]
    fn test_selector_mismatch() {
        let abi = erc20();
        let transfer = abi.lookup_hex("0xa9059cbb").unwrap();
        let err = AlloyCallDecoder::new()
            .decode_calldata(transfer, &[0xde, 0xad, 0xbe, 0xef])
            .unwrap_err();
        assert!(err.to_string().contains("selector mismatch"));
    }

    #[test]
    fn test_parse_calldata() {
        assert_eq!(parse_calldata("0xdead").unwrap(), vec![0xde, 0xad]);
        assert_eq!(parse_calldata("DEAD").unwrap(), vec![0xde, 0xad]);
        assert!(parse_calldata("0xzz").is_err());
    }
}
