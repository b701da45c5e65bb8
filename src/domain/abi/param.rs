//! Parameter descriptors parsed from JSON ABI

use serde::Deserialize;

use crate::error::{ConvertError, Result};

/// A parameter exactly as it appears in a JSON ABI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
    #[serde(default)]
    pub components: Vec<RawParam>,
    #[serde(rename = "internalType", default)]
    pub internal_type: Option<String>,
}

/// Shape of a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// uintN, intN, address, bool, bytesN, bytes, string, function
    Elementary(String),
    /// One array level; `size` is `None` for dynamic arrays
    Array {
        element: Box<Param>,
        size: Option<usize>,
    },
    /// A tuple with ordered, named components
    Structure(Vec<Param>),
}

/// A parsed parameter descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name (may be empty)
    pub name: String,
    pub kind: ParamKind,
    /// Compiler-provided type label, e.g. "struct Exchange.Order[]"
    pub label: Option<String>,
}

impl Param {
    /// Parse a raw descriptor, peeling array suffixes into nested `Array` levels
    pub fn parse(raw: &RawParam) -> Result<Self> {
        let ty = raw.ty.as_deref().map(str::trim).unwrap_or_default();
        if ty.is_empty() {
            let who = if raw.name.is_empty() {
                "<unnamed>"
            } else {
                raw.name.as_str()
            };
            return Err(ConvertError::MalformedInput(format!(
                "parameter {who} has no type"
            )));
        }
        Self::parse_type(raw, ty)
    }

    fn parse_type(raw: &RawParam, ty: &str) -> Result<Self> {
        let kind = if let Some((base, size)) = split_array_suffix(ty)? {
            ParamKind::Array {
                element: Box::new(Self::parse_type(raw, base)?),
                size,
            }
        } else if ty == "tuple" {
            let components = raw
                .components
                .iter()
                .map(Self::parse)
                .collect::<Result<Vec<_>>>()?;
            ParamKind::Structure(components)
        } else if ty.starts_with("tuple") {
            return Err(ConvertError::MalformedInput(format!(
                "unsupported tuple type '{ty}' for parameter '{}'",
                raw.name
            )));
        } else {
            ParamKind::Elementary(ty.to_string())
        };

        Ok(Self {
            name: raw.name.clone(),
            kind,
            label: raw
                .internal_type
                .as_ref()
                .map(|label| label.trim().to_string())
                .filter(|label| !label.is_empty()),
        })
    }

    /// Canonical type used in function signatures, e.g. "(uint256,address)[]"
    pub fn canonical_type(&self) -> String {
        match &self.kind {
            ParamKind::Elementary(ty) => ty.clone(),
            ParamKind::Array { element, size } => {
                format!("{}{}", element.canonical_type(), array_suffix(*size))
            }
            ParamKind::Structure(components) => {
                let inner: Vec<String> = components.iter().map(Param::canonical_type).collect();
                format!("({})", inner.join(","))
            }
        }
    }
}

/// Render an array suffix: `[]` or `[N]`
pub fn array_suffix(size: Option<usize>) -> String {
    match size {
        Some(n) => format!("[{n}]"),
        None => "[]".to_string(),
    }
}

/// Split the outermost array suffix off a type string.
///
/// `"uint8[2][]"` → `("uint8[2]", None)`; `"address"` → no suffix.
fn split_array_suffix(ty: &str) -> Result<Option<(&str, Option<usize>)>> {
    let Some(body) = ty.strip_suffix(']') else {
        return Ok(None);
    };
    let Some(open) = body.rfind('[') else {
        return Err(ConvertError::MalformedInput(format!(
            "unbalanced array suffix in type '{ty}'"
        )));
    };

    let base = &body[..open];
    let len = &body[open + 1..];
    if base.is_empty() {
        return Err(ConvertError::MalformedInput(format!(
            "array type '{ty}' has no element type"
        )));
    }
    let size = if len.is_empty() {
        None
    } else {
        Some(len.parse::<usize>().map_err(|_| {
            ConvertError::MalformedInput(format!("invalid array length in type '{ty}'"))
        })?)
    };

    Ok(Some((base, size)))
}
