//! Decoded values → JSON message values

use alloy_dyn_abi::DynSolValue;
use serde_json::{Map, Value};

use super::mapper::MappedType;
use super::registry::TypeRegistry;
use crate::error::{ConvertError, Result};

/// Format a decoded value against its mapped type.
///
/// Integers of every width become exact decimal strings here, so nothing
/// downstream ever serializes a big integer.
pub fn format_value(value: &DynSolValue, ty: &MappedType, registry: &TypeRegistry) -> Result<Value> {
    match ty {
        MappedType::Elementary(name) => format_elementary(value, name),
        MappedType::Array { element, size } => {
            let items = match value {
                DynSolValue::Array(items) | DynSolValue::FixedArray(items) => items,
                other => return Err(mismatch(other, &ty.type_string())),
            };
            if let Some(expected) = size {
                if items.len() != *expected {
                    return Err(ConvertError::TypeResolution(format!(
                        "{} expects {expected} elements, got {}",
                        ty.type_string(),
                        items.len()
                    )));
                }
            }
            items
                .iter()
                .map(|item| format_value(item, element, registry))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
        MappedType::Struct { name, fields } => format_struct(value, name, fields, registry),
    }
}

fn format_struct(
    value: &DynSolValue,
    name: &str,
    fields: &[MappedType],
    registry: &TypeRegistry,
) -> Result<Value> {
    let definition = registry.get(name).ok_or_else(|| {
        ConvertError::TypeResolution(format!("struct {name} is not in the type registry"))
    })?;
    if definition.len() != fields.len() {
        return Err(ConvertError::TypeResolution(format!(
            "struct {name} is registered with {} fields but was mapped with {}",
            definition.len(),
            fields.len()
        )));
    }

    let (prop_names, values): (&[String], &[DynSolValue]) = match value {
        DynSolValue::Tuple(values) => (&[] as &[String], values.as_slice()),
        DynSolValue::CustomStruct {
            prop_names, tuple, ..
        } => (prop_names.as_slice(), tuple.as_slice()),
        other => return Err(mismatch(other, name)),
    };

    let mut out = Map::with_capacity(definition.len());
    for (idx, (field, field_ty)) in definition.iter().zip(fields).enumerate() {
        // by field name when the value carries names, otherwise by position
        let field_value = prop_names
            .iter()
            .position(|prop| *prop == field.name)
            .and_then(|pos| values.get(pos))
            .or_else(|| values.get(idx))
            .ok_or_else(|| {
                ConvertError::TypeResolution(format!(
                    "value for struct {name} has no field {}",
                    field.name
                ))
            })?;
        out.insert(field.name.clone(), format_value(field_value, field_ty, registry)?);
    }
    Ok(Value::Object(out))
}

fn format_elementary(value: &DynSolValue, ty: &str) -> Result<Value> {
    let formatted = match value {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Int(i, _) => Value::String(i.to_string()),
        DynSolValue::Uint(u, _) => Value::String(u.to_string()),
        DynSolValue::Address(addr) => Value::String(addr.to_checksum(None)),
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            Value::String(format!("0x{}", hex::encode(bytes)))
        }
        DynSolValue::Function(func) => Value::String(format!("0x{}", hex::encode(func.as_slice()))),
        DynSolValue::Bytes(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
        DynSolValue::String(s) => Value::String(s.clone()),
        other => return Err(mismatch(other, ty)),
    };
    Ok(formatted)
}

fn mismatch(value: &DynSolValue, ty: &str) -> ConvertError {
    let kind = match value {
        DynSolValue::Array(_) | DynSolValue::FixedArray(_) => "array",
        DynSolValue::Tuple(_) | DynSolValue::CustomStruct { .. } => "tuple",
        _ => "scalar",
    };
    ConvertError::TypeResolution(format!("{kind} value cannot be formatted as {ty}"))
}
