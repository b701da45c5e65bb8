//! EIP-712 schema derivation from decoded calls
//!
//! A conversion maps every argument descriptor to an EIP-712 type
//! (registering nested structs under collision-free names), formats the
//! decoded values against those types, and assembles the final document.
//! All scratch state lives in one [`SchemaBuilder`] per conversion.

mod document;
mod formatter;
mod mapper;
mod namer;
mod registry;

pub use document::{domain_type, Eip712Domain, TypedDataDocument, DOMAIN_TYPE_NAME};
pub use formatter::format_value;
pub use mapper::{field_name, MappedType, SchemaBuilder};
pub use namer::{candidate_name, NameCache, DEFAULT_STRUCT_NAME};
pub use registry::{base_type, is_elementary, TypeField, TypeRegistry};

use serde_json::Map;

use crate::domain::abi::DecodedCall;
use crate::error::Result;

/// Convert a decoded call into a typed-data document
pub fn build_typed_data(call: &DecodedCall, domain: Eip712Domain) -> Result<TypedDataDocument> {
    let mut builder = SchemaBuilder::for_primary_type(&call.function_name);

    let mapped: Vec<MappedType> = call
        .arguments
        .iter()
        .map(|arg| builder.map_param(&arg.param))
        .collect();
    let primary_fields: Vec<TypeField> = call
        .arguments
        .iter()
        .zip(&mapped)
        .map(|(arg, ty)| TypeField::new(arg.name.clone(), ty.type_string()))
        .collect();

    let registry = builder.into_registry();

    let mut message = Map::with_capacity(call.arguments.len());
    for (arg, ty) in call.arguments.iter().zip(&mapped) {
        message.insert(arg.name.clone(), format_value(&arg.value, ty, &registry)?);
    }

    TypedDataDocument::assemble(domain, registry, &call.function_name, primary_fields, message)
}
