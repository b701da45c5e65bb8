//! Type registry: struct name → ordered field list

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One field of a registered struct type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl TypeField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Struct types registered during one conversion.
///
/// Field order inside an entry is the declaration order and feeds the
/// EIP-712 type encoding, so it is never reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    types: BTreeMap<String, Vec<TypeField>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the field list of `name`
    pub fn insert(&mut self, name: impl Into<String>, fields: Vec<TypeField>) {
        self.types.insert(name.into(), fields);
    }

    pub fn get(&self, name: &str) -> Option<&[TypeField]> {
        self.types.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TypeField])> {
        self.types
            .iter()
            .map(|(name, fields)| (name.as_str(), fields.as_slice()))
    }

    /// Find the struct whose field names are exactly `field_names`, in order.
    ///
    /// This is a name-sequence heuristic: two shapes with identical field
    /// names but different field types are indistinguishable here, and the
    /// lexicographically first match wins. Formatting uses the name carried
    /// by `MappedType`; this lookup only checks that the two agree.
    pub fn find_struct<S: AsRef<str>>(&self, field_names: &[S]) -> Option<&str> {
        self.types
            .iter()
            .find(|(_, fields)| {
                fields.len() == field_names.len()
                    && fields
                        .iter()
                        .zip(field_names)
                        .all(|(field, name)| field.name == name.as_ref())
            })
            .map(|(name, _)| name.as_str())
    }

    /// Struct names referenced by some field but never registered
    pub fn dangling_references(&self) -> Vec<String> {
        let mut missing: Vec<String> = self
            .types
            .values()
            .flatten()
            .map(|field| base_type(&field.ty))
            .filter(|base| !is_elementary(base) && !self.contains(base))
            .map(str::to_string)
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<TypeField>> {
        self.types
    }
}

/// Strip every trailing array suffix from a type string
pub fn base_type(ty: &str) -> &str {
    match ty.find('[') {
        Some(idx) => &ty[..idx],
        None => ty,
    }
}

/// Whether `ty` (without array suffix) is a Solidity elementary type
pub fn is_elementary(ty: &str) -> bool {
    match ty {
        "address" | "bool" | "string" | "bytes" | "function" | "uint" | "int" => true,
        _ => {
            sized(ty, "uint", 8, 256, 8)
                || sized(ty, "int", 8, 256, 8)
                || sized(ty, "bytes", 1, 32, 1)
        }
    }
}

fn sized(ty: &str, prefix: &str, min: usize, max: usize, step: usize) -> bool {
    ty.strip_prefix(prefix)
        .filter(|digits| !digits.starts_with('0'))
        .and_then(|digits| digits.parse::<usize>().ok())
        .is_some_and(|n| (min..=max).contains(&n) && n % step == 0)
}
