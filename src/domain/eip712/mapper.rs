//! ABI parameter → EIP-712 type mapping

use super::document::DOMAIN_TYPE_NAME;
use super::namer::{candidate_name, NameCache};
use super::registry::{TypeField, TypeRegistry};
use crate::domain::abi::{array_suffix, Param, ParamKind};

/// The EIP-712 type assigned to a parameter, carrying struct names.
///
/// The formatter walks this tree alongside the decoded value, so a struct
/// value is always formatted with the name assigned when its shape was
/// mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedType {
    Elementary(String),
    Array {
        element: Box<MappedType>,
        size: Option<usize>,
    },
    Struct {
        name: String,
        fields: Vec<MappedType>,
    },
}

impl MappedType {
    /// The type string used in the registry, e.g. "Order[]"
    pub fn type_string(&self) -> String {
        match self {
            Self::Elementary(ty) => ty.clone(),
            Self::Array { element, size } => {
                format!("{}{}", element.type_string(), array_suffix(*size))
            }
            Self::Struct { name, .. } => name.clone(),
        }
    }
}

/// Request-scoped type registry and name cache.
///
/// Create one per conversion; it is consumed when the document is assembled.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    registry: TypeRegistry,
    names: NameCache,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with the primary and domain type names already reserved,
    /// so no struct can take them
    pub fn for_primary_type(primary_type: &str) -> Self {
        let mut builder = Self::new();
        builder.names.reserve(DOMAIN_TYPE_NAME);
        builder.names.reserve(primary_type);
        builder
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> TypeRegistry {
        self.registry
    }

    /// Map one parameter to its EIP-712 type, registering any structs it contains
    pub fn map_param(&mut self, param: &Param) -> MappedType {
        match &param.kind {
            ParamKind::Elementary(ty) => MappedType::Elementary(ty.clone()),
            ParamKind::Array { element, size } => MappedType::Array {
                element: Box::new(self.map_param(element)),
                size: *size,
            },
            ParamKind::Structure(components) => self.name_struct(param, components),
        }
    }

    /// Assign a fresh name to a structure and register its fields.
    ///
    /// The name is reserved before the components are mapped. Identical
    /// shapes met twice get two names (`Order`, `Order_1`).
    fn name_struct(&mut self, param: &Param, components: &[Param]) -> MappedType {
        let name = self.names.reserve(&candidate_name(param.label.as_deref()));

        let mut fields = Vec::with_capacity(components.len());
        let mut entries = Vec::with_capacity(components.len());
        for (idx, component) in components.iter().enumerate() {
            let mapped = self.map_param(component);
            entries.push(TypeField::new(field_name(component, idx), mapped.type_string()));
            fields.push(mapped);
        }
        self.registry.insert(name.clone(), entries);

        MappedType::Struct { name, fields }
    }
}

/// Name of a struct field; unnamed components become `field{idx}`
pub fn field_name(param: &Param, idx: usize) -> String {
    if param.name.trim().is_empty() {
        format!("field{idx}")
    } else {
        param.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::RawParam;

    fn raw(name: &str, ty: &str) -> RawParam {
        RawParam {
            name: name.to_string(),
            ty: Some(ty.to_string()),
            ..Default::default()
        }
    }

    fn raw_struct(name: &str, ty: &str, label: &str, components: Vec<RawParam>) -> RawParam {
        RawParam {
            name: name.to_string(),
            ty: Some(ty.to_string()),
            components,
            internal_type: Some(label.to_string()),
        }
    }

    fn map(builder: &mut SchemaBuilder, raw: &RawParam) -> MappedType {
        builder.map_param(&Param::parse(raw).unwrap())
    }

    #[test]
    fn test_elementary_types_pass_through() {
        let mut builder = SchemaBuilder::new();
        for ty in [
            "uint256", "uint8", "int24", "address", "bool", "bytes", "bytes32", "string",
            "uint256[]", "address[3]", "bytes32[][2]", "string[]",
        ] {
            assert_eq!(map(&mut builder, &raw("x", ty)).type_string(), ty);
        }
        assert!(builder.registry().is_empty());
    }

    #[test]
    fn test_struct_registered_under_label() {
        let mut builder = SchemaBuilder::new();
        let input = raw_struct(
            "s",
            "tuple",
            "struct MyStruct",
            vec![raw("id", "uint256"), raw("name", "string")],
        );

        assert_eq!(map(&mut builder, &input).type_string(), "MyStruct");
        assert_eq!(
            builder.registry().get("MyStruct").unwrap(),
            &[TypeField::new("id", "uint256"), TypeField::new("name", "string")]
        );
    }

    #[test]
    fn test_struct_array_maps_to_suffixed_name() {
        let mut builder = SchemaBuilder::new();
        let input = raw_struct(
            "items",
            "tuple[]",
            "struct MyStruct[]",
            vec![raw("id", "uint256"), raw("name", "string")],
        );

        assert_eq!(map(&mut builder, &input).type_string(), "MyStruct[]");
        assert!(!builder.registry().contains("MyStruct[]"));
        assert_eq!(
            builder.registry().get("MyStruct").unwrap(),
            &[TypeField::new("id", "uint256"), TypeField::new("name", "string")]
        );
    }

    #[test]
    fn test_same_label_different_shapes_get_distinct_names() {
        let mut builder = SchemaBuilder::new();
        let first = raw_struct("a", "tuple", "struct Order", vec![raw("id", "uint256")]);
        let second = raw_struct(
            "b",
            "tuple",
            "struct Order",
            vec![raw("maker", "address"), raw("salt", "bytes32")],
        );

        assert_eq!(map(&mut builder, &first).type_string(), "Order");
        assert_eq!(map(&mut builder, &second).type_string(), "Order_1");
        assert_eq!(
            builder.registry().get("Order").unwrap(),
            &[TypeField::new("id", "uint256")]
        );
        assert_eq!(
            builder.registry().get("Order_1").unwrap(),
            &[TypeField::new("maker", "address"), TypeField::new("salt", "bytes32")]
        );
    }

    #[test]
    fn test_identical_shape_twice_is_not_deduplicated() {
        let mut builder = SchemaBuilder::new();
        let input = raw_struct("a", "tuple", "struct MyStruct", vec![raw("id", "uint256")]);

        assert_eq!(map(&mut builder, &input).type_string(), "MyStruct");
        assert_eq!(map(&mut builder, &input).type_string(), "MyStruct_1");
        assert_eq!(builder.registry().len(), 2);
    }

    #[test]
    fn test_nested_structs_and_namespaces() {
        let mut builder = SchemaBuilder::new();
        let fee = raw_struct(
            "fees",
            "tuple[2]",
            "struct Exchange.Fee[2]",
            vec![raw("recipient", "address"), raw("bps", "uint16")],
        );
        let order = raw_struct(
            "order",
            "tuple",
            "struct Exchange.Order",
            vec![raw("id", "uint256"), fee],
        );

        let mapped = map(&mut builder, &order);
        assert_eq!(mapped.type_string(), "Exchange_Order");
        assert_eq!(
            builder.registry().get("Exchange_Order").unwrap(),
            &[TypeField::new("id", "uint256"), TypeField::new("fees", "Exchange_Fee[2]")]
        );
        assert!(builder.registry().contains("Exchange_Fee"));
        assert!(builder.registry().dangling_references().is_empty());
    }

    #[test]
    fn test_unlabeled_and_unnamed() {
        let mut builder = SchemaBuilder::new();
        let input = RawParam {
            name: String::new(),
            ty: Some("tuple".to_string()),
            components: vec![raw("", "uint256"), raw("flag", "bool")],
            internal_type: None,
        };

        assert_eq!(map(&mut builder, &input).type_string(), "Struct");
        assert_eq!(
            builder.registry().get("Struct").unwrap(),
            &[TypeField::new("field0", "uint256"), TypeField::new("flag", "bool")]
        );
    }

    #[test]
    fn test_primary_type_is_reserved() {
        let mut builder = SchemaBuilder::for_primary_type("Order");
        let input = raw_struct("o", "tuple", "struct Order", vec![raw("id", "uint256")]);

        assert_eq!(map(&mut builder, &input).type_string(), "Order_1");
        assert!(!builder.registry().contains("Order"));
    }

    #[test]
    fn test_field_name_match_recovers_assigned_name() {
        let mut builder = SchemaBuilder::new();
        let input = raw_struct(
            "order",
            "tuple",
            "struct Order",
            vec![raw("id", "uint256"), raw("buyer", "address")],
        );
        let param = Param::parse(&input).unwrap();

        let MappedType::Struct { name, .. } = builder.map_param(&param) else {
            panic!("expected struct");
        };
        let ParamKind::Structure(components) = &param.kind else {
            panic!("expected structure");
        };
        let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(builder.registry().find_struct(&names), Some(name.as_str()));
    }
}
