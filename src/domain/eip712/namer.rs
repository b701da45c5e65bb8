//! Collision-free struct naming

use std::collections::HashSet;

/// Candidate used when a structure carries no compiler label
pub const DEFAULT_STRUCT_NAME: &str = "Struct";

/// Names already handed out during one conversion
#[derive(Debug, Clone, Default)]
pub struct NameCache {
    names: HashSet<String>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `candidate`, or the first free `candidate_N` (N = 1, 2, …)
    pub fn reserve(&mut self, candidate: &str) -> String {
        let mut name = candidate.to_string();
        let mut counter = 1;
        while self.names.contains(&name) {
            name = format!("{candidate}_{counter}");
            counter += 1;
        }
        self.names.insert(name.clone());
        name
    }
}

/// Derive a candidate struct name from a compiler label.
///
/// `"struct Exchange.Order[]"` → `"Exchange_Order"`; no label → `"Struct"`.
pub fn candidate_name(label: Option<&str>) -> String {
    let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
        return DEFAULT_STRUCT_NAME.to_string();
    };

    let mut name = label.strip_prefix("struct ").unwrap_or(label).trim();
    while let Some(body) = name.strip_suffix(']') {
        match body.rfind('[') {
            Some(open) => name = &body[..open],
            None => break,
        }
    }

    let name: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();

    if name.is_empty() {
        DEFAULT_STRUCT_NAME.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_name() {
        assert_eq!(candidate_name(Some("struct MyStruct")), "MyStruct");
        assert_eq!(candidate_name(Some("struct MyStruct[]")), "MyStruct");
        assert_eq!(candidate_name(Some("struct Exchange.Order[2][]")), "Exchange_Order");
        assert_eq!(candidate_name(Some("Order")), "Order");
        assert_eq!(candidate_name(None), "Struct");
        assert_eq!(candidate_name(Some("  ")), "Struct");
    }

    #[test]
    fn test_reserve_appends_counter() {
        let mut cache = NameCache::new();
        assert_eq!(cache.reserve("Order"), "Order");
        assert_eq!(cache.reserve("Order"), "Order_1");
        assert_eq!(cache.reserve("Order"), "Order_2");
        assert_eq!(cache.reserve("Fee"), "Fee");
        assert_eq!(cache.reserve("Order_2"), "Order_2_1");
    }

    #[test]
    fn test_reserve_skips_taken_suffix() {
        let mut cache = NameCache::new();
        cache.reserve("Order_1");
        assert_eq!(cache.reserve("Order"), "Order");
        assert_eq!(cache.reserve("Order"), "Order_2");
    }
}
