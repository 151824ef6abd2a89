use serde_json::Value;
use serde_json::map::Entry;

use crate::decode::Mapping;

/// Merge `overlay` into `base` key by key.
///
/// Where both hold a mapping under the same key the two are merged
/// recursively; any other overlay value replaces what `base` had.
pub fn merge_into(base: &mut Mapping, overlay: Mapping) {
    for (key, incoming) in overlay {
        match base.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(incoming);
            }
            Entry::Occupied(mut slot) => match (slot.get_mut(), incoming) {
                (Value::Object(existing), Value::Object(nested)) => merge_into(existing, nested),
                (existing, incoming) => *existing = incoming,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: Value) -> Mapping {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn merged(base: Value, overlay: Value) -> Mapping {
        let mut base = mapping(base);
        merge_into(&mut base, mapping(overlay));
        base
    }

    #[test]
    fn disjoint_keys_merge() {
        let m = merged(json!({"host": "localhost"}), json!({"port": 3000}));
        assert_eq!(Value::Object(m), json!({"host": "localhost", "port": 3000}));
    }

    #[test]
    fn same_scalar_key_overlay_wins() {
        let m = merged(json!({"port": 8080}), json!({"port": 3000}));
        assert_eq!(m["port"], json!(3000));
    }

    #[test]
    fn nested_mappings_recurse() {
        let m = merged(
            json!({"database": {"url": "postgres://old", "pool_size": 5}}),
            json!({"database": {"pool_size": 20}}),
        );
        assert_eq!(m["database"], json!({"url": "postgres://old", "pool_size": 20}));
    }

    #[test]
    fn overlay_scalar_replaces_mapping() {
        let m = merged(json!({"database": {"url": "x"}}), json!({"database": "flat_string"}));
        assert_eq!(m["database"], json!("flat_string"));
    }

    #[test]
    fn overlay_mapping_replaces_scalar() {
        let m = merged(json!({"database": "flat_string"}), json!({"database": {"url": "x"}}));
        assert_eq!(m["database"], json!({"url": "x"}));
    }

    #[test]
    fn null_overlay_replaces_value() {
        let m = merged(json!({"url": "x"}), json!({"url": null}));
        assert_eq!(m["url"], Value::Null);
    }

    #[test]
    fn empty_overlay_keeps_base() {
        assert_eq!(merged(json!({"port": 8080}), json!({})), mapping(json!({"port": 8080})));
    }

    #[test]
    fn three_levels_keep_untouched_siblings() {
        let m = merged(
            json!({"a": {"b": {"c": {"val": 1, "other": "keep"}}}}),
            json!({"a": {"b": {"c": {"val": 99}}}}),
        );
        assert_eq!(m["a"]["b"]["c"], json!({"val": 99, "other": "keep"}));
    }
}
