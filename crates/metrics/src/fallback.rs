//! Ordered fallback chains over untyped JSON.
//!
//! A chain is a list of field paths tried left to right; the first path
//! that resolves to a present, non-null value of the wanted shape wins.
//! A value of the wrong shape counts as absent and the chain moves on.

use serde_json::Value;

/// Dotted path into a JSON object, one segment per key.
pub type FieldPath = &'static [&'static str];

/// Resolve `path` under `value`. `null` counts as absent.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |node, key| node.get(*key))
        .filter(|v| !v.is_null())
}

/// Read a number, accepting numeric strings.
pub fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Read a non-empty string.
pub fn text(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

pub fn number_at(value: &Value, path: &[&str]) -> Option<f64> {
    lookup(value, path).and_then(number)
}

pub fn text_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path).and_then(text)
}

/// First path in `chain` holding a number.
pub fn first_number(value: &Value, chain: &[FieldPath]) -> Option<f64> {
    chain.iter().find_map(|path| number_at(value, path))
}

/// First path in `chain` holding a non-empty string.
pub fn first_text<'a>(value: &'a Value, chain: &[FieldPath]) -> Option<&'a str> {
    chain.iter().find_map(|path| text_at(value, path))
}

/// First path in `chain` holding a JSON object.
pub fn first_object<'a>(value: &'a Value, chain: &[FieldPath]) -> Option<&'a Value> {
    chain
        .iter()
        .find_map(|path| lookup(value, path).filter(|v| v.is_object()))
}

/// First path in `chain` holding a JSON array.
pub fn first_array<'a>(value: &'a Value, chain: &[FieldPath]) -> Option<&'a Vec<Value>> {
    chain
        .iter()
        .find_map(|path| lookup(value, path).and_then(Value::as_array))
}

/// `true` if any path in `chain` resolves to a present value.
pub fn any_present(value: &Value, chain: &[FieldPath]) -> bool {
    chain.iter().any(|path| lookup(value, path).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CHAIN: &[FieldPath] = &[&["a"], &["b"], &["c", "d"]];

    #[test]
    fn first_present_wins() {
        let v = json!({ "a": 10, "b": 20 });
        assert_eq!(first_number(&v, CHAIN), Some(10.0));
    }

    #[test]
    fn null_and_wrong_shape_fall_through() {
        let v = json!({ "a": null, "b": { "x": 1 }, "c": { "d": "7.5" } });
        assert_eq!(first_number(&v, CHAIN), Some(7.5));
    }

    #[test]
    fn exhausted_chain_is_none() {
        assert_eq!(first_number(&json!({ "z": 1 }), CHAIN), None);
        assert_eq!(first_number(&json!(42), CHAIN), None);
    }

    #[test]
    fn objects_and_arrays_by_shape() {
        let v = json!({ "a": 3, "b": { "k": true }, "c": { "d": [1, 2] } });
        assert_eq!(first_object(&v, CHAIN), Some(&json!({ "k": true })));
        assert_eq!(first_array(&v, CHAIN).map(Vec::len), Some(2));
    }

    #[test]
    fn blank_strings_are_absent() {
        let v = json!({ "a": "  ", "b": "name" });
        assert_eq!(first_text(&v, CHAIN), Some("name"));
        assert_eq!(number(&json!("abc")), None);
    }

    #[test]
    fn presence_check() {
        assert!(any_present(&json!({ "c": { "d": false } }), CHAIN));
        assert!(!any_present(&json!({ "a": null }), CHAIN));
    }
}
