//! Safe accessors over dynamic JSON.
//!
//! Order documents are loosely schematised, so every field read goes through
//! these helpers: a missing key or a value of the wrong kind yields `None`
//! instead of an error.

use serde_json::{Map, Value};

/// Sequence numbers are small integers; integral floats (`5.0`) are accepted.
pub type SequenceNumber = i64;

/// Read-only conveniences on [`serde_json::Value`].
pub trait ValueExt {
    /// The object's entries, or `None` for any other kind.
    fn object(&self) -> Option<&Map<String, Value>>;

    /// The value under `key` when `self` is an object.
    fn field(&self, key: &str) -> Option<&Value>;

    /// `key` as a sequence number (integer or integral float).
    fn seq_field(&self, key: &str) -> Option<SequenceNumber>;

    /// `key` as a non-empty string.
    fn str_field(&self, key: &str) -> Option<&str>;

    /// `key` as an array.
    fn array_field(&self, key: &str) -> Option<&Vec<Value>>;

    /// `key` as an object value.
    fn object_field(&self, key: &str) -> Option<&Value>;

    /// First of `keys` that reads as a displayable scalar.
    fn first_text(&self, keys: &[&str]) -> Option<String>;
}

impl ValueExt for Value {
    fn object(&self) -> Option<&Map<String, Value>> {
        self.as_object()
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(key))
    }

    fn seq_field(&self, key: &str) -> Option<SequenceNumber> {
        self.field(key).and_then(as_sequence)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn array_field(&self, key: &str) -> Option<&Vec<Value>> {
        self.field(key).and_then(Value::as_array)
    }

    fn object_field(&self, key: &str) -> Option<&Value> {
        self.field(key).filter(|v| v.is_object())
    }

    fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.field(k).and_then(scalar_text))
    }
}

/// Interpret a JSON number as a sequence number.
pub fn as_sequence(v: &Value) -> Option<SequenceNumber> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    let f = v.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Render a scalar for use in a label. Objects, arrays, null and empty
/// strings yield `None`.
pub fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seq_field_accepts_integers_and_integral_floats() {
        let v = json!({ "a": 5, "b": 5.0, "c": 5.5, "d": "5", "e": null });
        assert_eq!(v.seq_field("a"), Some(5));
        assert_eq!(v.seq_field("b"), Some(5));
        assert_eq!(v.seq_field("c"), None);
        assert_eq!(v.seq_field("d"), None);
        assert_eq!(v.seq_field("e"), None);
        assert_eq!(v.seq_field("missing"), None);
    }

    #[test]
    fn accessors_on_non_objects_are_none() {
        let v = json!([1, 2, 3]);
        assert!(v.field("a").is_none());
        assert!(v.array_field("a").is_none());
        assert!(v.object().is_none());
    }

    #[test]
    fn str_field_skips_empty() {
        let v = json!({ "name": "", "code": "X1" });
        assert_eq!(v.str_field("name"), None);
        assert_eq!(v.first_text(&["name", "code"]), Some("X1".into()));
    }
}
