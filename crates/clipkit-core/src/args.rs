//! Dynamically-typed parameter bag passed into operation handlers.
//!
//! Hosts describe a job with loosely-typed key/value parameters. Handlers
//! read them through typed accessors that fall back to a caller-supplied
//! default on absence or type mismatch, so parameter lookup never fails.

use std::collections::HashMap;

use bytes::Bytes;

/// A single dynamically-typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A raw secondary buffer (e.g. the second stitch input).
    Blob(Bytes),
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Bool(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Int(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        ArgValue::Int(v as i64)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        ArgValue::Float(v)
    }
}

impl From<f32> for ArgValue {
    fn from(v: f32) -> Self {
        ArgValue::Float(v as f64)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Str(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::Str(v)
    }
}

impl From<Bytes> for ArgValue {
    fn from(v: Bytes) -> Self {
        ArgValue::Blob(v)
    }
}

impl From<Vec<u8>> for ArgValue {
    fn from(v: Vec<u8>) -> Self {
        ArgValue::Blob(Bytes::from(v))
    }
}

/// Parameter container with typed-fallback accessors.
///
/// Keys are unique; inserting an existing key replaces its value. Once handed
/// to a handler the bag is only read (`&ArgBag`).
#[derive(Debug, Clone, Default)]
pub struct ArgBag {
    values: HashMap<String, ArgValue>,
}

impl ArgBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Whether a parameter is present under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of parameters in the bag.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Boolean parameter, or `fallback` on absence or type mismatch.
    pub fn bool_or(&self, key: &str, fallback: bool) -> bool {
        match self.values.get(key) {
            Some(ArgValue::Bool(v)) => *v,
            _ => fallback,
        }
    }

    /// Integer parameter, or `fallback` on absence or type mismatch.
    pub fn int_or(&self, key: &str, fallback: i64) -> i64 {
        match self.values.get(key) {
            Some(ArgValue::Int(v)) => *v,
            _ => fallback,
        }
    }

    /// Float parameter, or `fallback` on absence or type mismatch.
    ///
    /// Integers widen to floats, so hosts may pass either for numeric knobs.
    pub fn float_or(&self, key: &str, fallback: f64) -> f64 {
        match self.values.get(key) {
            Some(ArgValue::Float(v)) => *v,
            Some(ArgValue::Int(v)) => *v as f64,
            _ => fallback,
        }
    }

    /// String parameter, or `fallback` on absence or type mismatch.
    pub fn str_or(&self, key: &str, fallback: &str) -> String {
        self.str(key).unwrap_or(fallback).to_string()
    }

    /// String parameter, if present with the right type.
    pub fn str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(ArgValue::Str(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Raw buffer parameter, if present with the right type.
    pub fn blob(&self, key: &str) -> Option<&Bytes> {
        match self.values.get(key) {
            Some(ArgValue::Blob(v)) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_keys_resolve_to_fallback() {
        let bag = ArgBag::new();
        assert!(!bag.bool_or("slow", false));
        assert_eq!(bag.int_or("fps", 15), 15);
        assert_eq!(bag.float_or("speed", 2.0), 2.0);
        assert_eq!(bag.str_or("position", "top"), "top");
        assert!(bag.blob("buffer2").is_none());
    }

    #[test]
    fn present_keys_resolve_to_value() {
        let bag = ArgBag::new()
            .with("slow", true)
            .with("fps", 24i64)
            .with("speed", 3.5f64)
            .with("position", "bottom");
        assert!(bag.bool_or("slow", false));
        assert_eq!(bag.int_or("fps", 15), 24);
        assert_eq!(bag.float_or("speed", 2.0), 3.5);
        assert_eq!(bag.str_or("position", "top"), "bottom");
    }

    #[test]
    fn type_mismatch_resolves_to_fallback() {
        let bag = ArgBag::new().with("speed", "fast");
        assert_eq!(bag.float_or("speed", 2.0), 2.0);
        assert_eq!(bag.int_or("speed", 7), 7);
        assert!(!bag.bool_or("speed", false));
    }

    #[test]
    fn integers_widen_to_floats() {
        let bag = ArgBag::new().with("speed", 3i64);
        assert_eq!(bag.float_or("speed", 2.0), 3.0);
    }

    #[test]
    fn insert_replaces_existing_key() {
        let mut bag = ArgBag::new();
        bag.insert("fps", 10i64);
        bag.insert("fps", 20i64);
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.int_or("fps", 0), 20);
    }

    #[test]
    fn blob_round_trip() {
        let bag = ArgBag::new().with("buffer2", vec![1u8, 2, 3]);
        let blob = bag.blob("buffer2").unwrap();
        assert_eq!(blob.as_ref(), &[1, 2, 3]);
    }
}
