//! Statically evaluated PHP values.
//!
//! - [`Value`] is the result of evaluating a constant, default value or static variable initializer.
//! - [`literal`] is the bounded interpreter for literal expressions.
//! - [`definition`] classifies raw value text and memoizes its evaluation.

pub mod definition;
pub mod literal;

pub use definition::{ValueDefinition, ValueExpr};

/// A PHP value that can be written as a constant expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Ordered key/value pairs; keys are unique.
    Array(Vec<(ArrayKey, Value)>),
}

/// A normalized array key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Int(i64),
    String(String),
}

impl Value {
    /// PHP's name for the type of this value (`gettype()` spelling).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "double",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[(ArrayKey, Value)]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up an array element by key.
    pub fn get(&self, key: &ArrayKey) -> Option<&Value> {
        self.as_array()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl ArrayKey {
    /// Normalize a value used as an array key the way PHP does.
    ///
    /// Decimal integer strings become integer keys, booleans become `0`/`1`, `null` becomes `""` and floats are
    /// truncated. Arrays cannot be keys.
    pub fn from_value(value: &Value) -> Option<ArrayKey> {
        Some(match value {
            Value::Null => ArrayKey::String(String::new()),
            Value::Bool(b) => ArrayKey::Int(i64::from(*b)),
            Value::Int(i) => ArrayKey::Int(*i),
            Value::Float(f) => ArrayKey::Int(*f as i64),
            Value::String(s) => match canonical_int(s) {
                Some(i) => ArrayKey::Int(i),
                None => ArrayKey::String(s.clone()),
            },
            Value::Array(_) => return None,
        })
    }
}

impl From<i64> for ArrayKey {
    fn from(i: i64) -> Self {
        ArrayKey::Int(i)
    }
}

impl From<&str> for ArrayKey {
    fn from(s: &str) -> Self {
        ArrayKey::String(s.to_string())
    }
}

/// `"12"` and `"-3"` are integer keys; `"012"`, `"+3"`, `"-0"` and `"1.0"` stay strings.
fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if s == "-0" {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalization() {
        assert_eq!(ArrayKey::from_value(&Value::String("12".into())), Some(ArrayKey::Int(12)));
        assert_eq!(ArrayKey::from_value(&Value::String("-3".into())), Some(ArrayKey::Int(-3)));
        assert_eq!(ArrayKey::from_value(&Value::String("012".into())), Some("012".into()));
        assert_eq!(ArrayKey::from_value(&Value::String("-0".into())), Some("-0".into()));
        assert_eq!(ArrayKey::from_value(&Value::String("1.5".into())), Some("1.5".into()));
        assert_eq!(ArrayKey::from_value(&Value::Bool(true)), Some(ArrayKey::Int(1)));
        assert_eq!(ArrayKey::from_value(&Value::Null), Some("".into()));
        assert_eq!(ArrayKey::from_value(&Value::Float(2.9)), Some(ArrayKey::Int(2)));
        assert_eq!(ArrayKey::from_value(&Value::Array(vec![])), None);
    }

    #[test]
    fn test_out_of_range_numeric_string_stays_a_string() {
        let big = "99999999999999999999";
        assert_eq!(ArrayKey::from_value(&Value::String(big.into())), Some(big.into()));
    }

    #[test]
    fn test_accessors() {
        let v = Value::Array(vec![(ArrayKey::Int(0), Value::Int(7)), ("a".into(), Value::Null)]);
        assert_eq!(v.get(&ArrayKey::Int(0)), Some(&Value::Int(7)));
        assert!(v.get(&"a".into()).is_some_and(Value::is_null));
        assert_eq!(v.type_name(), "array");
        assert_eq!(Value::Int(1).as_str(), None);
    }
}
