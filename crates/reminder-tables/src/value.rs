//! Cell values.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A single table cell.
///
/// Integral floats are stored as `Int` so that a Person ID read from a
/// workbook (`1.0`) equals the same ID read from a CSV file (`1`).
#[derive(Debug, Clone)]
pub enum Value {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// Build a numeric value, collapsing integral floats to `Int`.
    pub fn number(f: f64) -> Self {
        if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            Value::Int(f as i64)
        } else {
            Value::Float(f)
        }
    }

    /// Infer a value from raw text (CSV cells).
    ///
    /// Text becomes a number only when the number prints back as the same
    /// text, so `007`, `3.10` and `1e3` stay text and keep their identity.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Empty;
        }
        if let Ok(i) = trimmed.parse::<i64>()
            && i.to_string() == trimmed
        {
            return Value::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>()
            && f.is_finite()
        {
            let number = Value::number(f);
            if number.to_string() == trimmed {
                return number;
            }
        }
        match trimmed {
            "TRUE" | "true" => Value::Bool(true),
            "FALSE" | "false" => Value::Bool(false),
            _ => Value::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Empty, Value::Empty) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_key(*a) == float_key(*b),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Empty => {}
            Value::Text(s) => s.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => float_key(*f).hash(state),
            Value::Bool(b) => b.hash(state),
        }
    }
}

/// Bit pattern used for float equality; folds -0.0 into 0.0.
fn float_key(f: f64) -> u64 {
    if f == 0.0 { 0.0f64.to_bits() } else { f.to_bits() }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::number(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_integral_float_is_int() {
        assert_eq!(Value::number(1.0), Value::Int(1));
        assert_eq!(Value::from(42.0), Value::Int(42));
        assert!(matches!(Value::number(1.5), Value::Float(_)));
    }

    #[test]
    fn test_parse_infers_types() {
        assert_eq!(Value::parse("7"), Value::Int(7));
        assert_eq!(Value::parse("-3"), Value::Int(-3));
        assert_eq!(Value::parse("2.5"), Value::Float(2.5));
        assert_eq!(Value::parse("TRUE"), Value::Bool(true));
        assert_eq!(Value::parse("  "), Value::Empty);
        assert_eq!(Value::parse("Safety"), Value::Text("Safety".into()));
        assert_eq!(Value::parse("NaN"), Value::Text("NaN".into()));
    }

    #[test]
    fn test_parse_keeps_non_canonical_numbers_as_text() {
        assert_eq!(Value::parse("007"), Value::Text("007".into()));
        assert_ne!(Value::parse("007"), Value::parse("7"));
        assert_eq!(Value::parse("3.10"), Value::Text("3.10".into()));
        assert_eq!(Value::parse("1e3"), Value::Text("1e3".into()));
        assert_eq!(Value::parse("+7"), Value::Text("+7".into()));
        assert_eq!(Value::parse("7.0"), Value::Text("7.0".into()));
        assert_eq!(Value::parse("3.10").to_string(), "3.10");
    }

    #[test]
    fn test_text_is_not_number() {
        assert_ne!(Value::Text("1".into()), Value::Int(1));
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let mut set = HashSet::new();
        set.insert(Value::Float(0.0));
        set.insert(Value::Float(-0.0));
        set.insert(Value::from("a"));
        set.insert(Value::from("a"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::Empty.to_string(), "");
        assert_eq!(Value::from("Ethics").to_string(), "Ethics");
    }
}
