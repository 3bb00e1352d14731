use std::cmp::Ordering;
use std::fmt;

/// A dynamically typed cell value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric reading used for sorting: numbers, and text that parses as a finite number.
    fn sort_number(&self) -> Option<f64> {
        match self {
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
            other => other.as_f64(),
        }
    }

    /// Total order over values.
    ///
    /// Anything with a numeric reading sorts first and compares numerically, so `Int(10)`,
    /// `Float(10.0)` and `"10"` are equal. Everything else compares by its string form after
    /// the numbers. `Null` sorts after everything.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (a, b) => match (a.sort_number(), b.sort_number()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.to_string().cmp(&b.to_string()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_numerically_across_kinds() {
        assert_eq!(Value::Int(10).compare(&Value::Float(9.5)), Ordering::Greater);
        assert_eq!(Value::Int(2).compare(&Value::Int(10)), Ordering::Less);
    }

    #[test]
    fn numeric_text_compares_as_a_number() {
        assert_eq!(Value::from("10").compare(&Value::Int(9)), Ordering::Greater);
        assert_eq!(Value::from("10").compare(&Value::Int(10)), Ordering::Equal);
        assert_eq!(Value::Float(9.5).compare(&Value::from("10")), Ordering::Less);
    }

    #[test]
    fn non_numeric_kinds_fall_back_to_strings_after_numbers() {
        assert_eq!(Value::Bool(true).compare(&Value::from("true")), Ordering::Equal);
        assert_eq!(Value::from("abc").compare(&Value::Int(1_000)), Ordering::Greater);
        assert_eq!(Value::from("NaN").compare(&Value::Float(1.0)), Ordering::Greater);
        assert_eq!(Value::Bool(false).compare(&Value::from("abc")), Ordering::Greater);
    }

    #[test]
    fn compare_is_transitive_over_mixed_kinds() {
        let values = [
            Value::Int(10),
            Value::Float(9.5),
            Value::from("10"),
            Value::from("9"),
            Value::from("abc"),
            Value::Bool(true),
            Value::Float(-1.0),
            Value::Null,
        ];
        for a in &values {
            for b in &values {
                assert_eq!(a.compare(b), b.compare(a).reverse());
                for c in &values {
                    if a.compare(b) != Ordering::Greater && b.compare(c) != Ordering::Greater {
                        assert_ne!(a.compare(c), Ordering::Greater, "{a:?} {b:?} {c:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn null_is_last_and_displays_empty() {
        assert_eq!(Value::Null.compare(&Value::Int(0)), Ordering::Greater);
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::Null.to_string(), "");
    }
}
