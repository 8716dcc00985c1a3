//! Cell values

use serde::Serialize;
use std::fmt;

/// A single cell of a loaded table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Empty cell, unparseable error cell, or unmapped label
    Missing,
    /// Finite number (codes, scores, durations)
    Number(f64),
    /// Free text (labels, identifiers)
    Text(String),
}

impl Value {
    /// Interpret raw cell text
    ///
    /// Blank → `Missing`; numeric text (dot or single decimal comma) →
    /// `Number`; anything else → trimmed `Text`. Non-finite numbers are
    /// treated as missing.
    pub fn parse(raw: &str) -> Value {
        let s = raw.trim();
        if s.is_empty() {
            return Value::Missing;
        }
        match parse_number(s) {
            Some(n) => Value::from_f64(n),
            None => Value::Text(s.to_string()),
        }
    }

    /// Number cell, or `Missing` when the number is not finite
    pub fn from_f64(n: f64) -> Value {
        if n.is_finite() {
            Value::Number(n)
        } else {
            Value::Missing
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view: numbers, and text that reads as a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => parse_number(s.trim()).filter(|n| n.is_finite()),
            Value::Missing => None,
        }
    }

    /// Integer code view (`2`, `2.0` and `"2"` are all code 2)
    pub fn as_code(&self) -> Option<i64> {
        let n = self.as_f64()?;
        if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            Some(n as i64)
        } else {
            None
        }
    }

    /// Grouping key: integral numbers print without a fraction
    ///
    /// `None` is the missing ("unlabeled") bucket.
    pub fn group_key(&self) -> Option<String> {
        match self {
            Value::Missing => None,
            Value::Number(n) => Some(format_number(*n)),
            Value::Text(s) => Some(s.clone()),
        }
    }

    /// Membership test used by filters
    ///
    /// Numbers compare numerically (also against numeric text); text
    /// compares exactly. Missing never matches.
    pub fn matches(&self, allowed: &Value) -> bool {
        match (self, allowed) {
            (Value::Missing, _) | (_, Value::Missing) => false,
            (Value::Text(a), Value::Text(b)) if a == b => true,
            _ => match (self.as_f64(), allowed.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::from_f64(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

fn parse_number(s: &str) -> Option<f64> {
    if let Ok(n) = s.parse::<f64>() {
        return Some(n);
    }
    // Decimal comma, as in French spreadsheet exports ("12,5")
    if s.matches(',').count() == 1 && !s.contains('.') {
        return s.replace(',', ".").parse::<f64>().ok();
    }
    None
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
