use std::fmt;

/// A scalar field value as exposed by [`Entry::field`](super::Entry::field).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Text(String),
  Int(i64),
  Float(f64),
  Bool(bool),
}

impl Value {
  /// Returns the string contents for text values.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Text(s) => Some(s),
      _ => None,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Text(s) => write!(f, "{}", s),
      Value::Int(i) => write!(f, "{}", i),
      Value::Float(x) => write!(f, "{}", x),
      Value::Bool(b) => write!(f, "{}", b),
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

impl From<u32> for Value {
  fn from(i: u32) -> Self {
    Value::Int(i64::from(i))
  }
}

impl From<usize> for Value {
  fn from(i: usize) -> Self {
    Value::Int(i64::try_from(i).unwrap_or(i64::MAX))
  }
}

impl From<f64> for Value {
  fn from(x: f64) -> Self {
    Value::Float(x)
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Value::Bool(b)
  }
}
