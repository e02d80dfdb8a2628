//! Data types and cell values

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Supported column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Variable-length string
    String,
}

impl Default for DataType {
    fn default() -> Self {
        DataType::String
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "int"),
            DataType::Float => write!(f, "float"),
            DataType::Bool => write!(f, "bool"),
            DataType::String => write!(f, "string"),
        }
    }
}

/// Error when parsing a data type string
#[derive(Debug, Clone)]
pub struct ParseDataTypeError {
    pub input: String,
}

impl fmt::Display for ParseDataTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown data type '{}'. Valid options: int, float, bool, string",
            self.input
        )
    }
}

impl std::error::Error for ParseDataTypeError {}

impl FromStr for DataType {
    type Err = ParseDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "i8" | "i16" | "i32" | "i64" | "int" | "integer" | "long" | "bigint" => Ok(DataType::Int),
            "f32" | "f64" | "float" | "double" | "number" => Ok(DataType::Float),
            "bool" | "boolean" => Ok(DataType::Bool),
            "string" | "str" | "text" | "varchar" => Ok(DataType::String),
            _ => Err(ParseDataTypeError {
                input: s.to_string(),
            }),
        }
    }
}

// Custom deserialize from string
impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DataType::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// Serialize back to string
impl Serialize for DataType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// A value that does not fit the requested data type
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionError {
    pub value: Value,
    pub target: DataType,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} value '{}' is not a valid {}",
            self.value.type_name(),
            self.value,
            self.target
        )
    }
}

impl std::error::Error for ConversionError {}

impl DataType {
    /// Check if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }

    /// Canonical display string of `value` under this type.
    ///
    /// Null renders as the empty string for every type. Floats render with
    /// two decimals, so `2` in an int column and `2.00` in a float column
    /// are different display strings.
    pub fn format(&self, value: &Value) -> Result<String, ConversionError> {
        let mismatch = || ConversionError {
            value: value.clone(),
            target: *self,
        };
        match (self, value) {
            (_, Value::Null) => Ok(String::new()),
            (DataType::Int, Value::Int(i)) => Ok(i.to_string()),
            (DataType::Float, Value::Float(x)) => Ok(format!("{:.2}", x)),
            (DataType::Float, Value::Int(i)) => Ok(format!("{:.2}", *i as f64)),
            (DataType::Bool, Value::Bool(b)) => Ok(b.to_string()),
            (DataType::String, v) => Ok(v.to_string()),
            _ => Err(mismatch()),
        }
    }

    /// Convert `value` into this type for storage.
    pub fn coerce(&self, value: Value) -> Result<Value, ConversionError> {
        let target = *self;
        let converted = match (self, &value) {
            (_, Value::Null) => Some(Value::Null),
            (DataType::Int, Value::Int(_)) => Some(value.clone()),
            // i64::MAX as f64 rounds up to 2^63, which is itself out of range
            (DataType::Int, Value::Float(x))
                if x.fract() == 0.0 && *x >= i64::MIN as f64 && *x < i64::MAX as f64 =>
            {
                Some(Value::Int(*x as i64))
            }
            (DataType::Int, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::Int),
            (DataType::Float, Value::Float(_)) => Some(value.clone()),
            (DataType::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
            (DataType::Float, Value::String(s)) => s.trim().parse::<f64>().ok().map(Value::Float),
            (DataType::Bool, Value::Bool(_)) => Some(value.clone()),
            (DataType::Bool, Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            (DataType::String, Value::String(_)) => Some(value.clone()),
            (DataType::String, v) => Some(Value::String(v.to_string())),
            _ => None,
        };
        converted.ok_or(ConversionError { value, target })
    }
}

// ============================================================================
// Value
// ============================================================================

/// A typed cell value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the value's variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
