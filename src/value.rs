use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::TypeTag;

/// Calendar format used for every date/time literal.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value compared against a field or bound to a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Exact decimal
    Decimal(Decimal),
    /// Single character
    Char(char),
    /// String
    String(String),
    /// Date and time without zone
    DateTime(NaiveDateTime),
    /// UUID value
    Guid(Uuid),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Sequence of values (IN lists)
    List(Vec<Value>),
}

impl Value {
    /// The tag a value carries on its own, without a field to describe it.
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Value::Null | Value::List(_) => None,
            Value::Bool(_) => Some(TypeTag::Bool),
            Value::Int(_) => Some(TypeTag::Int64),
            Value::Float(_) => Some(TypeTag::Double),
            Value::Decimal(_) => Some(TypeTag::Decimal),
            Value::Char(_) => Some(TypeTag::Char),
            Value::String(_) => Some(TypeTag::String),
            Value::DateTime(_) => Some(TypeTag::DateTime),
            Value::Guid(_) => Some(TypeTag::Guid),
            Value::Bytes(_) => Some(TypeTag::Binary),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Char(c) => write!(f, "{}", c),
            Value::String(s) => write!(f, "{}", s),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Guid(u) => write!(f, "{}", u),
            Value::Bytes(bytes) => {
                for b in bytes {
                    write!(f, "{:02X}", b)?;
                }
                Ok(())
            }
            Value::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A value destined for a named parameter, with the tag of its field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundValue {
    pub value: Value,
    pub type_tag: TypeTag,
}

impl BoundValue {
    pub fn new(value: impl Into<Value>, type_tag: TypeTag) -> Self {
        Self {
            value: value.into(),
            type_tag,
        }
    }
}

/// Parameter name (without `@`) → bound value, in binding order.
pub type ParameterMap = IndexMap<String, BoundValue>;

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! int_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

int_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::DateTime(d.and_time(chrono::NaiveTime::MIN))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt.naive_utc())
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Guid(u)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from(42i32), Value::Int(42));
        assert_eq!(Value::from("A"), Value::String("A".into()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(
            Value::from(vec!["A", "B"]),
            Value::List(vec![Value::String("A".into()), Value::String("B".into())])
        );
    }

    #[test]
    fn test_value_display() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap();
        assert_eq!(Value::from(dt).to_string(), "2024-03-05 14:07:09");
        assert_eq!(Value::Bytes(vec![0xDE, 0xAD, 0x01]).to_string(), "DEAD01");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
    }

    #[test]
    fn test_date_becomes_midnight() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(Value::from(d).to_string(), "2024-01-31 00:00:00");
    }

    #[test]
    fn test_type_tag_of_value() {
        assert_eq!(Value::from(1.5f64).type_tag(), Some(TypeTag::Double));
        assert_eq!(Value::from('x').type_tag(), Some(TypeTag::Char));
        assert_eq!(Value::Null.type_tag(), None);
    }
}
