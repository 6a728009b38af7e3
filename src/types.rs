//! Host type → portable tag → SQL type mapping.
//!
//! ```text
//! i32 ──tag_of──▶ TypeTag::Int32 ──literal_category──▶ RawNumber
//!                                └─vendor_type_of────▶ INTEGER
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback VARCHAR length when a field declares no size.
pub const DEFAULT_VARCHAR_SIZE: u32 = 255;
/// Fallback NUMERIC precision (total digits).
pub const DEFAULT_NUMERIC_PRECISION: u32 = 18;
/// Fallback NUMERIC scale (fractional digits).
pub const DEFAULT_NUMERIC_SCALE: u32 = 2;

/// Portable, vendor-neutral storage type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Decimal,
    Char,
    String,
    DateTime,
    Guid,
    Binary,
}

impl TypeTag {
    pub const ALL: [TypeTag; 13] = [
        TypeTag::Bool,
        TypeTag::Int8,
        TypeTag::Int16,
        TypeTag::Int32,
        TypeTag::Int64,
        TypeTag::Float,
        TypeTag::Double,
        TypeTag::Decimal,
        TypeTag::Char,
        TypeTag::String,
        TypeTag::DateTime,
        TypeTag::Guid,
        TypeTag::Binary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Bool => "Bool",
            TypeTag::Int8 => "Int8",
            TypeTag::Int16 => "Int16",
            TypeTag::Int32 => "Int32",
            TypeTag::Int64 => "Int64",
            TypeTag::Float => "Float",
            TypeTag::Double => "Double",
            TypeTag::Decimal => "Decimal",
            TypeTag::Char => "Char",
            TypeTag::String => "String",
            TypeTag::DateTime => "DateTime",
            TypeTag::Guid => "Guid",
            TypeTag::Binary => "Binary",
        }
    }

    /// Whether IN-list items of this tag are written as quoted text.
    pub fn is_quoted(self) -> bool {
        matches!(
            self,
            TypeTag::String | TypeTag::Char | TypeTag::DateTime | TypeTag::Guid
        )
    }

    /// Formatting rule used when substituting a bound value into text.
    ///
    /// `None` means the tag has no dedicated rule; callers fall back to
    /// [`LiteralCategory::QuotedEscaped`].
    pub fn literal_category(self) -> Option<LiteralCategory> {
        match self {
            TypeTag::Char | TypeTag::String | TypeTag::Guid => Some(LiteralCategory::QuotedEscaped),
            TypeTag::DateTime => Some(LiteralCategory::QuotedDateTime),
            TypeTag::Float | TypeTag::Double | TypeTag::Decimal => {
                Some(LiteralCategory::FixedDecimal2)
            }
            TypeTag::Int8 | TypeTag::Int16 | TypeTag::Int32 | TypeTag::Int64 => {
                Some(LiteralCategory::RawNumber)
            }
            TypeTag::Bool => Some(LiteralCategory::BoolDigit),
            TypeTag::Binary => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a bound value is written when rendered as a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralCategory {
    /// `'text'` with embedded quotes doubled
    QuotedEscaped,
    /// `'yyyy-MM-dd HH:mm:ss'`
    QuotedDateTime,
    /// Exactly two fractional digits, `.` separator
    FixedDecimal2,
    /// Plain base-10 number
    RawNumber,
    /// `1` or `0`
    BoolDigit,
}

impl fmt::Display for LiteralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiteralCategory::QuotedEscaped => "QuotedEscaped",
            LiteralCategory::QuotedDateTime => "QuotedDateTime",
            LiteralCategory::FixedDecimal2 => "FixedDecimal2",
            LiteralCategory::RawNumber => "RawNumber",
            LiteralCategory::BoolDigit => "BoolDigit",
        };
        f.write_str(name)
    }
}

static HOST_TYPES: LazyLock<HashMap<TypeId, TypeTag>> = LazyLock::new(|| {
    HashMap::from([
        (TypeId::of::<bool>(), TypeTag::Bool),
        (TypeId::of::<i8>(), TypeTag::Int8),
        (TypeId::of::<u8>(), TypeTag::Int8),
        (TypeId::of::<i16>(), TypeTag::Int16),
        (TypeId::of::<u16>(), TypeTag::Int32),
        (TypeId::of::<i32>(), TypeTag::Int32),
        (TypeId::of::<u32>(), TypeTag::Int64),
        (TypeId::of::<i64>(), TypeTag::Int64),
        (TypeId::of::<u64>(), TypeTag::Int64),
        (TypeId::of::<isize>(), TypeTag::Int64),
        (TypeId::of::<usize>(), TypeTag::Int64),
        (TypeId::of::<f32>(), TypeTag::Float),
        (TypeId::of::<f64>(), TypeTag::Double),
        (TypeId::of::<Decimal>(), TypeTag::Decimal),
        (TypeId::of::<char>(), TypeTag::Char),
        (TypeId::of::<String>(), TypeTag::String),
        (TypeId::of::<str>(), TypeTag::String),
        (TypeId::of::<&'static str>(), TypeTag::String),
        (TypeId::of::<NaiveDateTime>(), TypeTag::DateTime),
        (TypeId::of::<NaiveDate>(), TypeTag::DateTime),
        (TypeId::of::<DateTime<Utc>>(), TypeTag::DateTime),
        (TypeId::of::<Uuid>(), TypeTag::Guid),
        (TypeId::of::<Vec<u8>>(), TypeTag::Binary),
        (TypeId::of::<[u8]>(), TypeTag::Binary),
    ])
});

static HOST_TYPE_NAMES: LazyLock<HashMap<&'static str, TypeTag>> = LazyLock::new(|| {
    HashMap::from([
        ("bool", TypeTag::Bool),
        ("boolean", TypeTag::Bool),
        ("int8", TypeTag::Int8),
        ("i8", TypeTag::Int8),
        ("u8", TypeTag::Int8),
        ("byte", TypeTag::Int8),
        ("int16", TypeTag::Int16),
        ("i16", TypeTag::Int16),
        ("smallint", TypeTag::Int16),
        ("int32", TypeTag::Int32),
        ("i32", TypeTag::Int32),
        ("int", TypeTag::Int32),
        ("integer", TypeTag::Int32),
        ("int64", TypeTag::Int64),
        ("i64", TypeTag::Int64),
        ("bigint", TypeTag::Int64),
        ("float", TypeTag::Float),
        ("f32", TypeTag::Float),
        ("single", TypeTag::Float),
        ("double", TypeTag::Double),
        ("f64", TypeTag::Double),
        ("decimal", TypeTag::Decimal),
        ("numeric", TypeTag::Decimal),
        ("char", TypeTag::Char),
        ("string", TypeTag::String),
        ("str", TypeTag::String),
        ("varchar", TypeTag::String),
        ("text", TypeTag::String),
        ("datetime", TypeTag::DateTime),
        ("timestamp", TypeTag::DateTime),
        ("date", TypeTag::DateTime),
        ("guid", TypeTag::Guid),
        ("uuid", TypeTag::Guid),
        ("binary", TypeTag::Binary),
        ("bytes", TypeTag::Binary),
        ("blob", TypeTag::Binary),
    ])
});

/// Lookups between host types, tags and SQL type names.
pub struct TypeMap;

impl TypeMap {
    /// Tag of a Rust host type. Unknown types map to [`TypeTag::Binary`].
    pub fn tag_of<T: ?Sized + 'static>() -> TypeTag {
        match HOST_TYPES.get(&TypeId::of::<T>()) {
            Some(tag) => *tag,
            None => {
                tracing::warn!(
                    host_type = std::any::type_name::<T>(),
                    "unknown host type, falling back to Binary"
                );
                TypeTag::Binary
            }
        }
    }

    /// Tag of a host type given by name (`"int32"`, `"varchar"`, `"uuid"`...).
    ///
    /// Matching is case-insensitive. Unknown names map to [`TypeTag::Binary`].
    pub fn tag_of_name(name: &str) -> TypeTag {
        let key = name.trim().to_ascii_lowercase();
        match HOST_TYPE_NAMES.get(key.as_str()) {
            Some(tag) => *tag,
            None => {
                tracing::warn!(host_type = name, "unknown host type name, falling back to Binary");
                TypeTag::Binary
            }
        }
    }

    pub fn literal_category_of(tag: TypeTag) -> Option<LiteralCategory> {
        tag.literal_category()
    }

    /// Firebird type name as used for parameter declarations.
    ///
    /// Missing size/precision use the crate defaults. The DDL path adds its
    /// own restrictions on top of this table, see [`crate::firebird`].
    pub fn vendor_type_of(tag: TypeTag, size: Option<u32>, precision: Option<u32>) -> String {
        match tag {
            TypeTag::Int8 | TypeTag::Int16 => "SMALLINT".to_string(),
            TypeTag::Int32 => "INTEGER".to_string(),
            TypeTag::Int64 | TypeTag::Double => "BIGINT".to_string(),
            TypeTag::Float | TypeTag::Decimal => format!(
                "NUMERIC({},{})",
                size.unwrap_or(DEFAULT_NUMERIC_PRECISION),
                precision.unwrap_or(DEFAULT_NUMERIC_SCALE)
            ),
            TypeTag::Char => "CHAR(1)".to_string(),
            TypeTag::String => format!("VARCHAR({})", size.unwrap_or(DEFAULT_VARCHAR_SIZE)),
            TypeTag::DateTime => "TIMESTAMP".to_string(),
            TypeTag::Bool => "BOOLEAN".to_string(),
            TypeTag::Guid | TypeTag::Binary => "BLOB".to_string(),
        }
    }
}
