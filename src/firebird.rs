//! Firebird column and parameter types.
//!
//! Two paths share the [`TypeMap`] table but differ for booleans: DDL
//! generation rejects `Bool`, while parameter binding declares it as
//! `BOOLEAN`.

use serde::{Deserialize, Serialize};

use crate::config::TypeDefaults;
use crate::error::{CritError, CritResult};
use crate::field::FieldDescriptor;
use crate::types::{TypeMap, TypeTag};
use crate::value::{ParameterMap, Value};

/// Vendor-specific type declarations for fields and bound parameters.
pub trait VendorTypeGenerator {
    /// Column type for a CREATE/ALTER TABLE statement.
    fn ddl_type(&self, field: &FieldDescriptor) -> CritResult<String>;

    /// Type declared for a bound parameter.
    fn parameter_type(&self, tag: TypeTag, size: Option<u32>, precision: Option<u32>) -> String;
}

/// Firebird parameter data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FbDbType {
    SmallInt,
    Integer,
    BigInt,
    Numeric,
    Char,
    VarChar,
    TimeStamp,
    Boolean,
    Blob,
}

impl FbDbType {
    pub fn from_tag(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Int8 | TypeTag::Int16 => FbDbType::SmallInt,
            TypeTag::Int32 => FbDbType::Integer,
            TypeTag::Int64 | TypeTag::Double => FbDbType::BigInt,
            TypeTag::Float | TypeTag::Decimal => FbDbType::Numeric,
            TypeTag::Char => FbDbType::Char,
            TypeTag::String => FbDbType::VarChar,
            TypeTag::DateTime => FbDbType::TimeStamp,
            TypeTag::Bool => FbDbType::Boolean,
            TypeTag::Guid | TypeTag::Binary => FbDbType::Blob,
        }
    }
}

/// A parameter as handed to a Firebird driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbParameter {
    /// Name including the leading `@`
    pub name: String,
    pub db_type: FbDbType,
    /// Declared type, e.g. `VARCHAR(12)`
    pub type_name: String,
    pub size: Option<u32>,
    pub scale: Option<u32>,
    pub value: Value,
}

/// Ordered parameter collection of a Firebird command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FbParameterCollection {
    parameters: Vec<FbParameter>,
}

impl FbParameterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing one with the same name.
    pub fn add(&mut self, parameter: FbParameter) {
        match self.parameters.iter_mut().find(|p| p.name == parameter.name) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FbParameter> {
        let name = name.trim_start_matches('@');
        self.parameters
            .iter()
            .find(|p| p.name.trim_start_matches('@') == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FbParameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Firebird type generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Firebird {
    defaults: TypeDefaults,
}

impl Firebird {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: TypeDefaults) -> Self {
        Self { defaults }
    }

    /// `Name TYPE` for a column definition list.
    pub fn column_definition(&self, field: &FieldDescriptor) -> CritResult<String> {
        Ok(format!("{} {}", field.name, self.ddl_type(field)?))
    }

    /// Add every entry of a parameter map to a driver collection.
    pub fn populate(&self, collection: &mut FbParameterCollection, parameters: &ParameterMap) {
        for (name, bound) in parameters {
            let tag = bound.type_tag;
            let db_type = FbDbType::from_tag(tag);
            let (size, scale) = match db_type {
                FbDbType::VarChar => (Some(text_size(&bound.value)), None),
                FbDbType::Char => (Some(1), None),
                FbDbType::Numeric => (
                    Some(self.defaults.numeric_precision),
                    Some(self.defaults.numeric_scale),
                ),
                _ => (None, None),
            };

            collection.add(FbParameter {
                name: format!("@{}", name.trim_start_matches('@')),
                db_type,
                type_name: self.parameter_type(tag, size, scale),
                size,
                scale,
                value: bound.value.clone(),
            });
        }
        tracing::debug!(count = collection.len(), "populated firebird parameters");
    }

    pub fn parameters(&self, parameters: &ParameterMap) -> FbParameterCollection {
        let mut collection = FbParameterCollection::new();
        self.populate(&mut collection, parameters);
        collection
    }
}

impl VendorTypeGenerator for Firebird {
    fn ddl_type(&self, field: &FieldDescriptor) -> CritResult<String> {
        if field.host_type == TypeTag::Bool {
            return Err(CritError::UnsupportedType {
                tag: TypeTag::Bool,
                context: "DDL",
            });
        }
        let (size, precision) = match field.host_type {
            TypeTag::String => (field.size.unwrap_or(self.defaults.varchar_size), None),
            TypeTag::Float | TypeTag::Decimal => (
                field.size.unwrap_or(self.defaults.numeric_precision),
                Some(field.precision.unwrap_or(self.defaults.numeric_scale)),
            ),
            _ => return Ok(TypeMap::vendor_type_of(field.host_type, field.size, field.precision)),
        };
        Ok(TypeMap::vendor_type_of(field.host_type, Some(size), precision))
    }

    fn parameter_type(&self, tag: TypeTag, size: Option<u32>, precision: Option<u32>) -> String {
        let size = match tag {
            TypeTag::String => size.or(Some(self.defaults.varchar_size)),
            TypeTag::Float | TypeTag::Decimal => size.or(Some(self.defaults.numeric_precision)),
            _ => size,
        };
        let precision = match tag {
            TypeTag::Float | TypeTag::Decimal => precision.or(Some(self.defaults.numeric_scale)),
            _ => precision,
        };
        TypeMap::vendor_type_of(tag, size, precision)
    }
}

/// Character length of a text parameter, at least 1.
fn text_size(value: &Value) -> u32 {
    let len = match value {
        Value::String(s) => s.chars().count(),
        _ => 0,
    };
    u32::try_from(len).unwrap_or(u32::MAX).max(1)
}
