use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{TypeMap, TypeTag};

/// A queryable field: column name, storage type and declared dimensions.
///
/// Fields are built once per schema and shared between criteria through
/// [`Arc`]; see [`FieldDescriptor::shared`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub host_type: TypeTag,
    pub size: Option<u32>,
    pub precision: Option<u32>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, host_type: TypeTag) -> Self {
        Self {
            name: name.into(),
            host_type,
            size: None,
            precision: None,
        }
    }

    /// Describe a field by its Rust host type.
    ///
    /// ```
    /// use critsql::{FieldDescriptor, TypeTag};
    ///
    /// let age = FieldDescriptor::of::<i32>("Age");
    /// assert_eq!(age.host_type, TypeTag::Int32);
    /// ```
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name, TypeMap::tag_of::<T>())
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_builder() {
        let price = FieldDescriptor::new("Price", TypeTag::Decimal)
            .with_size(15)
            .with_precision(4);
        assert_eq!(price.name, "Price");
        assert_eq!(price.size, Some(15));
        assert_eq!(price.precision, Some(4));
    }

    #[test]
    fn test_field_of_host_type() {
        assert_eq!(FieldDescriptor::of::<String>("Name").host_type, TypeTag::String);
        assert_eq!(FieldDescriptor::of::<bool>("Active").host_type, TypeTag::Bool);
    }
}
