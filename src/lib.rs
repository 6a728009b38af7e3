//! # critsql: Criteria to SQL
//!
//! Build filters and orderings as a typed tree, render them to
//! parameterized SQL, and render bound commands back to literal SQL for
//! audit logs.
//!
//! ## Quick Example
//!
//! ```
//! use critsql::prelude::*;
//!
//! let crit = CriterionBuilder::new(SequentialIds::new());
//! let age = FieldDescriptor::new("Age", TypeTag::Int32).shared();
//! let name = FieldDescriptor::new("Name", TypeTag::String).shared();
//!
//! let set = CriteriaSet::default()
//!     .filter(crit.gte(&age, 18) & crit.like(&name, "O'B%"))
//!     .order_by(OrderingChain::asc(name.clone()));
//!
//! let cmd = set.apply("SELECT * FROM PEOPLE").unwrap();
//! assert_eq!(
//!     cmd.text,
//!     "SELECT * FROM PEOPLE WHERE (Age >= @Age_1) AND (Name LIKE @Name_2) ORDER BY Name ASC"
//! );
//! assert_eq!(
//!     cmd.to_literal_sql(),
//!     "SELECT * FROM PEOPLE WHERE (Age >= 18 /* @Age_1 */) AND (Name LIKE 'O''B%' /* @Name_2 */) ORDER BY Name ASC"
//! );
//! ```
//!
//! ## Pieces
//!
//! | Module         | Role                                             |
//! |----------------|--------------------------------------------------|
//! | [`ast`]        | Criterion tree, ordering chain, criteria set     |
//! | [`transpiler`] | `ToSql` rendering with `@name` placeholders      |
//! | [`literal`]    | Placeholder substitution for audit output        |
//! | [`types`]      | Host type → tag → literal rule / SQL type        |
//! | [`firebird`]   | Firebird DDL and parameter declarations          |

pub mod ast;
pub mod config;
pub mod error;
pub mod field;
pub mod firebird;
pub mod id;
pub mod literal;
pub mod parser;
pub mod transpiler;
pub mod types;
pub mod value;

pub use ast::{CriteriaSet, Criterion, CriterionBuilder, OrderingChain};
pub use error::{CritError, CritResult};
pub use field::FieldDescriptor;
pub use types::{TypeMap, TypeTag};
pub use value::{BoundValue, ParameterMap, Value};

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::error::*;
    pub use crate::field::FieldDescriptor;
    pub use crate::firebird::{FbParameterCollection, Firebird, VendorTypeGenerator};
    pub use crate::id::{IdGenerator, RandomIds, SequentialIds, UniqueId};
    pub use crate::literal::LiteralRenderer;
    pub use crate::transpiler::ToSql;
    pub use crate::types::{LiteralCategory, TypeMap, TypeTag};
    pub use crate::value::{BoundValue, ParameterMap, Value};
}

/// Render a command literally, substituting each bound parameter.
///
/// # Example
///
/// ```
/// use critsql::{BoundValue, ParameterMap, TypeTag};
///
/// let mut params = ParameterMap::new();
/// params.insert("id".into(), BoundValue::new(5, TypeTag::Int32));
/// params.insert("id2".into(), BoundValue::new(7, TypeTag::Int32));
///
/// let sql = critsql::render_literal("a = @id AND b = @id2", &params);
/// assert_eq!(sql, "a = 5 /* @id */ AND b = 7 /* @id2 */");
/// ```
pub fn render_literal(command_text: &str, parameters: &ParameterMap) -> String {
    literal::render(command_text, parameters)
}
