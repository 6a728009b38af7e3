//! Filter and ordering AST.
//!
//! Leaves compare one field against a value; groups join two subtrees with
//! AND/OR. Rendering to SQL lives in [`crate::transpiler`].

pub mod builders;
pub mod criteria_set;
pub mod criterion;
pub mod operators;
pub mod ordering;

pub use builders::CriterionBuilder;
pub use criteria_set::{Command, CriteriaSet};
pub use criterion::{
    Comparison, Criterion, FieldRef, NullCheck, PatternMatch, SetMembership, parameter_key,
};
pub use operators::{ComparisonOp, LogicalOp, MembershipOp, SortOrder};
pub use ordering::OrderingChain;
