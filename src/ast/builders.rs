//! Leaf constructors backed by an injected id generator.
//!
//! ```
//! use critsql::prelude::*;
//!
//! let crit = CriterionBuilder::new(SequentialIds::new());
//! let age = FieldDescriptor::new("Age", TypeTag::Int32).shared();
//! let status = FieldDescriptor::new("Status", TypeTag::String).shared();
//!
//! let filter = crit.gte(&age, 18) & crit.is_in(&status, ["A", "B"]).unwrap();
//! assert_eq!(filter.to_sql(), "(Age >= @Age_1) AND (Status IN ('A', 'B'))");
//! ```

use crate::ast::criterion::{Comparison, Criterion, FieldRef, NullCheck, PatternMatch, SetMembership};
use crate::ast::operators::{ComparisonOp, MembershipOp};
use crate::error::CritResult;
use crate::id::{IdGenerator, SequentialIds};
use crate::value::Value;

/// Builds criterion leaves, drawing a fresh id for every bound parameter.
#[derive(Debug, Default)]
pub struct CriterionBuilder<G = SequentialIds> {
    ids: G,
}

impl<G: IdGenerator> CriterionBuilder<G> {
    pub fn new(ids: G) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &G {
        &self.ids
    }

    pub fn compare(&self, op: ComparisonOp, field: &FieldRef, value: impl Into<Value>) -> Criterion {
        Comparison::new(op, FieldRef::clone(field), value, self.ids.next_id()).into()
    }

    pub fn eq(&self, field: &FieldRef, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Eq, field, value)
    }

    pub fn ne(&self, field: &FieldRef, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Ne, field, value)
    }

    pub fn lt(&self, field: &FieldRef, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Lt, field, value)
    }

    pub fn lte(&self, field: &FieldRef, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Lte, field, value)
    }

    pub fn gt(&self, field: &FieldRef, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Gt, field, value)
    }

    pub fn gte(&self, field: &FieldRef, value: impl Into<Value>) -> Criterion {
        self.compare(ComparisonOp::Gte, field, value)
    }

    pub fn like(&self, field: &FieldRef, pattern: impl Into<String>) -> Criterion {
        PatternMatch::new(FieldRef::clone(field), pattern, self.ids.next_id()).into()
    }

    pub fn like_escaped(&self, field: &FieldRef, pattern: impl Into<String>, escape: char) -> Criterion {
        PatternMatch::new(FieldRef::clone(field), pattern, self.ids.next_id())
            .escape(escape)
            .into()
    }

    pub fn not_like(&self, field: &FieldRef, pattern: impl Into<String>) -> Criterion {
        PatternMatch::new(FieldRef::clone(field), pattern, self.ids.next_id())
            .negate()
            .into()
    }

    pub fn is_null(&self, field: &FieldRef) -> Criterion {
        NullCheck::new(FieldRef::clone(field)).into()
    }

    pub fn is_not_null(&self, field: &FieldRef) -> Criterion {
        NullCheck::not_null(FieldRef::clone(field)).into()
    }

    pub fn is_in<V: Into<Value>>(
        &self,
        field: &FieldRef,
        values: impl IntoIterator<Item = V>,
    ) -> CritResult<Criterion> {
        self.membership(MembershipOp::In, field, values)
    }

    pub fn not_in<V: Into<Value>>(
        &self,
        field: &FieldRef,
        values: impl IntoIterator<Item = V>,
    ) -> CritResult<Criterion> {
        self.membership(MembershipOp::NotIn, field, values)
    }

    fn membership<V: Into<Value>>(
        &self,
        op: MembershipOp,
        field: &FieldRef,
        values: impl IntoIterator<Item = V>,
    ) -> CritResult<Criterion> {
        let list = Value::List(values.into_iter().map(Into::into).collect());
        Ok(SetMembership::new(op, FieldRef::clone(field), list)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;
    use crate::id::UniqueId;
    use crate::types::TypeTag;
    use crate::value::BoundValue;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_each_leaf_gets_a_fresh_id() {
        let crit = CriterionBuilder::new(SequentialIds::starting_at(10));
        let name = FieldDescriptor::new("Name", TypeTag::String).shared();
        let tree = crit.eq(&name, "a") | crit.like(&name, "b%") | crit.ne(&name, "c");
        let keys: Vec<String> = tree.parameters().unwrap().into_keys().collect();
        assert_eq!(keys, vec!["Name_10", "Name_11", "Name_12"]);
    }

    #[test]
    fn test_null_checks_consume_no_ids() {
        let crit = CriterionBuilder::new(SequentialIds::new());
        let deleted = FieldDescriptor::new("DeletedAt", TypeTag::DateTime).shared();
        let _ = crit.is_null(&deleted);
        let _ = crit.is_in(&deleted, Vec::<Value>::new()).unwrap();
        assert_eq!(crit.ids().next_id(), UniqueId::from(1));
    }

    #[test]
    fn test_builder_over_shared_generator() {
        let ids = Arc::new(SequentialIds::new());
        let first = CriterionBuilder::new(Arc::clone(&ids));
        let second = CriterionBuilder::new(ids);
        let score = FieldDescriptor::new("Score", TypeTag::Double).shared();

        let tree = first.gt(&score, 1.5) & second.lt(&score, 9.5);
        let params = tree.parameters().unwrap();
        assert_eq!(params["Score_1"], BoundValue::new(1.5, TypeTag::Double));
        assert_eq!(params["Score_2"], BoundValue::new(9.5, TypeTag::Double));
    }
}
