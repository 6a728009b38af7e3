use std::ops::{BitAnd, BitOr};
use std::sync::Arc;

use crate::ast::operators::{ComparisonOp, LogicalOp, MembershipOp};
use crate::error::{CritError, CritResult};
use crate::field::FieldDescriptor;
use crate::id::UniqueId;
use crate::value::{BoundValue, ParameterMap, Value};

/// Shared handle to a field description.
pub type FieldRef = Arc<FieldDescriptor>;

/// Parameter key for a field and leaf id: `{field}_{id}`.
pub fn parameter_key(field: &FieldDescriptor, id: &UniqueId) -> String {
    format!("{}_{}", field.name, id)
}

/// `field <op> @field_id`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub op: ComparisonOp,
    pub field: FieldRef,
    pub value: Value,
    pub param_id: UniqueId,
}

impl Comparison {
    pub fn new(op: ComparisonOp, field: FieldRef, value: impl Into<Value>, param_id: UniqueId) -> Self {
        Self {
            op,
            field,
            value: value.into(),
            param_id,
        }
    }

    pub fn param_name(&self) -> String {
        parameter_key(&self.field, &self.param_id)
    }
}

/// `field IS [NOT] NULL`
#[derive(Debug, Clone, PartialEq)]
pub struct NullCheck {
    pub field: FieldRef,
    pub negated: bool,
}

impl NullCheck {
    pub fn new(field: FieldRef) -> Self {
        Self {
            field,
            negated: false,
        }
    }

    pub fn not_null(field: FieldRef) -> Self {
        Self {
            field,
            negated: true,
        }
    }
}

/// `field [NOT] IN (v1, v2, ...)`
///
/// Values are written into the SQL text as literals instead of being bound.
/// Text items are quoted with embedded quotes doubled, everything else is
/// written raw, so lists built from untrusted input should be validated by
/// the caller first.
#[derive(Debug, Clone, PartialEq)]
pub struct SetMembership {
    pub op: MembershipOp,
    pub field: FieldRef,
    pub values: Vec<Value>,
}

impl SetMembership {
    /// Build from a value that must be a [`Value::List`] of scalars.
    pub fn new(op: MembershipOp, field: FieldRef, values: impl Into<Value>) -> CritResult<Self> {
        let values = match values.into() {
            Value::List(items) => items,
            other => {
                return Err(CritError::invalid_value(
                    &field.name,
                    format!("{} expects a sequence, got {}", op.as_str(), other),
                ));
            }
        };

        if values.iter().any(|v| matches!(v, Value::List(_))) {
            return Err(CritError::invalid_value(
                &field.name,
                format!("{} items must be scalar values", op.as_str()),
            ));
        }

        if let Some(bad) = values
            .iter()
            .find(|v| matches!(v, Value::Float(f) if !f.is_finite()))
        {
            return Err(CritError::invalid_value(
                &field.name,
                format!("{} items must be finite numbers, got {}", op.as_str(), bad),
            ));
        }

        Ok(Self { op, field, values })
    }
}

/// `field [NOT] LIKE @field_id [ESCAPE 'c']`
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub field: FieldRef,
    pub pattern: String,
    pub escape: Option<char>,
    pub negated: bool,
    pub param_id: UniqueId,
}

impl PatternMatch {
    pub fn new(field: FieldRef, pattern: impl Into<String>, param_id: UniqueId) -> Self {
        Self {
            field,
            pattern: pattern.into(),
            escape: None,
            negated: false,
            param_id,
        }
    }

    pub fn escape(mut self, escape: char) -> Self {
        self.escape = Some(escape);
        self
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn param_name(&self) -> String {
        parameter_key(&self.field, &self.param_id)
    }
}

/// A node of the filter tree.
///
/// Groups are strictly binary and own their children. Longer chains are
/// built by nesting, see [`Criterion::all`] and [`Criterion::any`].
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Compare(Comparison),
    IsNull(NullCheck),
    In(SetMembership),
    Like(PatternMatch),
    Group {
        op: LogicalOp,
        left: Box<Criterion>,
        right: Box<Criterion>,
    },
}

impl Criterion {
    pub fn group(op: LogicalOp, left: Criterion, right: Criterion) -> Self {
        Criterion::Group {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(self, other: Criterion) -> Self {
        Self::group(LogicalOp::And, self, other)
    }

    pub fn or(self, other: Criterion) -> Self {
        Self::group(LogicalOp::Or, self, other)
    }

    /// Fold criteria into left-nested AND groups. `None` if the input is empty.
    pub fn all(criteria: impl IntoIterator<Item = Criterion>) -> Option<Self> {
        criteria.into_iter().reduce(Criterion::and)
    }

    /// Fold criteria into left-nested OR groups. `None` if the input is empty.
    pub fn any(criteria: impl IntoIterator<Item = Criterion>) -> Option<Self> {
        criteria.into_iter().reduce(Criterion::or)
    }

    /// Named parameters bound by this subtree, left to right.
    ///
    /// Fails with [`CritError::DuplicateParameterKey`] when two leaves share a
    /// key, which happens when one leaf is cloned into both sides of a group.
    pub fn parameters(&self) -> CritResult<ParameterMap> {
        let mut params = ParameterMap::new();
        self.collect_parameters(&mut params)?;
        Ok(params)
    }

    fn collect_parameters(&self, out: &mut ParameterMap) -> CritResult<()> {
        match self {
            Criterion::Compare(c) => bind(
                out,
                c.param_name(),
                BoundValue::new(c.value.clone(), c.field.host_type),
            ),
            Criterion::Like(p) => bind(
                out,
                p.param_name(),
                BoundValue::new(p.pattern.as_str(), p.field.host_type),
            ),
            Criterion::IsNull(_) | Criterion::In(_) => Ok(()),
            Criterion::Group { left, right, .. } => {
                left.collect_parameters(out)?;
                right.collect_parameters(out)
            }
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Criterion::Group { left, right, .. } => left.leaf_count() + right.leaf_count(),
            _ => 1,
        }
    }
}

fn bind(out: &mut ParameterMap, key: String, value: BoundValue) -> CritResult<()> {
    if out.contains_key(&key) {
        return Err(CritError::DuplicateParameterKey(key));
    }
    out.insert(key, value);
    Ok(())
}

impl From<Comparison> for Criterion {
    fn from(c: Comparison) -> Self {
        Criterion::Compare(c)
    }
}

impl From<NullCheck> for Criterion {
    fn from(n: NullCheck) -> Self {
        Criterion::IsNull(n)
    }
}

impl From<SetMembership> for Criterion {
    fn from(s: SetMembership) -> Self {
        Criterion::In(s)
    }
}

impl From<PatternMatch> for Criterion {
    fn from(p: PatternMatch) -> Self {
        Criterion::Like(p)
    }
}

impl BitAnd for Criterion {
    type Output = Criterion;

    fn bitand(self, rhs: Criterion) -> Criterion {
        self.and(rhs)
    }
}

impl BitOr for Criterion {
    type Output = Criterion;

    fn bitor(self, rhs: Criterion) -> Criterion {
        self.or(rhs)
    }
}
