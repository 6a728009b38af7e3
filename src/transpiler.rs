//! SQL rendering for the criteria AST.
//!
//! Leaves render against named `@param` placeholders; the matching values
//! come from [`Criterion::parameters`].

use crate::ast::*;
use crate::value::Value;

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string.
    fn to_sql(&self) -> String;
}

/// Quote a string literal, doubling embedded single quotes.
pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl ToSql for Comparison {
    fn to_sql(&self) -> String {
        format!("{} {} @{}", self.field.name, self.op, self.param_name())
    }
}

impl ToSql for NullCheck {
    fn to_sql(&self) -> String {
        if self.negated {
            format!("{} IS NOT NULL", self.field.name)
        } else {
            format!("{} IS NULL", self.field.name)
        }
    }
}

impl ToSql for SetMembership {
    fn to_sql(&self) -> String {
        let items: Vec<String> = self.values.iter().map(inline_literal).collect();
        format!("{} {} ({})", self.field.name, self.op.as_str(), items.join(", "))
    }
}

impl ToSql for PatternMatch {
    fn to_sql(&self) -> String {
        let op = if self.negated { "NOT LIKE" } else { "LIKE" };
        let mut sql = format!("{} {} @{}", self.field.name, op, self.param_name());
        if let Some(c) = self.escape {
            sql.push_str(" ESCAPE ");
            sql.push_str(&escape_string(&c.to_string()));
        }
        sql
    }
}

impl ToSql for Criterion {
    fn to_sql(&self) -> String {
        match self {
            Criterion::Compare(c) => c.to_sql(),
            Criterion::IsNull(n) => n.to_sql(),
            Criterion::In(s) => s.to_sql(),
            Criterion::Like(p) => p.to_sql(),
            // Both sides are always wrapped so the tree shape survives
            // operator precedence.
            Criterion::Group { op, left, right } => {
                format!("({}) {} ({})", left.to_sql(), op, right.to_sql())
            }
        }
    }
}

impl ToSql for OrderingChain {
    fn to_sql(&self) -> String {
        let keys: Vec<String> = self
            .iter()
            .map(|node| format!("{} {}", node.field.name, node.order.as_str()))
            .collect();
        keys.join(", ")
    }
}

/// Literal text of an IN-list item.
///
/// Booleans are written as the `TRUE`/`FALSE` keywords here, while
/// [`crate::literal`] writes bound booleans as `1`/`0`.
fn inline_literal(value: &Value) -> String {
    if value.type_tag().is_some_and(|tag| tag.is_quoted()) {
        return escape_string(&value.to_string());
    }
    match value {
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Bytes(_) => format!("X'{}'", value),
        v => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;
    use crate::id::{SequentialIds, UniqueId};
    use crate::types::TypeTag;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn field(name: &str, tag: TypeTag) -> FieldRef {
        FieldDescriptor::new(name, tag).shared()
    }

    #[test]
    fn test_comparison() {
        let c = Comparison::new(ComparisonOp::Gte, field("Age", TypeTag::Int32), 18, UniqueId::from(5));
        assert_eq!(c.to_sql(), "Age >= @Age_5");
    }

    #[test]
    fn test_all_comparison_operators() {
        let crit = CriterionBuilder::new(SequentialIds::new());
        let f = field("N", TypeTag::Int32);
        let rendered: Vec<String> = [
            crit.eq(&f, 1),
            crit.ne(&f, 1),
            crit.lt(&f, 1),
            crit.lte(&f, 1),
            crit.gt(&f, 1),
            crit.gte(&f, 1),
        ]
        .iter()
        .map(ToSql::to_sql)
        .collect();
        assert_eq!(
            rendered,
            vec!["N = @N_1", "N <> @N_2", "N < @N_3", "N <= @N_4", "N > @N_5", "N >= @N_6"]
        );
    }

    #[test]
    fn test_null_checks() {
        let deleted = field("DeletedAt", TypeTag::DateTime);
        assert_eq!(NullCheck::new(deleted.clone()).to_sql(), "DeletedAt IS NULL");
        assert_eq!(NullCheck::not_null(deleted).to_sql(), "DeletedAt IS NOT NULL");
    }

    #[test]
    fn test_in_list_quotes_text() {
        let s = SetMembership::new(MembershipOp::In, field("Status", TypeTag::String), vec!["A", "B"])
            .unwrap();
        assert_eq!(s.to_sql(), "Status IN ('A', 'B')");
    }

    #[test]
    fn test_in_list_escapes_quotes() {
        let s = SetMembership::new(
            MembershipOp::NotIn,
            field("Name", TypeTag::String),
            vec!["O'Brien", "D'Arcy"],
        )
        .unwrap();
        assert_eq!(s.to_sql(), "Name NOT IN ('O''Brien', 'D''Arcy')");
    }

    #[test]
    fn test_in_list_raw_numbers_and_mixed_items() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let values = Value::List(vec![
            Value::Int(1),
            Value::Decimal(Decimal::new(250, 2)),
            Value::Null,
            Value::Bool(true),
            Value::Char('x'),
            Value::DateTime(day),
        ]);
        let s = SetMembership::new(MembershipOp::In, field("V", TypeTag::Int32), values).unwrap();
        assert_eq!(
            s.to_sql(),
            "V IN (1, 2.50, NULL, TRUE, 'x', '2024-03-05 00:00:00')"
        );
    }

    #[test]
    fn test_in_list_rejects_non_finite_floats() {
        let crit = CriterionBuilder::new(SequentialIds::new());
        let v = field("V", TypeTag::Double);
        assert!(crit.is_in(&v, [f64::NAN, 2.0]).is_err());
        assert!(crit.not_in(&v, [f64::INFINITY]).is_err());
        assert_eq!(crit.is_in(&v, [1.5, 1e21]).unwrap().to_sql(), "V IN (1.5, 1000000000000000000000)");
    }

    #[test]
    fn test_empty_in_list() {
        let s = SetMembership::new(MembershipOp::In, field("Id", TypeTag::Int32), Vec::<i32>::new())
            .unwrap();
        assert_eq!(s.to_sql(), "Id IN ()");
    }

    #[test]
    fn test_like_with_escape() {
        let name = field("Name", TypeTag::String);
        let plain = PatternMatch::new(name.clone(), "A%", UniqueId::from(1));
        assert_eq!(plain.to_sql(), "Name LIKE @Name_1");

        let escaped = PatternMatch::new(name.clone(), "100!%", UniqueId::from(2)).escape('!');
        assert_eq!(escaped.to_sql(), "Name LIKE @Name_2 ESCAPE '!'");

        let quote = PatternMatch::new(name, "x", UniqueId::from(3)).escape('\'').negate();
        assert_eq!(quote.to_sql(), "Name NOT LIKE @Name_3 ESCAPE ''''");
    }

    #[test]
    fn test_group_parenthesizes_both_sides() {
        let crit = CriterionBuilder::new(SequentialIds::new());
        let a = field("A", TypeTag::Int32);
        let b = field("B", TypeTag::Int32);
        let c = field("C", TypeTag::Int32);

        let tree = crit.eq(&a, 1).or(crit.eq(&b, 2)).and(crit.is_null(&c));
        assert_eq!(tree.to_sql(), "((A = @A_1) OR (B = @B_2)) AND (C IS NULL)");
    }

    #[test]
    fn test_ordering_precedence() {
        let a = field("fieldA", TypeTag::String);
        let b = field("fieldB", TypeTag::String);
        let chain = OrderingChain::new(a, true, Some(OrderingChain::new(b, false, None)));
        assert_eq!(chain.to_sql(), "fieldA ASC, fieldB DESC");
    }

    #[test]
    fn test_ordering_keeps_repeated_fields() {
        let a = field("A", TypeTag::String);
        let chain = OrderingChain::asc(a.clone()).then_desc(a);
        assert_eq!(chain.to_sql(), "A ASC, A DESC");
    }
}
