use critsql::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn field(name: &str, tag: TypeTag) -> FieldRef {
    FieldDescriptor::new(name, tag).shared()
}

#[test]
fn test_comparison_scenario() {
    let crit = CriterionBuilder::new(SequentialIds::starting_at(42));
    let age = field("Age", TypeTag::Int32);

    let c = crit.gte(&age, 18);
    assert_eq!(c.to_sql(), "Age >= @Age_42");

    let params = c.parameters().unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params["Age_42"], BoundValue::new(18, TypeTag::Int32));
}

#[test]
fn test_set_membership_scenario() {
    let crit = CriterionBuilder::new(SequentialIds::new());
    let status = field("Status", TypeTag::String);

    let c = crit.is_in(&status, ["A", "B"]).unwrap();
    assert_eq!(c.to_sql(), "Status IN ('A', 'B')");
    assert!(c.parameters().unwrap().is_empty());
}

#[test]
fn test_null_check_scenario() {
    let crit = CriterionBuilder::new(SequentialIds::new());
    let deleted = field("DeletedAt", TypeTag::DateTime);
    assert_eq!(crit.is_null(&deleted).to_sql(), "DeletedAt IS NULL");
}

#[test]
fn test_ordering_scenario() {
    let inner = OrderingChain::new(field("fieldB", TypeTag::Int32), false, None);
    let outer = OrderingChain::new(field("fieldA", TypeTag::Int32), true, Some(inner));
    assert_eq!(outer.to_sql(), "fieldA ASC, fieldB DESC");
}

#[test]
fn test_full_round_trip_to_literal_sql() {
    let crit = CriterionBuilder::new(SequentialIds::new());
    let name = field("Name", TypeTag::String);
    let born = field("BornAt", TypeTag::DateTime);
    let score = field("Score", TypeTag::Decimal);
    let active = field("Active", TypeTag::Bool);

    let when = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(14, 7, 9)
        .unwrap();

    let filter = crit.eq(&name, "O'Brien")
        & (crit.lt(&born, when) | crit.gt(&score, 1234.5))
        & crit.eq(&active, true);
    let set = CriteriaSet::default()
        .filter(filter)
        .order_by(OrderingChain::desc(score.clone()));

    let cmd = set.apply("SELECT * FROM PEOPLE").unwrap();
    assert_eq!(
        cmd.to_literal_sql(),
        "SELECT * FROM PEOPLE WHERE ((Name = 'O''Brien' /* @Name_1 */) AND \
         ((BornAt < '2024-03-05 14:07:09' /* @BornAt_2 */) OR (Score > 1234.50 /* @Score_3 */))) AND \
         (Active = 1 /* @Active_4 */) ORDER BY Score DESC"
    );
}

#[test]
fn test_firebird_parameters_from_criteria() {
    let crit = CriterionBuilder::new(SequentialIds::new());
    let active = field("Active", TypeTag::Bool);
    let params = crit.eq(&active, false).parameters().unwrap();

    let fb = Firebird::new();
    let collection = fb.parameters(&params);
    assert_eq!(collection.get("Active_1").unwrap().type_name, "BOOLEAN");

    // The same field cannot become a column.
    assert!(fb.ddl_type(&active).is_err());
}

#[test]
fn test_random_ids_never_collide_across_builders() {
    let a = CriterionBuilder::new(RandomIds);
    let b = CriterionBuilder::new(RandomIds);
    let id = field("Id", TypeTag::Int64);

    let tree = a.eq(&id, 1) | b.eq(&id, 1);
    assert_eq!(tree.parameters().unwrap().len(), 2);
}

fn leaf_tree(n: usize, ops: &[bool]) -> Criterion {
    let crit = CriterionBuilder::new(SequentialIds::new());
    let f = field("F", TypeTag::Int32);
    let leaves = (0..n).map(|i| crit.eq(&f, i as i64));
    leaves
        .enumerate()
        .reduce(|(i, acc), (_, leaf)| {
            let tree = if ops.get(i).copied().unwrap_or(true) {
                acc.and(leaf)
            } else {
                acc.or(leaf)
            };
            (i + 1, tree)
        })
        .map(|(_, tree)| tree)
        .unwrap()
}

proptest! {
    #[test]
    fn prop_distinct_leaves_give_distinct_keys(n in 1usize..40, ops in proptest::collection::vec(any::<bool>(), 0..40)) {
        let tree = leaf_tree(n, &ops);
        let params = tree.parameters().unwrap();
        prop_assert_eq!(params.len(), n);
        prop_assert_eq!(tree.leaf_count(), n);
    }

    #[test]
    fn prop_reused_leaf_is_always_rejected(n in 1usize..20, or in any::<bool>()) {
        let tree = leaf_tree(n, &[]);
        let dup = if or { tree.clone().or(tree) } else { tree.clone().and(tree) };
        prop_assert!(matches!(dup.parameters(), Err(CritError::DuplicateParameterKey(_))));
    }

    #[test]
    fn prop_group_sql_is_syntactic(x in 0i64..1000, y in 0i64..1000, or in any::<bool>()) {
        let crit = CriterionBuilder::new(SequentialIds::new());
        let f = field("F", TypeTag::Int64);
        let a = crit.eq(&f, x);
        let b = crit.ne(&f, y);
        let (expected_op, tree) = if or {
            ("OR", a.clone() | b.clone())
        } else {
            ("AND", a.clone() & b.clone())
        };
        prop_assert_eq!(
            tree.to_sql(),
            format!("({}) {} ({})", a.to_sql(), expected_op, b.to_sql())
        );
    }

    #[test]
    fn prop_quoted_escaped_round_trips(s in ".*") {
        let literal = critsql::literal::format_literal(LiteralCategory::QuotedEscaped, &Value::from(s.as_str()));
        prop_assert!(literal.starts_with('\'') && literal.ends_with('\''));
        let inner = &literal[1..literal.len() - 1];
        prop_assert_eq!(inner.replace("''", "'"), s);
    }

    #[test]
    fn prop_prefix_names_substitute_independently(a in 0i32..10_000, b in 0i32..10_000) {
        let mut params = ParameterMap::new();
        params.insert("id".into(), BoundValue::new(a, TypeTag::Int32));
        params.insert("id2".into(), BoundValue::new(b, TypeTag::Int32));
        let sql = critsql::render_literal("x = @id AND y = @id2", &params);
        prop_assert_eq!(sql, format!("x = {} /* @id */ AND y = {} /* @id2 */", a, b));
    }
}
