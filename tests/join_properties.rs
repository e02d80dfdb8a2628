//! Join row counts, column layout and write-through

mod common;

use std::sync::Arc;
use common::{display, keyed_table, load_fixture, table};
use tabjoin::model::{DataType, FieldColumn};
use tabjoin::{
    build_joined_table, BuildContext, BuildError, ColumnError, JoinPolicy, Record, RecordRef, Table, Value,
};

fn join(sources: &[Arc<Table<RecordRef>>], policy: JoinPolicy) -> Table<tabjoin::CombinedRow<RecordRef>> {
    build_joined_table(sources, policy, &BuildContext::detached()).expect("Join should succeed")
}

#[test]
fn test_duplicate_keys_multiply() {
    let catalog = load_fixture("inventory.yaml");
    let sources = vec![
        table(&catalog, "stock"),
        table(&catalog, "orders"),
        table(&catalog, "suppliers"),
    ];

    // p1: 2 × 2 × 1, p2: 1 × 1 × absent, p4: 1 × absent × 1, p3: absent × 1 × 1
    let full = join(&sources, JoinPolicy::Full);
    let inner = join(&sources, JoinPolicy::Inner);
    let diff = join(&sources, JoinPolicy::Diff);
    let outer = join(&sources, JoinPolicy::Outer);

    assert_eq!(full.row_count(), 7);
    assert_eq!(inner.row_count(), 4);
    assert_eq!(diff.row_count(), full.row_count() - inner.row_count());
    assert_eq!(outer.row_count(), 6);

    assert_eq!(display(&full, "sku"), vec!["p1", "p1", "p1", "p1", "p2", "p4", "p3"]);
    assert_eq!(display(&diff, "sku"), vec!["p2", "p4", "p3"]);
}

#[test]
fn test_column_layout() {
    let catalog = load_fixture("inventory.yaml");
    let sources = vec![
        table(&catalog, "stock"),
        table(&catalog, "orders"),
        table(&catalog, "suppliers"),
    ];
    let inner = join(&sources, JoinPolicy::Inner);

    // `qty` exists on two sources; hidden columns are left out
    assert_eq!(
        inner.column_names(),
        vec!["sku", "stock_qty", "price", "value", "orders_qty", "customer", "supplier"]
    );
    assert_eq!(display(&inner, "stock_qty"), vec!["3", "3", "1", "1"]);
    assert_eq!(display(&inner, "customer"), vec!["ann", "bob", "ann", "bob"]);
    assert_eq!(display(&inner, "orders_qty"), vec!["two", "one", "two", "one"]);
    assert_eq!(display(&inner, "value"), vec!["7.50", "7.50", "2.50", "2.50"]);
    assert_eq!(display(&inner, "supplier"), vec!["acme"; 4]);
}

#[test]
fn test_unique_keys_inner_counts_common_keys() {
    let a = keyed_table("A", "v", &[(1, "a"), (2, "b"), (3, "c"), (4, "d")]);
    let b = keyed_table("B", "w", &[(4, "x"), (2, "y"), (9, "z")]);
    let inner = join(&[a, b], JoinPolicy::Inner);
    assert_eq!(display(&inner, "id"), vec!["2", "4"]);
}

#[test]
fn test_self_join_pairs_each_record_with_itself() {
    let a = keyed_table("A", "v", &[(1, "a"), (2, "b")]);
    let joined = join(&[a.clone(), a], JoinPolicy::Inner);

    assert_eq!(joined.row_count(), 2);
    assert_eq!(joined.column_names(), vec!["id", "A_v", "A_v_2"]);
    for row in joined.rows() {
        let slots = row.slots();
        assert!(Arc::ptr_eq(slots[0].as_ref().unwrap(), slots[1].as_ref().unwrap()));
    }
}

#[test]
fn test_keys_match_by_display_string() {
    let ints = keyed_table("ints", "v", &[(2, "int")]);
    let floats = Arc::new(
        Table::<RecordRef>::builder("floats")
            .key_column(Arc::new(FieldColumn::new("id", 0, DataType::Float)))
            .column(Arc::new(FieldColumn::new("w", 1, DataType::String)))
            .row(Record::new(vec![Value::Float(2.0), Value::from("float")]))
            .build(),
    );
    let text = Arc::new(
        Table::<RecordRef>::builder("text")
            .key_column(Arc::new(FieldColumn::new("id", 0, DataType::String)))
            .column(Arc::new(FieldColumn::new("x", 1, DataType::String)))
            .row(Record::new(vec![Value::from("2"), Value::from("text")]))
            .build(),
    );

    // "2" and "2.00" differ; "2" and "2" match across types
    assert_eq!(join(&[ints.clone(), floats], JoinPolicy::Inner).row_count(), 0);
    assert_eq!(join(&[ints, text], JoinPolicy::Inner).row_count(), 1);
}

#[test]
fn test_key_failure_aborts_build() {
    let good = keyed_table("good", "v", &[(1, "a")]);
    let ragged = Arc::new(
        Table::<RecordRef>::builder("ragged")
            .key_column(Arc::new(FieldColumn::new("id", 0, DataType::Int)))
            .row(Record::new(vec![Value::Int(1)]))
            .row(Record::new(vec![]))
            .build(),
    );

    let err = build_joined_table(&[good, ragged], JoinPolicy::Full, &BuildContext::detached()).unwrap_err();
    match err {
        BuildError::KeyComputation { table, row, column, source } => {
            assert_eq!(table, "ragged");
            assert_eq!(row, 1);
            assert_eq!(column, "id");
            assert!(matches!(source, ColumnError::MissingCell { .. }));
        }
        other => panic!("Expected key computation error, got {}", other),
    }
}

#[test]
fn test_writes_reach_source_records() {
    let a = keyed_table("A", "v", &[(1, "a"), (2, "b")]);
    let b = keyed_table("B", "w", &[(2, "x"), (3, "y")]);
    let full = join(&[a.clone(), b.clone()], JoinPolicy::Full);
    let v = full.column_index("v").unwrap();
    let w = full.column_index("w").unwrap();
    let id = full.column_index("id").unwrap();

    full.set_value(&full.rows()[1], w, Value::from("changed")).unwrap();
    assert_eq!(b.cell(0, "w").unwrap(), Value::from("changed"));

    // Row for key 3 has no record from A
    let err = full.set_value(&full.rows()[2], v, Value::from("nope")).unwrap_err();
    assert!(matches!(err, ColumnError::AbsentRecord { .. }));
    assert!(err.is_write_error());

    let err = full.set_value(&full.rows()[0], id, Value::Int(7)).unwrap_err();
    assert!(matches!(err, ColumnError::ReadOnly { .. }));
}

#[test]
fn test_joined_output_can_be_joined_again() {
    let a = keyed_table("A", "v", &[(1, "a"), (2, "b")]);
    let b = keyed_table("B", "w", &[(2, "x"), (3, "y")]);
    let full = Arc::new(join(&[a.clone(), b.clone()], JoinPolicy::Full));
    let inner = Arc::new(join(&[a, b], JoinPolicy::Inner));

    let nested = build_joined_table(&[full, inner], JoinPolicy::Inner, &BuildContext::detached()).unwrap();
    assert_eq!(nested.name(), "A+B+A+B");
    assert_eq!(display(&nested, "id"), vec!["2"]);
    assert_eq!(nested.column_names(), vec!["id", "A+B_v", "A+B_w", "A+B_v_2", "A+B_w_2"]);
}
