use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_infer_uses_first_non_null_value() {
    let batch = RowBatch::new(
        vec!["ID".into(), "Price".into(), "Note".into(), "Blank".into()],
        vec![
            vec![Value::Int32(1), Value::Null, Value::Null, Value::Null],
            vec![
                Value::Int32(2),
                Value::Float64(9.5),
                Value::String("x".into()),
                Value::Null,
            ],
        ],
    );

    assert_eq!(infer_column_types(&batch), vec!["INTEGER", "REAL", "TEXT", "TEXT"]);
}

#[test]
fn test_decimal_columns_are_text() {
    let batch = RowBatch::new(
        vec!["Amount".into()],
        vec![vec![Value::Null], vec![Value::Decimal("19.9900".into())]],
    );

    assert_eq!(infer_column_types(&batch), vec!["TEXT"]);
}

#[test]
fn test_create_table_sql_quotes_names() {
    let batch = RowBatch::new(
        vec!["Order ID".into(), "Shipped".into()],
        vec![vec![Value::Int64(1), Value::Bool(true)]],
    );

    assert_eq!(
        create_table_sql("Order Details", &batch),
        "CREATE TABLE \"Order Details\" (\"Order ID\" INTEGER, \"Shipped\" INTEGER)"
    );
}

#[test]
fn test_insert_sql_has_one_placeholder_per_column() {
    let columns = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    assert_eq!(
        insert_sql("t", &columns),
        "INSERT INTO \"t\" (\"a\", \"b\", \"c\") VALUES (?, ?, ?)"
    );
}
