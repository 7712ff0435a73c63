//! End-to-end coverage of `INSERT`/`UPDATE`/`DELETE ... RETURNING`, §4.4.5.

mod common;

use common::{author_book_catalog, ScriptedProbe, INT4, TEXT};
use sqlshape_core::analyze;
use sqlshape_core::statement::RowCardinality;

#[test]
fn test_insert_returning_reports_generated_id_as_not_null() {
    let catalog = author_book_catalog();
    let mut probe = ScriptedProbe::new(vec![INT4, TEXT], vec![("id", INT4)]);
    let description = analyze(
        "INSERT INTO author (id, name) VALUES (${id}, ${name}) RETURNING id",
        &catalog,
        &mut probe,
    )
    .unwrap();
    assert_eq!(description.cardinality, RowCardinality::One);
    assert!(!description.columns[0].nullable);
    assert!(!description.parameters[0].nullable);
    assert!(!description.parameters[1].nullable);
}

#[test]
fn test_update_without_returning_has_no_output_columns() {
    let catalog = author_book_catalog();
    let mut probe = ScriptedProbe::new(vec![TEXT, INT4], vec![]);
    let description = analyze(
        "UPDATE book SET title = ${title} WHERE id = ${id}",
        &catalog,
        &mut probe,
    )
    .unwrap();
    assert!(description.columns.is_empty());
    assert_eq!(description.cardinality, RowCardinality::ZeroOrOne);
}

#[test]
fn test_delete_returning_reflects_deleted_row_shape() {
    let catalog = author_book_catalog();
    let mut probe = ScriptedProbe::new(vec![INT4], vec![("id", INT4), ("blurb", TEXT)]);
    let description = analyze(
        "DELETE FROM book WHERE id = ${id} RETURNING id, blurb",
        &catalog,
        &mut probe,
    )
    .unwrap();
    assert_eq!(description.cardinality, RowCardinality::ZeroOrOne);
    assert!(!description.columns[0].nullable);
    assert!(description.columns[1].nullable);
}
