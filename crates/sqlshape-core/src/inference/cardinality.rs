//! Row-cardinality classification, per §4.4.6. Rules are applied in
//! order; the first that matches wins.

use crate::ast::{
    BinaryOp, Delete, Expression, Insert, InsertSource, LimitCount, Select, StatementKind, Update,
};
use crate::catalog::{is_aggregate_function, Catalog, Table};

/// How many rows a statement can return (`SELECT`/`... RETURNING`) or be
/// known to affect (`INSERT`/`UPDATE`/`DELETE` without `RETURNING`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Zero,
    One,
    ZeroOrOne,
    Many,
}

/// Classifies the row cardinality of `statement`.
#[must_use]
pub fn classify_cardinality(statement: &StatementKind, catalog: &Catalog) -> Cardinality {
    match statement {
        StatementKind::Select(select) => classify_select(select, catalog),
        StatementKind::Insert(insert) => classify_insert(insert),
        StatementKind::Update(update) => classify_update(update, catalog),
        StatementKind::Delete(delete) => classify_delete(delete, catalog),
    }
}

fn classify_insert(insert: &Insert) -> Cardinality {
    match &insert.values {
        InsertSource::Default => Cardinality::One,
        InsertSource::Values(rows) if rows.len() == 1 => Cardinality::One,
        InsertSource::Values(_) => Cardinality::Many,
    }
}

fn classify_update(update: &Update, catalog: &Catalog) -> Cardinality {
    if update.from.is_some() {
        return Cardinality::Many;
    }
    classify_single_table_predicate(update.where_clause.as_ref(), &update.table.name, catalog)
}

fn classify_delete(delete: &Delete, catalog: &Catalog) -> Cardinality {
    classify_single_table_predicate(delete.where_clause.as_ref(), &delete.table.name, catalog)
}

fn classify_select(select: &Select, catalog: &Catalog) -> Cardinality {
    if !select.set_ops.is_empty() {
        return Cardinality::Many;
    }
    if let Some(limit) = &select.limit {
        if let LimitCount::Expr(expr) = &limit.count {
            if is_literal_zero(expr) {
                return Cardinality::Zero;
            }
            if is_literal_one(expr) {
                return Cardinality::ZeroOrOne;
            }
        }
    }
    if is_false_literal(select.body.where_clause.as_ref()) {
        return Cardinality::Zero;
    }
    if select.body.group_by.is_empty() && is_pure_aggregate_select(select) {
        return Cardinality::One;
    }
    if select.body.group_by.is_empty() {
        if let Some(from) = &select.body.from {
            if from.joins.is_empty() {
                let cardinality =
                    classify_single_table_predicate(select.body.where_clause.as_ref(), &from.table.name, catalog);
                if cardinality != Cardinality::Many {
                    return cardinality;
                }
            }
        }
    }
    Cardinality::Many
}

fn is_pure_aggregate_select(select: &Select) -> bool {
    !select.body.select_list.is_empty()
        && select.body.select_list.iter().all(|item| match item {
            crate::ast::SelectListItem::Expr(Expression::FunctionCall(name, _), _) => {
                is_aggregate_function(name)
            }
            _ => false,
        })
}

fn is_false_literal(where_clause: Option<&Expression>) -> bool {
    matches!(where_clause, Some(Expression::Constant(text)) if text.eq_ignore_ascii_case("false"))
}

fn is_literal_zero(expr: &Expression) -> bool {
    matches!(expr, Expression::Constant(text) if text.trim() == "0")
}

fn is_literal_one(expr: &Expression) -> bool {
    matches!(expr, Expression::Constant(text) if text.trim() == "1")
}

/// A predicate classifies as a unique-row lookup when its top-level `AND`
/// conjuncts include an equality test against every primary-key column of
/// `table_name`.
fn classify_single_table_predicate(
    where_clause: Option<&Expression>,
    table_name: &str,
    catalog: &Catalog,
) -> Cardinality {
    let Some(table) = catalog.find_table(None, table_name) else {
        return Cardinality::Many;
    };
    if table.primary_key.is_empty() {
        return Cardinality::Many;
    }
    let Some(where_clause) = where_clause else {
        return Cardinality::Many;
    };
    let equated = equated_columns(where_clause);
    if primary_key_fully_equated(table, &equated) {
        Cardinality::ZeroOrOne
    } else {
        Cardinality::Many
    }
}

fn primary_key_fully_equated(table: &Table, equated: &[String]) -> bool {
    table.primary_key.iter().all(|pk| equated.iter().any(|c| c == pk))
}

fn equated_columns(expr: &Expression) -> Vec<String> {
    let mut out = Vec::new();
    collect_equated(expr, &mut out);
    out
}

fn collect_equated(expr: &Expression, out: &mut Vec<String>) {
    match expr {
        Expression::BinaryOp(lhs, BinaryOp::And, rhs) => {
            collect_equated(lhs, out);
            collect_equated(rhs, out);
        }
        Expression::BinaryOp(lhs, BinaryOp::Eq, rhs) => {
            if let Some(name) = column_name(lhs) {
                out.push(name);
            } else if let Some(name) = column_name(rhs) {
                out.push(name);
            }
        }
        _ => {}
    }
}

fn column_name(expr: &Expression) -> Option<String> {
    match expr {
        Expression::ColumnRef(name) | Expression::TableColumnRef(_, name) => Some(name.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Delete, From, Limit, SelectBody, TableRef};
    use crate::catalog::Column;

    fn catalog_with_pk() -> Catalog {
        let mut catalog = Catalog::new(vec!["public".to_string()]);
        catalog.tables.push(Table {
            schema: "public".to_string(),
            name: "person".to_string(),
            columns: vec![Column {
                name: "id".to_string(),
                type_oid: 23,
                nullable: false,
                has_default: true,
            }],
            primary_key: vec!["id".to_string()],
        });
        catalog
    }

    fn eq_id_param() -> Expression {
        Expression::BinaryOp(
            Box::new(Expression::ColumnRef("id".to_string())),
            BinaryOp::Eq,
            Box::new(Expression::Parameter(1)),
        )
    }

    #[test]
    fn test_delete_by_primary_key_is_zero_or_one() {
        let catalog = catalog_with_pk();
        let delete = Delete {
            table: TableRef::unqualified("person"),
            alias: None,
            where_clause: Some(eq_id_param()),
            returning: vec![],
        };
        assert_eq!(
            classify_cardinality(&StatementKind::Delete(delete), &catalog),
            Cardinality::ZeroOrOne
        );
    }

    #[test]
    fn test_delete_without_where_is_many() {
        let catalog = catalog_with_pk();
        let delete = Delete {
            table: TableRef::unqualified("person"),
            alias: None,
            where_clause: None,
            returning: vec![],
        };
        assert_eq!(
            classify_cardinality(&StatementKind::Delete(delete), &catalog),
            Cardinality::Many
        );
    }

    #[test]
    fn test_select_limit_zero_is_zero() {
        let catalog = catalog_with_pk();
        let select = Select {
            withs: vec![],
            body: SelectBody {
                select_list: vec![],
                from: Some(From {
                    table: TableRef::unqualified("person"),
                    alias: None,
                    joins: vec![],
                }),
                where_clause: None,
                group_by: vec![],
            },
            set_ops: vec![],
            order_by: vec![],
            limit: Some(Limit {
                count: LimitCount::Expr(Expression::Constant("0".to_string())),
                offset: None,
            }),
        };
        assert_eq!(
            classify_cardinality(&StatementKind::Select(select), &catalog),
            Cardinality::Zero
        );
    }

    #[test]
    fn test_select_limit_one_is_zero_or_one() {
        let catalog = catalog_with_pk();
        let select = Select {
            withs: vec![],
            body: SelectBody {
                select_list: vec![],
                from: Some(From {
                    table: TableRef::unqualified("person"),
                    alias: None,
                    joins: vec![],
                }),
                where_clause: None,
                group_by: vec![],
            },
            set_ops: vec![],
            order_by: vec![],
            limit: Some(Limit {
                count: LimitCount::Expr(Expression::Constant("1".to_string())),
                offset: None,
            }),
        };
        assert_eq!(
            classify_cardinality(&StatementKind::Select(select), &catalog),
            Cardinality::ZeroOrOne
        );
    }

    #[test]
    fn test_insert_single_row_is_one() {
        let insert = Insert {
            withs: vec![],
            table: TableRef::unqualified("person"),
            alias: None,
            columns: vec!["id".to_string()],
            values: InsertSource::Values(vec![vec![crate::ast::InsertValue::Expr(Expression::Parameter(1))]]),
            returning: vec![],
        };
        assert_eq!(classify_insert(&insert), Cardinality::One);
    }

    #[test]
    fn test_insert_multi_row_is_many() {
        let insert = Insert {
            withs: vec![],
            table: TableRef::unqualified("person"),
            alias: None,
            columns: vec!["id".to_string()],
            values: InsertSource::Values(vec![
                vec![crate::ast::InsertValue::Expr(Expression::Parameter(1))],
                vec![crate::ast::InsertValue::Expr(Expression::Parameter(2))],
            ]),
            returning: vec![],
        };
        assert_eq!(classify_insert(&insert), Cardinality::Many);
    }

    #[test]
    fn test_pure_aggregate_select_is_one() {
        let catalog = catalog_with_pk();
        let select = Select {
            withs: vec![],
            body: SelectBody {
                select_list: vec![crate::ast::SelectListItem::Expr(
                    Expression::FunctionCall("count".to_string(), vec![]),
                    None,
                )],
                from: Some(From {
                    table: TableRef::unqualified("person"),
                    alias: None,
                    joins: vec![],
                }),
                where_clause: None,
                group_by: vec![],
            },
            set_ops: vec![],
            order_by: vec![],
            limit: None,
        };
        assert_eq!(
            classify_cardinality(&StatementKind::Select(select), &catalog),
            Cardinality::One
        );
    }
}
