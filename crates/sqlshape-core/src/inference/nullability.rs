//! Expression nullability, per the output-column rules of §4.4.4.

use super::nonnull::NonNullSet;
use super::{InferenceError, Scope};
use crate::ast::{BinaryOp, Expression, UnaryOp};
use crate::catalog::{classify_function, Catalog, FunctionClass};

fn proven_non_null(table: &str, column: &str, non_null: &NonNullSet) -> bool {
    non_null.contains(&(table.to_string(), column.to_string()))
        || non_null.contains(&(String::new(), column.to_string()))
}

/// Whether `expr` can evaluate to NULL, resolving column references
/// against `scope` and overriding with anything `non_null` (`NN(W)`) has
/// already proven.
///
/// # Errors
///
/// Returns [`InferenceError`] if a column reference cannot be resolved, or
/// is ambiguous.
pub fn expression_nullable(
    expr: &Expression,
    scope: &Scope,
    catalog: &Catalog,
    non_null: &NonNullSet,
) -> Result<bool, InferenceError> {
    match expr {
        Expression::ColumnRef(name) => {
            let binding = scope.resolve_unqualified(name)?;
            Ok(binding.is_nullable() && !proven_non_null(&binding.table, &binding.column, non_null))
        }
        Expression::TableColumnRef(table, column) => {
            let binding = scope.resolve_qualified(table, column)?;
            Ok(binding.is_nullable() && !proven_non_null(&binding.table, &binding.column, non_null))
        }
        Expression::Constant(text) => Ok(Expression::Constant(text.clone()).is_null_constant()),
        // Parameters are always non-null (§4.4.4): PostgreSQL requires a
        // bound value for every `$n` placeholder.
        Expression::Parameter(_) => Ok(false),
        Expression::FunctionCall(name, args) => {
            let classified = classify_function(name);
            let mut nullabilities = Vec::with_capacity(args.len());
            for arg in args {
                nullabilities.push(expression_nullable(arg, scope, catalog, non_null)?);
            }
            Ok(match classified {
                FunctionClass::NeverNull => false,
                FunctionClass::NullSafe => nullabilities.into_iter().any(|n| n),
                FunctionClass::AllNull => !nullabilities.is_empty() && nullabilities.into_iter().all(|n| n),
            })
        }
        Expression::UnaryOp(op, inner) => {
            if op.is_null_test() {
                Ok(false)
            } else {
                expression_nullable(inner, scope, catalog, non_null)
            }
        }
        Expression::BinaryOp(lhs, BinaryOp::Cast, _) => expression_nullable(lhs, scope, catalog, non_null),
        Expression::BinaryOp(lhs, _, rhs) => {
            let l = expression_nullable(lhs, scope, catalog, non_null)?;
            if l {
                return Ok(true);
            }
            expression_nullable(rhs, scope, catalog, non_null)
        }
        Expression::InOp(lhs, _, _) => expression_nullable(lhs, scope, catalog, non_null),
        Expression::ExistsOp(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{From, TableRef};
    use crate::catalog::{Catalog, Column, Table};

    fn scope_with_columns(nullable: bool) -> Scope {
        let mut catalog = Catalog::new(vec!["public".to_string()]);
        catalog.tables.push(Table {
            schema: "public".to_string(),
            name: "t".to_string(),
            columns: vec![Column {
                name: "a".to_string(),
                type_oid: 23,
                nullable,
                has_default: false,
            }],
            primary_key: vec![],
        });
        let from = From {
            table: TableRef::unqualified("t"),
            alias: None,
            joins: vec![],
        };
        Scope::build(&from, &catalog).unwrap()
    }

    #[test]
    fn test_not_null_column_is_not_nullable() {
        let scope = scope_with_columns(false);
        let catalog = Catalog::new(vec![]);
        let expr = Expression::ColumnRef("a".to_string());
        assert!(!expression_nullable(&expr, &scope, &catalog, &NonNullSet::new()).unwrap());
    }

    #[test]
    fn test_nullable_column_is_nullable() {
        let scope = scope_with_columns(true);
        let catalog = Catalog::new(vec![]);
        let expr = Expression::ColumnRef("a".to_string());
        assert!(expression_nullable(&expr, &scope, &catalog, &NonNullSet::new()).unwrap());
    }

    #[test]
    fn test_where_proof_overrides_nullable_column() {
        let scope = scope_with_columns(true);
        let catalog = Catalog::new(vec![]);
        let expr = Expression::ColumnRef("a".to_string());
        let mut non_null = NonNullSet::new();
        non_null.insert(("t".to_string(), "a".to_string()));
        assert!(!expression_nullable(&expr, &scope, &catalog, &non_null).unwrap());
    }

    #[test]
    fn test_parameter_is_never_nullable() {
        let scope = scope_with_columns(true);
        let catalog = Catalog::new(vec![]);
        let expr = Expression::Parameter(1);
        assert!(!expression_nullable(&expr, &scope, &catalog, &NonNullSet::new()).unwrap());
    }

    #[test]
    fn test_is_null_test_never_nullable() {
        let scope = scope_with_columns(true);
        let catalog = Catalog::new(vec![]);
        let expr = Expression::UnaryOp(
            UnaryOp::IsNull,
            Box::new(Expression::ColumnRef("a".to_string())),
        );
        assert!(!expression_nullable(&expr, &scope, &catalog, &NonNullSet::new()).unwrap());
    }

    #[test]
    fn test_count_is_never_null() {
        let scope = scope_with_columns(true);
        let catalog = Catalog::new(vec![]);
        let expr = Expression::FunctionCall("count".to_string(), vec![]);
        assert!(!expression_nullable(&expr, &scope, &catalog, &NonNullSet::new()).unwrap());
    }

    #[test]
    fn test_coalesce_requires_all_null() {
        let scope = scope_with_columns(true);
        let catalog = Catalog::new(vec![]);
        let expr = Expression::FunctionCall(
            "coalesce".to_string(),
            vec![
                Expression::ColumnRef("a".to_string()),
                Expression::Constant("0".to_string()),
            ],
        );
        assert!(!expression_nullable(&expr, &scope, &catalog, &NonNullSet::new()).unwrap());
    }
}
