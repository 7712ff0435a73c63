//! Orchestrates scope resolution and nullability inference into the
//! ordered output-column list, per §4.4 and §4.5.

use super::nonnull::NonNullSet;
use super::{expression_nullable, Scope};
use crate::ast::{Expression, SelectListItem};
use crate::catalog::{Catalog, Oid};
use crate::error::AnalyzerError;

/// A single output column's inferred shape, before the probe's authoritative
/// type is merged in by the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredColumn {
    pub name: String,
    pub type_oid: Oid,
    pub nullable: bool,
}

/// Expands a `SELECT`/`RETURNING` list into its ordered output columns.
///
/// # Errors
///
/// Returns [`AnalyzerError::Inference`] if a column reference fails to
/// resolve, and [`AnalyzerError::UserSchema`] if a bare parameter
/// placeholder appears directly as an output column — the analyzer has no
/// catalog-derived type or nullability to report for it.
pub fn infer_output_columns(
    items: &[SelectListItem],
    scope: &Scope,
    catalog: &Catalog,
    non_null: &NonNullSet,
) -> Result<Vec<InferredColumn>, AnalyzerError> {
    let mut columns = Vec::new();
    for item in items {
        match item {
            SelectListItem::AllFields => {
                for binding in scope.bindings() {
                    columns.push(InferredColumn {
                        name: binding.column.clone(),
                        type_oid: binding.type_oid,
                        nullable: binding.is_nullable()
                            && !non_null.contains(&(binding.table.clone(), binding.column.clone())),
                    });
                }
            }
            SelectListItem::AllTableFields(table) => {
                for binding in scope.bindings().iter().filter(|b| &b.table == table) {
                    columns.push(InferredColumn {
                        name: binding.column.clone(),
                        type_oid: binding.type_oid,
                        nullable: binding.is_nullable()
                            && !non_null.contains(&(binding.table.clone(), binding.column.clone())),
                    });
                }
            }
            SelectListItem::Expr(expr, alias) => {
                if matches!(expr, Expression::Parameter(_)) {
                    return Err(AnalyzerError::UserSchema(
                        "a bare parameter cannot stand directly as an output column; cast it to a concrete type"
                            .to_string(),
                    ));
                }
                let name = alias.clone().unwrap_or_else(|| display_name(expr));
                let nullable = expression_nullable(expr, scope, catalog, non_null)?;
                let type_oid = output_type_oid(expr, scope);
                columns.push(InferredColumn { name, type_oid, nullable });
            }
        }
    }
    Ok(columns)
}

/// The output column name Postgres would assign an unaliased expression:
/// a bare column reference keeps its name, anything else is unnamed here
/// and left for the probe's `DESCRIBE` result to supply (`?column?`-style
/// names are a `tokio-postgres` / wire-protocol concern, not this crate's).
fn display_name(expr: &Expression) -> String {
    match expr {
        Expression::ColumnRef(name) | Expression::TableColumnRef(_, name) => name.clone(),
        Expression::FunctionCall(name, _) => name.clone(),
        _ => String::new(),
    }
}

/// A best-effort static type for an output expression, used only until the
/// assembler overwrites it with the probe's authoritative `DESCRIBE` type
/// (§4.5) — column references already know their type from the catalog,
/// everything else defaults to "unknown" (oid 0) and relies on the probe.
fn output_type_oid(expr: &Expression, scope: &Scope) -> Oid {
    match expr {
        Expression::ColumnRef(name) => scope
            .resolve_unqualified(name)
            .map(|b| b.type_oid)
            .unwrap_or(0),
        Expression::TableColumnRef(table, column) => scope
            .resolve_qualified(table, column)
            .map(|b| b.type_oid)
            .unwrap_or(0),
        _ => 0,
    }
}
