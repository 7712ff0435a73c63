//! Static analysis of decorated PostgreSQL DML statements.
//!
//! [`analyze`] takes a SQL statement written with `${name}` placeholders
//! and a [`Catalog`] snapshot, and produces a [`StatementDescription`]:
//! the statement's ordered input parameters and the shape of the rows it
//! returns. Resolving a statement's concrete parameter and output-column
//! *types* still requires a live backend, reached through the [`ProbeConn`]
//! capability — this crate never opens a connection itself.
//!
//! The pipeline, per the component design: [`preprocessor`] rewrites
//! `${name}` into positional `$n` markers, [`parser`] turns the rewritten
//! SQL into a [`Statement`], [`probe`] asks a live backend to `PREPARE` and
//! `DESCRIBE` it, [`inference`] resolves names against the [`catalog`] and
//! derives nullability and row cardinality, and [`assembler`] merges all of
//! it into the final [`StatementDescription`].

pub mod assembler;
pub mod ast;
pub mod catalog;
pub mod error;
pub mod inference;
pub mod lexer;
pub mod parser;
pub mod preprocessor;
pub mod probe;
pub mod statement;

pub use ast::Statement;
pub use catalog::Catalog;
pub use error::AnalyzerError;
pub use probe::ProbeConn;
pub use statement::StatementDescription;

use ast::{Expression, From, Join, JoinCondition, JoinKind, SelectListItem, StatementKind};
use assembler::assemble;
use inference::{classify_cardinality, infer_output_columns, non_null_set, Scope};
use parser::parse_statement;
use preprocessor::preprocess;
use probe::probe_statement;

/// Analyzes a single SQL statement against `catalog`, probing `probe` for
/// the authoritative parameter and output-column types.
///
/// # Errors
///
/// Returns [`AnalyzerError`] if the statement is malformed, uses SQL
/// outside the supported subset, references a table or column absent from
/// `catalog`, or if the probe itself fails.
pub fn analyze(
    sql: &str,
    catalog: &Catalog,
    probe: &mut dyn ProbeConn,
) -> Result<StatementDescription, AnalyzerError> {
    let preprocessed = preprocess(sql)?;
    let statement = parse_statement(&preprocessed.rewritten_sql)?;
    let probe_description = probe_statement(probe, &preprocessed.rewritten_sql)?;

    let (scope, where_clause, select_list) = query_shape(&statement.kind, catalog)?;
    let non_null = non_null_set(where_clause.as_ref());
    let output_columns = infer_output_columns(&select_list, &scope, catalog, &non_null)?;
    let cardinality = classify_cardinality(&statement.kind, catalog);

    assemble(&preprocessed.parameter_names, &probe_description, cardinality, output_columns)
}

/// The scope, `WHERE` clause, and output-column list a statement's
/// `RETURNING`/`SELECT` list should be resolved against — the piece of
/// §4.4's component design that differs per statement kind.
fn query_shape(
    kind: &StatementKind,
    catalog: &Catalog,
) -> Result<(Scope, Option<Expression>, Vec<SelectListItem>), AnalyzerError> {
    match kind {
        StatementKind::Select(select) => {
            let scope = match &select.body.from {
                Some(from) => Scope::build(from, catalog)?,
                None => Scope::new(),
            };
            Ok((scope, select.body.where_clause.clone(), select.body.select_list.clone()))
        }
        StatementKind::Insert(insert) => {
            let alias = insert.alias.clone().unwrap_or_else(|| insert.table.name.clone());
            let from = From {
                table: insert.table.clone(),
                alias: Some(alias),
                joins: vec![],
            };
            let scope = Scope::build(&from, catalog)?;
            Ok((scope, None, insert.returning.clone()))
        }
        StatementKind::Update(update) => {
            let alias = update.alias.clone().unwrap_or_else(|| update.table.name.clone());
            // `UPDATE ... FROM extra` brings `extra` into scope for
            // `RETURNING` the same way a plain join would, without itself
            // forcing any nullability — modeled here as an `Inner` join.
            let mut joins = Vec::new();
            if let Some(extra) = &update.from {
                joins.push(Join {
                    kind: JoinKind::Inner,
                    table: extra.table.clone(),
                    alias: extra.alias.clone(),
                    condition: JoinCondition::On(Expression::Constant("TRUE".to_string())),
                });
                joins.extend(extra.joins.clone());
            }
            let from = From {
                table: update.table.clone(),
                alias: Some(alias),
                joins,
            };
            let scope = Scope::build(&from, catalog)?;
            Ok((scope, update.where_clause.clone(), update.returning.clone()))
        }
        StatementKind::Delete(delete) => {
            let alias = delete.alias.clone().unwrap_or_else(|| delete.table.name.clone());
            let from = From {
                table: delete.table.clone(),
                alias: Some(alias),
                joins: vec![],
            };
            let scope = Scope::build(&from, catalog)?;
            Ok((scope, delete.where_clause.clone(), delete.returning.clone()))
        }
    }
}
