//! Name resolution over a `FROM`/`JOIN` clause and join-induced
//! nullability, per §4.4.1 and §4.4.2.

use super::InferenceError;
use crate::ast::{From, JoinKind};
use crate::catalog::{Catalog, Oid};

/// A column reachable in a `FROM` clause's scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    /// The alias or table name this column is reached through.
    pub table: String,
    pub column: String,
    pub type_oid: Oid,
    /// Whether the column's own catalog definition (or a domain layered on
    /// its type) allows NULL.
    pub column_nullable: bool,
    /// Whether the join topology can produce a NULL here even when the
    /// underlying column is `NOT NULL` — the outer side of a `LEFT`/
    /// `RIGHT`/`FULL` join.
    pub join_nullable: bool,
}

impl ColumnBinding {
    /// The column's effective nullability: nullable if either the column
    /// itself or the join topology can produce NULL.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.column_nullable || self.join_nullable
    }
}

/// The set of columns visible to expressions in a query body, built from
/// its `FROM`/`JOIN` clause.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: Vec<ColumnBinding>,
}

impl Scope {
    #[must_use]
    pub const fn new() -> Self {
        Self { bindings: Vec::new() }
    }

    #[must_use]
    pub fn bindings(&self) -> &[ColumnBinding] {
        &self.bindings
    }

    /// Builds a scope from a `FROM` clause, applying join-induced
    /// nullability cumulatively left to right: a `LEFT` join makes its
    /// right side nullable, a `RIGHT` join makes every table accumulated
    /// so far nullable, and a `FULL` join makes both sides nullable. Once a
    /// table is marked nullable by an earlier join it stays nullable for
    /// the rest of the scope.
    pub fn build(from: &From, catalog: &Catalog) -> Result<Self, InferenceError> {
        let mut scope = Self::new();
        let base_alias = from.alias.clone().unwrap_or_else(|| from.table.name.clone());
        scope.push_table(from.table.schema.as_deref(), &from.table.name, &base_alias, false, catalog)?;

        for join in &from.joins {
            match join.kind {
                JoinKind::Inner => {}
                JoinKind::Left => {}
                JoinKind::Right => scope.mark_all_nullable(),
                JoinKind::Full => scope.mark_all_nullable(),
            }
            let alias = join.alias.clone().unwrap_or_else(|| join.table.name.clone());
            let new_side_nullable = matches!(join.kind, JoinKind::Left | JoinKind::Full);
            scope.push_table(join.table.schema.as_deref(), &join.table.name, &alias, new_side_nullable, catalog)?;
        }

        Ok(scope)
    }

    fn push_table(
        &mut self,
        schema: Option<&str>,
        name: &str,
        alias: &str,
        join_nullable: bool,
        catalog: &Catalog,
    ) -> Result<(), InferenceError> {
        let table = catalog
            .find_table(schema, name)
            .ok_or_else(|| InferenceError::UnknownTable(name.to_string()))?;
        for column in &table.columns {
            let (_, domain_not_null) = catalog.resolve_domain(column.type_oid);
            self.bindings.push(ColumnBinding {
                table: alias.to_string(),
                column: column.name.clone(),
                type_oid: column.type_oid,
                column_nullable: column.nullable && !domain_not_null,
                join_nullable,
            });
        }
        Ok(())
    }

    fn mark_all_nullable(&mut self) {
        for binding in &mut self.bindings {
            binding.join_nullable = true;
        }
    }

    /// Resolves `table.column`.
    pub fn resolve_qualified(&self, table: &str, column: &str) -> Result<&ColumnBinding, InferenceError> {
        self.bindings
            .iter()
            .find(|b| b.table == table && b.column == column)
            .ok_or_else(|| InferenceError::UnknownColumn(format!("{table}.{column}")))
    }

    /// Resolves an unqualified column reference. A column reachable
    /// through more than one table in scope is ambiguous at the SQL level,
    /// but rather than fail analysis over it this returns the first match
    /// with its nullability forced to `true`: the analyzer cannot tell
    /// which table's value Postgres would actually return, so it reports
    /// the conservative answer instead of rejecting the statement.
    pub fn resolve_unqualified(&self, column: &str) -> Result<ColumnBinding, InferenceError> {
        let mut matches = self.bindings.iter().filter(|b| b.column == column);
        let first = matches.next().ok_or_else(|| InferenceError::UnknownColumn(column.to_string()))?;
        if matches.next().is_some() {
            return Ok(ColumnBinding {
                column_nullable: true,
                ..first.clone()
            });
        }
        Ok(first.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{From, Join, JoinCondition, TableRef};
    use crate::catalog::{Column, Table};

    fn catalog_with(tables: Vec<(&str, Vec<(&str, bool)>)>) -> Catalog {
        let mut catalog = Catalog::new(vec!["public".to_string()]);
        for (name, cols) in tables {
            catalog.tables.push(Table {
                schema: "public".to_string(),
                name: name.to_string(),
                columns: cols
                    .into_iter()
                    .map(|(n, nullable)| Column {
                        name: n.to_string(),
                        type_oid: 23,
                        nullable,
                        has_default: false,
                    })
                    .collect(),
                primary_key: vec![],
            });
        }
        catalog
    }

    fn dummy_expr() -> crate::ast::Expression {
        crate::ast::Expression::Constant("TRUE".to_string())
    }

    #[test]
    fn test_inner_join_does_not_add_nullability() {
        let catalog = catalog_with(vec![
            ("a", vec![("id", false)]),
            ("b", vec![("a_id", false)]),
        ]);
        let from = From {
            table: TableRef::unqualified("a"),
            alias: None,
            joins: vec![Join {
                kind: JoinKind::Inner,
                table: TableRef::unqualified("b"),
                alias: None,
                condition: JoinCondition::On(dummy_expr()),
            }],
        };
        let scope = Scope::build(&from, &catalog).unwrap();
        assert!(!scope.resolve_qualified("a", "id").unwrap().is_nullable());
        assert!(!scope.resolve_qualified("b", "a_id").unwrap().is_nullable());
    }

    #[test]
    fn test_left_join_makes_right_side_nullable() {
        let catalog = catalog_with(vec![
            ("a", vec![("id", false)]),
            ("b", vec![("a_id", false)]),
        ]);
        let from = From {
            table: TableRef::unqualified("a"),
            alias: None,
            joins: vec![Join {
                kind: JoinKind::Left,
                table: TableRef::unqualified("b"),
                alias: None,
                condition: JoinCondition::On(dummy_expr()),
            }],
        };
        let scope = Scope::build(&from, &catalog).unwrap();
        assert!(!scope.resolve_qualified("a", "id").unwrap().is_nullable());
        assert!(scope.resolve_qualified("b", "a_id").unwrap().is_nullable());
    }

    #[test]
    fn test_right_join_retroactively_nullifies_left_side() {
        let catalog = catalog_with(vec![
            ("a", vec![("id", false)]),
            ("b", vec![("a_id", false)]),
        ]);
        let from = From {
            table: TableRef::unqualified("a"),
            alias: None,
            joins: vec![Join {
                kind: JoinKind::Right,
                table: TableRef::unqualified("b"),
                alias: None,
                condition: JoinCondition::On(dummy_expr()),
            }],
        };
        let scope = Scope::build(&from, &catalog).unwrap();
        assert!(scope.resolve_qualified("a", "id").unwrap().is_nullable());
        assert!(!scope.resolve_qualified("b", "a_id").unwrap().is_nullable());
    }

    #[test]
    fn test_ambiguous_unqualified_column_resolves_conservatively_nullable() {
        let catalog = catalog_with(vec![
            ("a", vec![("id", false)]),
            ("b", vec![("id", false)]),
        ]);
        let from = From {
            table: TableRef::unqualified("a"),
            alias: None,
            joins: vec![Join {
                kind: JoinKind::Inner,
                table: TableRef::unqualified("b"),
                alias: None,
                condition: JoinCondition::On(dummy_expr()),
            }],
        };
        let scope = Scope::build(&from, &catalog).unwrap();
        // Ambiguous across `a.id`/`b.id`, both themselves `NOT NULL`: this
        // must still succeed, reporting the conservative `nullable = true`
        // rather than failing analysis.
        let binding = scope.resolve_unqualified("id").unwrap();
        assert!(binding.is_nullable());
    }
}
