//! Shared fixtures for `sqlshape-core`'s end-to-end tests: a scripted
//! `ProbeConn` fake and small catalog-building helpers.

#![allow(dead_code)]

use sqlshape_core::catalog::{Catalog, Column, Oid, Table};
use sqlshape_core::probe::{ProbeConn, ProbeDescription};
use sqlshape_core::AnalyzerError;

/// A `ProbeConn` that returns a canned `ProbeDescription` for every
/// statement, standing in for a live backend's `PREPARE`/`DESCRIBE`.
pub struct ScriptedProbe {
    pub description: ProbeDescription,
}

impl ScriptedProbe {
    #[must_use]
    pub fn new(parameter_types: Vec<Oid>, output_columns: Vec<(&str, Oid)>) -> Self {
        Self {
            description: ProbeDescription {
                parameter_types,
                output_columns: output_columns
                    .into_iter()
                    .map(|(name, oid)| (name.to_string(), oid))
                    .collect(),
            },
        }
    }
}

impl ProbeConn for ScriptedProbe {
    fn prepare(&mut self, _sql: &str) -> Result<String, AnalyzerError> {
        Ok("handle".to_string())
    }

    fn describe(&mut self, _handle: &str) -> Result<ProbeDescription, AnalyzerError> {
        Ok(self.description.clone())
    }

    fn deallocate(&mut self, _handle: &str) -> Result<(), AnalyzerError> {
        Ok(())
    }
}

pub const INT4: Oid = 23;
pub const TEXT: Oid = 25;
pub const BOOL: Oid = 16;

#[must_use]
pub fn column(name: &str, type_oid: Oid, nullable: bool, has_default: bool) -> Column {
    Column {
        name: name.to_string(),
        type_oid,
        nullable,
        has_default,
    }
}

#[must_use]
pub fn table(name: &str, columns: Vec<Column>, primary_key: &[&str]) -> Table {
    Table {
        schema: "public".to_string(),
        name: name.to_string(),
        columns,
        primary_key: primary_key.iter().map(|s| (*s).to_string()).collect(),
    }
}

#[must_use]
pub fn catalog(tables: Vec<Table>) -> Catalog {
    let mut catalog = Catalog::new(vec!["public".to_string()]);
    catalog.tables = tables;
    catalog
}

/// A two-table `author`/`book` catalog used by the join and `WHERE`
/// propagation scenarios: `book.author_id` is `NOT NULL`, `book.blurb` is
/// nullable.
#[must_use]
pub fn author_book_catalog() -> Catalog {
    catalog(vec![
        table(
            "author",
            vec![
                column("id", INT4, false, true),
                column("name", TEXT, false, false),
            ],
            &["id"],
        ),
        table(
            "book",
            vec![
                column("id", INT4, false, true),
                column("author_id", INT4, false, false),
                column("title", TEXT, false, false),
                column("blurb", TEXT, true, false),
            ],
            &["id"],
        ),
    ])
}
