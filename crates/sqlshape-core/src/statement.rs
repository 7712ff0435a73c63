//! The analyzer's output type, per §3.

use serde::{Deserialize, Serialize};

use crate::catalog::Oid;

/// An input parameter, in `$1, $2, ...` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// The name given in the statement's `${name}` placeholder.
    pub name: String,
    pub type_oid: Oid,
    pub nullable: bool,
}

/// An output column, in `SELECT`/`RETURNING` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputColumn {
    pub name: String,
    pub type_oid: Oid,
    pub nullable: bool,
}

/// How many rows a statement can return, per §4.4.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowCardinality {
    Zero,
    One,
    ZeroOrOne,
    Many,
}

/// The complete inferred shape of a statement: its ordered input
/// parameters and its output shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDescription {
    pub parameters: Vec<Parameter>,
    pub cardinality: RowCardinality,
    pub columns: Vec<OutputColumn>,
}
