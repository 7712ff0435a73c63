//! The inference engine: scope resolution, join-induced and WHERE-induced
//! nullability, row-cardinality classification, per §4.4.

mod cardinality;
mod engine;
mod nonnull;
mod nullability;
mod scope;

pub use cardinality::{classify_cardinality, Cardinality};
pub use engine::{infer_output_columns, InferredColumn};
pub use nonnull::non_null_set;
pub use nullability::expression_nullable;
pub use scope::{ColumnBinding, Scope};

use thiserror::Error;

/// An error raised while resolving names or classifying nullability
/// against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("ambiguous column reference '{0}'")]
    AmbiguousColumn(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
}
