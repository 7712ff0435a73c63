//! Hand-maintained operator and function nullability classification
//! tables, per the Design Notes: the analyzer does not introspect
//! `pg_operator`/`pg_proc` volatility or strictness, it ships a static
//! table of the built-ins the supported grammar can actually call.

/// How an operator's result nullability depends on its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    /// Result is NULL iff either operand is NULL (the default for the vast
    /// majority of Postgres operators).
    NullSafe,
    /// Result is never NULL (the `IS [NOT] ...`, `ISNULL`, `NOTNULL`
    /// family).
    NeverNull,
    /// Three-valued `AND`: NULL only propagates if no operand is `FALSE`.
    LogicalAnd,
    /// Three-valued `OR`: NULL only propagates if no operand is `TRUE`.
    LogicalOr,
}

/// How a function's result nullability depends on its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionClass {
    /// Result is NULL iff any argument is NULL (the default).
    NullSafe,
    /// Result is never NULL, regardless of arguments (aggregates like
    /// `count`).
    NeverNull,
    /// Result is NULL iff *all* arguments are NULL (`coalesce`).
    AllNull,
}

/// Classifies a binary operator by its source symbol (see
/// [`crate::ast::BinaryOp::symbol`]). Operators outside the supported
/// grammar's built-in set default to [`OperatorClass::NullSafe`], the
/// sound default for an unrecognized strict operator.
#[must_use]
pub fn classify_operator(symbol: &str) -> OperatorClass {
    match symbol {
        "AND" => OperatorClass::LogicalAnd,
        "OR" => OperatorClass::LogicalOr,
        _ => OperatorClass::NullSafe,
    }
}

/// Classifies a function by its lowercased name. Unknown functions default
/// to [`FunctionClass::NullSafe`].
#[must_use]
pub fn classify_function(name: &str) -> FunctionClass {
    match name.to_ascii_lowercase().as_str() {
        "count" | "concat" | "concat_ws" => FunctionClass::NeverNull,
        "coalesce" => FunctionClass::AllNull,
        _ => FunctionClass::NullSafe,
    }
}

/// Aggregate functions collapse a whole (ungrouped) result set to a single
/// row, used by row-cardinality classification (§4.4.6).
#[must_use]
pub fn is_aggregate_function(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "count" | "sum" | "avg" | "min" | "max"
    )
}
