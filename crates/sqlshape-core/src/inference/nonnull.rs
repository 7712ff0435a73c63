//! `NN(W)`: the set of columns a `WHERE` clause proves non-null by virtue
//! of the predicate being true for every row the query can return, per
//! §4.4.3.
//!
//! Built as a monotone recursion over the predicate: `AND` takes the union
//! of what each conjunct proves (more evidence survives), `OR` takes the
//! intersection (only evidence both disjuncts agree on survives), and any
//! operator or function classified [`crate::catalog::OperatorClass::NullSafe`]
//! / [`crate::catalog::FunctionClass::NullSafe`] lets a non-null proof of
//! its result propagate down to every column it was built from.

use std::collections::HashSet;

use crate::ast::{BinaryOp, Expression, InOpKind, UnaryOp};
use crate::catalog::{classify_function, classify_operator, FunctionClass, OperatorClass};

/// A set of `(table, column)` pairs proven non-null.
pub type NonNullSet = HashSet<(String, String)>;

/// Computes `NN(W)` for an optional `WHERE` clause. `None` (no `WHERE`)
/// proves nothing.
#[must_use]
pub fn non_null_set(where_clause: Option<&Expression>) -> NonNullSet {
    where_clause.map(proven_non_null).unwrap_or_default()
}

fn leaf(expr: &Expression) -> Option<(String, String)> {
    match expr {
        Expression::ColumnRef(name) => Some((String::new(), name.clone())),
        Expression::TableColumnRef(table, column) => Some((table.clone(), column.clone())),
        _ => None,
    }
}

/// Collects every column reference an expression was built from, provided
/// every operator/function on the path from the expression's root down to
/// that leaf is null-safe — i.e. a proof that the expression's value is
/// non-null implies each of these leaves is too.
fn collect_null_safe_leaves(expr: &Expression, out: &mut NonNullSet) {
    if let Some(pair) = leaf(expr) {
        out.insert(pair);
        return;
    }
    match expr {
        Expression::UnaryOp(UnaryOp::Neg, inner) => collect_null_safe_leaves(inner, out),
        Expression::BinaryOp(lhs, BinaryOp::Cast, _) => collect_null_safe_leaves(lhs, out),
        Expression::BinaryOp(lhs, op, rhs) if classify_operator(op.symbol()) == OperatorClass::NullSafe => {
            collect_null_safe_leaves(lhs, out);
            collect_null_safe_leaves(rhs, out);
        }
        Expression::FunctionCall(name, args) if classify_function(name) == FunctionClass::NullSafe => {
            for arg in args {
                collect_null_safe_leaves(arg, out);
            }
        }
        _ => {}
    }
}

fn proven_non_null(expr: &Expression) -> NonNullSet {
    match expr {
        Expression::BinaryOp(lhs, BinaryOp::And, rhs) => {
            let mut set = proven_non_null(lhs);
            set.extend(proven_non_null(rhs));
            set
        }
        Expression::BinaryOp(lhs, BinaryOp::Or, rhs) => {
            let left = proven_non_null(lhs);
            let right = proven_non_null(rhs);
            left.intersection(&right).cloned().collect()
        }
        Expression::UnaryOp(UnaryOp::Not, inner) => {
            if let Expression::UnaryOp(UnaryOp::IsNull, target) = inner.as_ref() {
                let mut set = NonNullSet::new();
                collect_null_safe_leaves(target, &mut set);
                set
            } else {
                NonNullSet::new()
            }
        }
        Expression::UnaryOp(
            UnaryOp::IsNotNull | UnaryOp::IsTrue | UnaryOp::IsFalse | UnaryOp::IsNotUnknown,
            target,
        ) => {
            let mut set = NonNullSet::new();
            collect_null_safe_leaves(target, &mut set);
            set
        }
        Expression::BinaryOp(lhs, op, rhs)
            if matches!(
                op,
                BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq
            ) =>
        {
            let mut set = NonNullSet::new();
            collect_null_safe_leaves(lhs, &mut set);
            collect_null_safe_leaves(rhs, &mut set);
            set
        }
        Expression::InOp(lhs, InOpKind::In | InOpKind::NotIn, _) => {
            let mut set = NonNullSet::new();
            collect_null_safe_leaves(lhs, &mut set);
            set
        }
        _ => NonNullSet::new(),
    }
}
