//! The typed AST produced by the parser, per §3 of the statement grammar.

mod expression;
mod statement;

pub use expression::{BinaryOp, Expression, InOpKind, UnaryOp};
pub use statement::{
    Delete, Duplicates, From, Insert, InsertSource, InsertValue, Join, JoinCondition, JoinKind,
    Limit, LimitCount, NullsOrder, OrderBy, OrderDirection, Select, SelectBody, SelectListItem,
    SelectOp, SelectOpKind, Statement, StatementKind, TableRef, Update, WithQuery,
};
