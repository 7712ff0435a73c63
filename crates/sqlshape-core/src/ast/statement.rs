//! Statement AST, per §3 of the statement grammar.

use super::Expression;
use crate::lexer::Span;

/// A (possibly schema-qualified) table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    #[must_use]
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }
}

/// An item in a `SELECT` or `RETURNING` list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectListItem {
    /// `*`
    AllFields,
    /// `t.*`
    AllTableFields(String),
    /// An expression, with an optional `AS alias`.
    Expr(Expression, Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

/// The condition attached to a `JOIN`. `None` is only reachable for the
/// first table in a `FROM` list, never for a `Join` itself — the grammar
/// requires `ON` or `USING` on every explicit join.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinCondition {
    On(Expression),
    Using(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    pub alias: Option<String>,
    pub condition: JoinCondition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct From {
    pub table: TableRef,
    pub alias: Option<String>,
    pub joins: Vec<Join>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectBody {
    pub select_list: Vec<SelectListItem>,
    pub from: Option<From>,
    pub where_clause: Option<Expression>,
    pub group_by: Vec<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOpKind {
    Union,
    Intersect,
    Except,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duplicates {
    All,
    Distinct,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOp {
    pub kind: SelectOpKind,
    pub duplicates: Duplicates,
    pub body: SelectBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub expr: Expression,
    /// `ASC` / `DESC`, or `USING <op>` (the raw operator symbol).
    pub order: Option<OrderDirection>,
    pub using: Option<String>,
    pub nulls: Option<NullsOrder>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LimitCount {
    All,
    Expr(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub count: LimitCount,
    pub offset: Option<Expression>,
}

/// A non-recursive CTE. Its statement is always a `SELECT` — writable CTEs
/// (`INSERT`/`UPDATE`/`DELETE ... RETURNING` as a CTE body) are outside the
/// supported subset.
#[derive(Debug, Clone, PartialEq)]
pub struct WithQuery {
    pub name: String,
    pub columns: Option<Vec<String>>,
    pub statement: Box<Select>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub withs: Vec<WithQuery>,
    pub body: SelectBody,
    pub set_ops: Vec<SelectOp>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<Limit>,
}

/// A value in an `INSERT ... VALUES` row: either an expression or the bare
/// `DEFAULT` keyword for that cell.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertValue {
    Expr(Expression),
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// `DEFAULT VALUES`
    Default,
    Values(Vec<Vec<InsertValue>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub withs: Vec<WithQuery>,
    pub table: TableRef,
    pub alias: Option<String>,
    pub columns: Vec<String>,
    pub values: InsertSource,
    pub returning: Vec<SelectListItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub withs: Vec<WithQuery>,
    pub table: TableRef,
    pub alias: Option<String>,
    pub assignments: Vec<(String, Expression)>,
    pub from: Option<From>,
    pub where_clause: Option<Expression>,
    pub returning: Vec<SelectListItem>,
}

/// `DELETE` carries no `WITH` prefix of its own, per the AST's literal
/// shape in §3 (unlike `Insert`/`Update`, it has no `withs` field).
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: TableRef,
    pub alias: Option<String>,
    pub where_clause: Option<Expression>,
    pub returning: Vec<SelectListItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

/// The top-level parsed statement. Only the top level carries a source
/// span — nested nodes don't need one (§4.2 "AST location").
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

impl StatementKind {
    /// The `RETURNING` list, if this statement kind supports one and it
    /// was present. `Select` never has one.
    #[must_use]
    pub fn returning(&self) -> Option<&[SelectListItem]> {
        match self {
            Self::Select(_) => None,
            Self::Insert(i) => Some(&i.returning),
            Self::Update(u) => Some(&u.returning),
            Self::Delete(d) => Some(&d.returning),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ref_unqualified() {
        let t = TableRef::unqualified("person");
        assert_eq!(t.schema, None);
        assert_eq!(t.name, "person");
    }

    #[test]
    fn test_returning_empty_for_select() {
        let select = StatementKind::Select(Select::default());
        assert_eq!(select.returning(), None);
    }
}
