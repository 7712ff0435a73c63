//! Recursive-descent parser with Pratt expression parsing, per §4.2.

use super::error::ParseError;
use super::pratt::{
    infix_binding_power, postfix_binding_power, prefix_binding_power, token_to_binary_op,
    token_to_unary_op,
};
use crate::ast::{
    BinaryOp, Delete, Duplicates, Expression, From, Insert, InsertSource, InsertValue, Join,
    JoinCondition, JoinKind, Limit, LimitCount, NullsOrder, OrderBy, OrderDirection, Select,
    SelectBody, SelectListItem, SelectOp, SelectOpKind, Statement, StatementKind, TableRef,
    UnaryOp, Update, WithQuery,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// Parses a preprocessed statement (placeholders already rewritten to
/// `$n`) into its top-level [`Statement`].
///
/// # Errors
///
/// Returns [`ParseError`] on any syntax error, including use of a reserved
/// word as an unquoted identifier.
pub fn parse_statement(sql: &str) -> Result<Statement, ParseError> {
    Parser::new(sql).parse()
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    #[must_use]
    pub fn new(sql: &str) -> Self {
        Self {
            tokens: Lexer::new(sql).tokenize(),
            pos: 0,
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check_error_token(&self) -> Result<(), ParseError> {
        if let TokenKind::Error(message) = self.current_kind() {
            return Err(ParseError::new(self.current_span(), message.clone(), "invalid token"));
        }
        Ok(())
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(self.current_kind(), TokenKind::Keyword(k) if *k == kw)
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<(), ParseError> {
        self.check_error_token()?;
        if self.eat_keyword(kw) {
            Ok(())
        } else {
            Err(self.error_unexpected(&[kw.as_str()]))
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, label: &str) -> Result<(), ParseError> {
        self.check_error_token()?;
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error_unexpected(&[label]))
        }
    }

    fn error_unexpected(&self, expected: &[&str]) -> ParseError {
        let found = describe_token(self.current_kind());
        if matches!(self.current_kind(), TokenKind::Eof) {
            ParseError::unexpected_eof(self.current_span(), expected)
        } else {
            ParseError::unexpected(self.current_span(), expected, found)
        }
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        self.check_error_token()?;
        match self.current_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            TokenKind::Keyword(kw) => Err(ParseError::new(
                self.current_span(),
                format!("reserved word '{}' used as an identifier", kw.as_str()),
                kw.as_str(),
            )),
            _ => Err(self.error_unexpected(&["identifier"])),
        }
    }

    fn parse_identifier_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.parse_identifier()?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.parse_identifier()?);
        }
        Ok(names)
    }

    /// Parses the whole source: one statement, an optional trailing `;`,
    /// then end of input.
    fn parse(mut self) -> Result<Statement, ParseError> {
        let start = self.current_span().start;
        let kind = self.parse_statement_kind()?;
        self.eat(&TokenKind::Semicolon);
        if !matches!(self.current_kind(), TokenKind::Eof) {
            return Err(self.error_unexpected(&["end of statement"]));
        }
        let end = self.previous_span().end;
        Ok(Statement {
            kind,
            span: Span::new(start, end),
        })
    }

    fn parse_statement_kind(&mut self) -> Result<StatementKind, ParseError> {
        self.check_error_token()?;
        if self.check_keyword(Keyword::With) {
            let withs = self.parse_with_list()?;
            return match self.current_kind() {
                TokenKind::Keyword(Keyword::Select) => {
                    Ok(StatementKind::Select(self.parse_select_tail(withs)?))
                }
                TokenKind::Keyword(Keyword::Insert) => {
                    Ok(StatementKind::Insert(self.parse_insert(withs)?))
                }
                TokenKind::Keyword(Keyword::Update) => {
                    Ok(StatementKind::Update(self.parse_update(withs)?))
                }
                _ => Err(self.error_unexpected(&["SELECT", "INSERT", "UPDATE"])),
            };
        }
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Select) => {
                Ok(StatementKind::Select(self.parse_select_tail(Vec::new())?))
            }
            TokenKind::Keyword(Keyword::Insert) => {
                Ok(StatementKind::Insert(self.parse_insert(Vec::new())?))
            }
            TokenKind::Keyword(Keyword::Update) => {
                Ok(StatementKind::Update(self.parse_update(Vec::new())?))
            }
            TokenKind::Keyword(Keyword::Delete) => Ok(StatementKind::Delete(self.parse_delete()?)),
            _ => Err(self.error_unexpected(&["WITH", "SELECT", "INSERT", "UPDATE", "DELETE"])),
        }
    }

    fn parse_with_list(&mut self) -> Result<Vec<WithQuery>, ParseError> {
        self.expect_keyword(Keyword::With)?;
        let mut withs = Vec::new();
        loop {
            let name = self.parse_identifier()?;
            let columns = if self.eat(&TokenKind::LeftParen) {
                let cols = self.parse_identifier_list()?;
                self.expect(&TokenKind::RightParen, ")")?;
                Some(cols)
            } else {
                None
            };
            self.expect_keyword(Keyword::As)?;
            self.expect(&TokenKind::LeftParen, "(")?;
            let statement = self.parse_select_tail(Vec::new())?;
            self.expect(&TokenKind::RightParen, ")")?;
            withs.push(WithQuery {
                name,
                columns,
                statement: Box::new(statement),
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(withs)
    }

    /// Parses a `SELECT` statement assuming any leading `WITH` clause has
    /// already been consumed (its queries are passed in as `withs`).
    fn parse_select_tail(&mut self, withs: Vec<WithQuery>) -> Result<Select, ParseError> {
        let body = self.parse_select_body()?;
        let mut set_ops = Vec::new();
        loop {
            let kind = if self.eat_keyword(Keyword::Union) {
                SelectOpKind::Union
            } else if self.eat_keyword(Keyword::Intersect) {
                SelectOpKind::Intersect
            } else if self.eat_keyword(Keyword::Except) {
                SelectOpKind::Except
            } else {
                break;
            };
            let duplicates = if self.eat_keyword(Keyword::All) {
                Duplicates::All
            } else {
                self.eat_keyword(Keyword::Distinct);
                Duplicates::Distinct
            };
            let next_body = self.parse_select_body()?;
            set_ops.push(SelectOp {
                kind,
                duplicates,
                body: next_body,
            });
        }
        let order_by = if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            Vec::new()
        };
        let limit = self.parse_limit_offset()?;
        Ok(Select {
            withs,
            body,
            set_ops,
            order_by,
            limit,
        })
    }

    fn parse_select_body(&mut self) -> Result<SelectBody, ParseError> {
        self.expect_keyword(Keyword::Select)?;
        if !self.eat_keyword(Keyword::All) {
            self.eat_keyword(Keyword::Distinct);
        }
        let select_list = self.parse_select_list()?;
        let from = if self.eat_keyword(Keyword::From) {
            Some(self.parse_from()?)
        } else {
            None
        };
        let where_clause = if self.eat_keyword(Keyword::Where) {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let group_by = if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        Ok(SelectBody {
            select_list,
            from,
            where_clause,
            group_by,
        })
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Expression>, ParseError> {
        let mut exprs = vec![self.parse_expr(0)?];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.parse_expr(0)?);
        }
        Ok(exprs)
    }

    fn parse_select_list(&mut self) -> Result<Vec<SelectListItem>, ParseError> {
        let mut items = vec![self.parse_select_list_item()?];
        while self.eat(&TokenKind::Comma) {
            items.push(self.parse_select_list_item()?);
        }
        Ok(items)
    }

    fn parse_select_list_item(&mut self) -> Result<SelectListItem, ParseError> {
        if self.check(&TokenKind::Star) {
            self.advance();
            return Ok(SelectListItem::AllFields);
        }
        if let TokenKind::Identifier(name) = self.current_kind().clone() {
            if matches!(self.peek_kind(1), TokenKind::Dot) && matches!(self.peek_kind(2), TokenKind::Star)
            {
                self.advance();
                self.advance();
                self.advance();
                return Ok(SelectListItem::AllTableFields(name));
            }
        }
        let expr = self.parse_expr(0)?;
        let alias = self.parse_optional_alias()?;
        Ok(SelectListItem::Expr(expr, alias))
    }

    fn parse_optional_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat_keyword(Keyword::As) {
            return Ok(Some(self.parse_identifier()?));
        }
        if matches!(self.current_kind(), TokenKind::Identifier(_)) {
            return Ok(Some(self.parse_identifier()?));
        }
        Ok(None)
    }

    fn parse_table_ref(&mut self) -> Result<TableRef, ParseError> {
        let first = self.parse_identifier()?;
        if self.eat(&TokenKind::Dot) {
            let second = self.parse_identifier()?;
            Ok(TableRef {
                schema: Some(first),
                name: second,
            })
        } else {
            Ok(TableRef::unqualified(first))
        }
    }

    fn parse_from(&mut self) -> Result<From, ParseError> {
        let table = self.parse_table_ref()?;
        let alias = self.parse_optional_alias()?;
        let mut joins = Vec::new();
        loop {
            let kind = if self.eat_keyword(Keyword::Join) {
                JoinKind::Inner
            } else if self.eat_keyword(Keyword::Inner) {
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Inner
            } else if self.eat_keyword(Keyword::Left) {
                self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Left
            } else if self.eat_keyword(Keyword::Right) {
                self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Right
            } else if self.eat_keyword(Keyword::Full) {
                self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Full
            } else {
                break;
            };
            let jtable = self.parse_table_ref()?;
            let jalias = self.parse_optional_alias()?;
            let condition = if self.eat_keyword(Keyword::On) {
                JoinCondition::On(self.parse_expr(0)?)
            } else if self.eat_keyword(Keyword::Using) {
                self.expect(&TokenKind::LeftParen, "(")?;
                let cols = self.parse_identifier_list()?;
                self.expect(&TokenKind::RightParen, ")")?;
                JoinCondition::Using(cols)
            } else {
                return Err(self.error_unexpected(&["ON", "USING"]));
            };
            joins.push(Join {
                kind,
                table: jtable,
                alias: jalias,
                condition,
            });
        }
        Ok(From { table, alias, joins })
    }

    fn parse_order_by_list(&mut self) -> Result<Vec<OrderBy>, ParseError> {
        let mut items = vec![self.parse_order_by_item()?];
        while self.eat(&TokenKind::Comma) {
            items.push(self.parse_order_by_item()?);
        }
        Ok(items)
    }

    fn parse_order_by_item(&mut self) -> Result<OrderBy, ParseError> {
        let expr = self.parse_expr(0)?;
        let order = if self.eat_keyword(Keyword::Asc) {
            Some(OrderDirection::Asc)
        } else if self.eat_keyword(Keyword::Desc) {
            Some(OrderDirection::Desc)
        } else {
            None
        };
        let using = if self.eat_keyword(Keyword::Using) {
            Some(self.parse_operator_symbol()?)
        } else {
            None
        };
        let nulls = if self.eat_keyword(Keyword::Nulls) {
            if self.eat_keyword(Keyword::First) {
                Some(NullsOrder::First)
            } else if self.eat_keyword(Keyword::Last) {
                Some(NullsOrder::Last)
            } else {
                return Err(self.error_unexpected(&["FIRST", "LAST"]));
            }
        } else {
            None
        };
        Ok(OrderBy {
            expr,
            order,
            using,
            nulls,
        })
    }

    fn parse_operator_symbol(&mut self) -> Result<String, ParseError> {
        let symbol = match self.current_kind() {
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Eq => "=",
            TokenKind::NotEq => "<>",
            TokenKind::OtherOp(sym) => {
                let sym = sym.clone();
                self.advance();
                return Ok(sym);
            }
            _ => return Err(self.error_unexpected(&["operator"])),
        }
        .to_string();
        self.advance();
        Ok(symbol)
    }

    fn parse_limit_offset(&mut self) -> Result<Option<Limit>, ParseError> {
        let count = if self.eat_keyword(Keyword::Limit) {
            if self.eat_keyword(Keyword::All) {
                Some(LimitCount::All)
            } else {
                Some(LimitCount::Expr(self.parse_expr(0)?))
            }
        } else {
            None
        };
        let offset = if self.eat_keyword(Keyword::Offset) {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        if count.is_none() && offset.is_none() {
            return Ok(None);
        }
        Ok(Some(Limit {
            count: count.unwrap_or(LimitCount::All),
            offset,
        }))
    }

    fn parse_insert(&mut self, withs: Vec<WithQuery>) -> Result<Insert, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_table_ref()?;
        let alias = self.parse_optional_alias()?;
        let columns = if self.eat(&TokenKind::LeftParen) {
            let cols = self.parse_identifier_list()?;
            self.expect(&TokenKind::RightParen, ")")?;
            cols
        } else {
            Vec::new()
        };
        let values = if self.eat_keyword(Keyword::Default) {
            self.expect_keyword(Keyword::Values)?;
            InsertSource::Default
        } else {
            self.expect_keyword(Keyword::Values)?;
            InsertSource::Values(self.parse_insert_rows()?)
        };
        let returning = if self.eat_keyword(Keyword::Returning) {
            self.parse_select_list()?
        } else {
            Vec::new()
        };
        Ok(Insert {
            withs,
            table,
            alias,
            columns,
            values,
            returning,
        })
    }

    fn parse_insert_rows(&mut self) -> Result<Vec<Vec<InsertValue>>, ParseError> {
        let mut rows = vec![self.parse_insert_row()?];
        while self.eat(&TokenKind::Comma) {
            rows.push(self.parse_insert_row()?);
        }
        Ok(rows)
    }

    fn parse_insert_row(&mut self) -> Result<Vec<InsertValue>, ParseError> {
        self.expect(&TokenKind::LeftParen, "(")?;
        let mut values = vec![self.parse_insert_value()?];
        while self.eat(&TokenKind::Comma) {
            values.push(self.parse_insert_value()?);
        }
        self.expect(&TokenKind::RightParen, ")")?;
        Ok(values)
    }

    fn parse_insert_value(&mut self) -> Result<InsertValue, ParseError> {
        if self.eat_keyword(Keyword::Default) {
            Ok(InsertValue::Default)
        } else {
            Ok(InsertValue::Expr(self.parse_expr(0)?))
        }
    }

    fn parse_update(&mut self, withs: Vec<WithQuery>) -> Result<Update, ParseError> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_table_ref()?;
        let alias = self.parse_optional_alias()?;
        self.expect_keyword(Keyword::Set)?;
        let mut assignments = vec![self.parse_assignment()?];
        while self.eat(&TokenKind::Comma) {
            assignments.push(self.parse_assignment()?);
        }
        let from = if self.eat_keyword(Keyword::From) {
            Some(self.parse_from()?)
        } else {
            None
        };
        let where_clause = if self.eat_keyword(Keyword::Where) {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let returning = if self.eat_keyword(Keyword::Returning) {
            self.parse_select_list()?
        } else {
            Vec::new()
        };
        Ok(Update {
            withs,
            table,
            alias,
            assignments,
            from,
            where_clause,
            returning,
        })
    }

    fn parse_assignment(&mut self) -> Result<(String, Expression), ParseError> {
        let column = self.parse_identifier()?;
        self.expect(&TokenKind::Eq, "=")?;
        let expr = if self.eat_keyword(Keyword::Default) {
            Expression::Constant("DEFAULT".to_string())
        } else {
            self.parse_expr(0)?
        };
        Ok((column, expr))
    }

    fn parse_delete(&mut self) -> Result<Delete, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_table_ref()?;
        let alias = self.parse_optional_alias()?;
        let where_clause = if self.eat_keyword(Keyword::Where) {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let returning = if self.eat_keyword(Keyword::Returning) {
            self.parse_select_list()?
        } else {
            Vec::new()
        };
        Ok(Delete {
            table,
            alias,
            where_clause,
            returning,
        })
    }

    // --- expressions ---------------------------------------------------

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expression, ParseError> {
        self.check_error_token()?;
        let mut lhs = self.parse_prefix()?;
        loop {
            if self.check_keyword(Keyword::Not) && matches!(self.peek_kind(1), TokenKind::Keyword(Keyword::In))
            {
                if 10 < min_bp {
                    break;
                }
                self.advance();
                self.advance();
                lhs = self.parse_in_tail(lhs, crate::ast::InOpKind::NotIn)?;
                continue;
            }
            if self.check_keyword(Keyword::In) {
                if 10 < min_bp {
                    break;
                }
                self.advance();
                lhs = self.parse_in_tail(lhs, crate::ast::InOpKind::In)?;
                continue;
            }
            if let Some(bp) = postfix_binding_power(self.current_kind()) {
                if bp < min_bp {
                    break;
                }
                lhs = self.parse_postfix(lhs)?;
                continue;
            }
            if self.check(&TokenKind::LeftBracket) {
                if 24 < min_bp {
                    break;
                }
                self.advance();
                let index = self.parse_expr(0)?;
                self.expect(&TokenKind::RightBracket, "]")?;
                lhs = Expression::BinaryOp(Box::new(lhs), BinaryOp::Subscript, Box::new(index));
                continue;
            }
            let Some((left_bp, right_bp)) = infix_binding_power(self.current_kind()) else {
                break;
            };
            if left_bp < min_bp {
                break;
            }
            let op_token = self.advance();
            let op = token_to_binary_op(&op_token.kind).ok_or_else(|| {
                ParseError::new(op_token.span, "not a binary operator", describe_token(&op_token.kind))
            })?;
            let rhs = self.parse_expr(right_bp)?;
            lhs = Expression::BinaryOp(Box::new(lhs), op, Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_in_tail(
        &mut self,
        lhs: Expression,
        kind: crate::ast::InOpKind,
    ) -> Result<Expression, ParseError> {
        self.expect(&TokenKind::LeftParen, "(")?;
        let subquery = self.parse_select_tail(Vec::new())?;
        self.expect(&TokenKind::RightParen, ")")?;
        Ok(Expression::InOp(Box::new(lhs), kind, Box::new(subquery)))
    }

    fn parse_postfix(&mut self, lhs: Expression) -> Result<Expression, ParseError> {
        if self.eat_keyword(Keyword::Isnull) {
            return Ok(Expression::UnaryOp(UnaryOp::IsNull, Box::new(lhs)));
        }
        if self.eat_keyword(Keyword::Notnull) {
            return Ok(Expression::UnaryOp(UnaryOp::IsNotNull, Box::new(lhs)));
        }
        self.expect_keyword(Keyword::Is)?;
        let negated = self.eat_keyword(Keyword::Not);
        let op = if self.eat_keyword(Keyword::Null) {
            if negated {
                UnaryOp::IsNotNull
            } else {
                UnaryOp::IsNull
            }
        } else if self.eat_keyword(Keyword::True) {
            if negated {
                UnaryOp::IsNotTrue
            } else {
                UnaryOp::IsTrue
            }
        } else if self.eat_keyword(Keyword::False) {
            if negated {
                UnaryOp::IsNotFalse
            } else {
                UnaryOp::IsFalse
            }
        } else if self.eat_keyword(Keyword::Unknown) {
            if negated {
                UnaryOp::IsNotUnknown
            } else {
                UnaryOp::IsUnknown
            }
        } else {
            return Err(self.error_unexpected(&["NULL", "TRUE", "FALSE", "UNKNOWN"]));
        };
        Ok(Expression::UnaryOp(op, Box::new(lhs)))
    }

    fn parse_prefix(&mut self) -> Result<Expression, ParseError> {
        self.check_error_token()?;
        if let Some(right_bp) = prefix_binding_power(self.current_kind()) {
            let op_token = self.advance();
            let op = token_to_unary_op(&op_token.kind).ok_or_else(|| {
                ParseError::new(op_token.span, "not a unary operator", describe_token(&op_token.kind))
            })?;
            let rhs = self.parse_expr(right_bp)?;
            return Ok(Expression::UnaryOp(op, Box::new(rhs)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        self.check_error_token()?;
        match self.current_kind().clone() {
            TokenKind::Number(text) => {
                self.advance();
                Ok(Expression::Constant(text))
            }
            TokenKind::String(text) => {
                self.advance();
                Ok(Expression::Constant(text))
            }
            TokenKind::Parameter(n) => {
                self.advance();
                Ok(Expression::Parameter(n))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expression::Constant("NULL".to_string()))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expression::Constant("TRUE".to_string()))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expression::Constant("FALSE".to_string()))
            }
            TokenKind::Keyword(Keyword::Exists) => {
                self.advance();
                self.expect(&TokenKind::LeftParen, "(")?;
                let subquery = self.parse_select_tail(Vec::new())?;
                self.expect(&TokenKind::RightParen, ")")?;
                Ok(Expression::ExistsOp(Box::new(subquery)))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expr(0)?;
                self.expect(&TokenKind::RightParen, ")")?;
                Ok(expr)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                if self.eat(&TokenKind::Dot) {
                    let column = self.parse_identifier()?;
                    Ok(Expression::TableColumnRef(name, column))
                } else if self.check(&TokenKind::LeftParen) {
                    self.advance();
                    let args = self.parse_call_args()?;
                    self.expect(&TokenKind::RightParen, ")")?;
                    Ok(Expression::FunctionCall(name, args))
                } else {
                    Ok(Expression::ColumnRef(name))
                }
            }
            _ => Err(self.error_unexpected(&["expression"])),
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expression>, ParseError> {
        if self.check(&TokenKind::RightParen) {
            return Ok(Vec::new());
        }
        if self.eat(&TokenKind::Star) {
            return Ok(Vec::new());
        }
        let mut args = vec![self.parse_expr(0)?];
        while self.eat(&TokenKind::Comma) {
            args.push(self.parse_expr(0)?);
        }
        Ok(args)
    }
}

fn describe_token(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(s) | TokenKind::String(s) | TokenKind::Identifier(s) => s.clone(),
        TokenKind::Keyword(kw) => kw.as_str().to_string(),
        TokenKind::Parameter(n) => format!("${n}"),
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Error(message) => message.clone(),
        other => format!("{other:?}"),
    }
}
