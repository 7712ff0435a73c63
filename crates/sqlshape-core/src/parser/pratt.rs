//! Binding-power tables for the expression parser's precedence climbing,
//! lowest to highest:
//!
//! 1. `OR`
//! 2. `AND`
//! 3. `NOT` (prefix)
//! 4. `IS`, `ISNULL`, `NOTNULL` (postfix)
//! 5. `< > = <= >= <>`
//! 6. `[NOT] IN`
//! 7. other operator symbols (`||`, `@>`, …)
//! 8. `+ -` (binary)
//! 9. `* / %`
//! 10. `-` (unary)
//! 11. `^`
//! 12. `[]` (subscript)
//! 13. `::`

use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// Binding power for a prefix operator: `(_, right_bp)`.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Keyword(Keyword::Not) => Some(6),
        TokenKind::Minus => Some(19),
        _ => None,
    }
}

/// Binding power for an infix operator: `(left_bp, right_bp)`. The parser's
/// loop compares a pending operator's `left_bp` against the recursive call's
/// `min_bp` with strict `<`, so a `right_bp` one higher than `left_bp` stops
/// the same operator from absorbing a same-precedence right-hand use of
/// itself — that's what makes `a + b + c` parse as `(a + b) + c` rather than
/// `a + (b + c)`. Left-associative operators therefore use `(bp, bp + 1)`;
/// a right-associative operator would instead use `(bp + 1, bp)`.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Keyword(Keyword::Or) => Some((2, 3)),
        TokenKind::Keyword(Keyword::And) => Some((4, 5)),
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => Some((8, 9)),
        TokenKind::Keyword(Keyword::In) => Some((10, 11)),
        TokenKind::OtherOp(_) | TokenKind::Concat => Some((12, 13)),
        TokenKind::Plus | TokenKind::Minus => Some((14, 15)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((16, 17)),
        TokenKind::Caret => Some((20, 21)),
        TokenKind::LeftBracket => Some((22, 23)),
        TokenKind::DoubleColon => Some((24, 25)),
        _ => None,
    }
}

/// Binding power for a postfix operator (`IS ...`, `ISNULL`, `NOTNULL`):
/// the minimum left binding power it can attach to.
#[must_use]
pub const fn postfix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Keyword(Keyword::Is)
        | TokenKind::Keyword(Keyword::Isnull)
        | TokenKind::Keyword(Keyword::Notnull) => Some(7),
        _ => None,
    }
}

/// Maps a token to the `BinaryOp` it spells, for tokens handled by
/// [`infix_binding_power`] other than `IN` and subscript (those need extra
/// parser-side structure and are built by the caller directly).
#[must_use]
pub fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Concat => Some(BinaryOp::Concat),
        TokenKind::OtherOp(sym) => Some(BinaryOp::Other(sym.clone())),
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Caret => Some(BinaryOp::Pow),
        TokenKind::DoubleColon => Some(BinaryOp::Cast),
        _ => None,
    }
}

/// Maps a prefix token to the `UnaryOp` it spells.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Keyword(Keyword::Not) => Some(UnaryOp::Not),
        TokenKind::Minus => Some(UnaryOp::Neg),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_binds_tighter_than_or() {
        let (_, or_r) = infix_binding_power(&TokenKind::Keyword(Keyword::Or)).unwrap();
        let (and_l, _) = infix_binding_power(&TokenKind::Keyword(Keyword::And)).unwrap();
        assert!(and_l > or_r);
    }

    #[test]
    fn test_mul_binds_tighter_than_add() {
        let (_, add_r) = infix_binding_power(&TokenKind::Plus).unwrap();
        let (mul_l, _) = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(mul_l > add_r);
    }

    #[test]
    fn test_cast_binds_tighter_than_arithmetic() {
        let (_, mul_r) = infix_binding_power(&TokenKind::Star).unwrap();
        let (cast_l, _) = infix_binding_power(&TokenKind::DoubleColon).unwrap();
        assert!(cast_l > mul_r);
    }

    #[test]
    fn test_cast_binds_tighter_than_subscript() {
        let (sub_l, _) = infix_binding_power(&TokenKind::LeftBracket).unwrap();
        let (cast_l, _) = infix_binding_power(&TokenKind::DoubleColon).unwrap();
        assert!(cast_l > sub_l);
    }

    #[test]
    fn test_left_associative_arithmetic() {
        let (l, r) = infix_binding_power(&TokenKind::Plus).unwrap();
        assert_eq!(r, l + 1);
    }

    #[test]
    fn test_token_to_binary_op_mapping() {
        assert_eq!(token_to_binary_op(&TokenKind::Plus), Some(BinaryOp::Add));
        assert_eq!(
            token_to_binary_op(&TokenKind::OtherOp("@>".into())),
            Some(BinaryOp::Other("@>".into()))
        );
    }

    #[test]
    fn test_token_to_unary_op_mapping() {
        assert_eq!(
            token_to_unary_op(&TokenKind::Keyword(Keyword::Not)),
            Some(UnaryOp::Not)
        );
        assert_eq!(token_to_unary_op(&TokenKind::Minus), Some(UnaryOp::Neg));
    }
}
