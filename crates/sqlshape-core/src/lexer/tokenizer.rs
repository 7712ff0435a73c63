//! Tokenizer for the preprocessed SQL source.

use super::{Keyword, Span, Token, TokenKind};

const OP_CHARS: &str = "+-*/<>=~!@#%^&|?";

/// Scans preprocessed SQL source (placeholders already rewritten to `$n`)
/// into a stream of tokens.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    start: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                self.advance();
                self.advance();
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let text = &self.input[self.start..self.pos];
        if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            self.make_token(TokenKind::Identifier(text.to_ascii_lowercase()))
        }
    }

    /// Scans a `"quoted identifier"` with `\"` and `\\` escapes, per §4.2.
    fn scan_quoted_identifier(&mut self) -> Token {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some(c) => value.push(c),
                        None => {
                            return self.make_token(TokenKind::Error(
                                "unterminated quoted identifier".into(),
                            ));
                        }
                    }
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    return self.make_token(TokenKind::Error(
                        "unterminated quoted identifier".into(),
                    ));
                }
            }
        }
        self.make_token(TokenKind::Identifier(value))
    }

    /// Scans a `'string literal'` with backslash escapes, per §4.1. The
    /// token's text is the raw source slice including the surrounding
    /// quotes — nullability only ever compares it against `NULL`, never
    /// decodes its value.
    fn scan_string(&mut self) -> Token {
        self.advance(); // opening quote
        loop {
            match self.peek() {
                Some('\\') => {
                    self.advance();
                    if self.advance().is_none() {
                        return self
                            .make_token(TokenKind::Error("unterminated string literal".into()));
                    }
                }
                Some('\'') => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
                None => {
                    return self
                        .make_token(TokenKind::Error("unterminated string literal".into()));
                }
            }
        }
        let text = self.input[self.start..self.pos].to_string();
        self.make_token(TokenKind::String(text))
    }

    fn scan_number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = self.input[self.start..self.pos].to_string();
        self.make_token(TokenKind::Number(text))
    }

    /// Scans a `$n` positional parameter placeholder.
    fn scan_parameter(&mut self) -> Token {
        self.advance(); // $
        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let digits = &self.input[digits_start..self.pos];
        if digits.is_empty() {
            return self.make_token(TokenKind::Error("expected digits after '$'".into()));
        }
        match digits.parse::<usize>() {
            Ok(n) if n >= 1 => self.make_token(TokenKind::Parameter(n)),
            _ => self.make_token(TokenKind::Error(format!("invalid parameter index '${digits}'"))),
        }
    }

    fn scan_operator(&mut self) -> Token {
        while self.peek().is_some_and(|c| OP_CHARS.contains(c)) {
            self.advance();
        }
        let text = &self.input[self.start..self.pos];
        let kind = match text {
            "+" => TokenKind::Plus,
            "-" => TokenKind::Minus,
            "*" => TokenKind::Star,
            "/" => TokenKind::Slash,
            "%" => TokenKind::Percent,
            "^" => TokenKind::Caret,
            "||" => TokenKind::Concat,
            "::" => TokenKind::DoubleColon,
            "=" => TokenKind::Eq,
            "!=" | "<>" => TokenKind::NotEq,
            "<" => TokenKind::Lt,
            "<=" => TokenKind::LtEq,
            ">" => TokenKind::Gt,
            ">=" => TokenKind::GtEq,
            other => TokenKind::OtherOp(other.to_string()),
        };
        self.make_token(kind)
    }

    /// Scans and returns the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let c = match self.peek() {
            Some(c) => c,
            None => return self.make_token(TokenKind::Eof),
        };

        match c {
            '(' => {
                self.advance();
                self.make_token(TokenKind::LeftParen)
            }
            ')' => {
                self.advance();
                self.make_token(TokenKind::RightParen)
            }
            '[' => {
                self.advance();
                self.make_token(TokenKind::LeftBracket)
            }
            ']' => {
                self.advance();
                self.make_token(TokenKind::RightBracket)
            }
            ',' => {
                self.advance();
                self.make_token(TokenKind::Comma)
            }
            ';' => {
                self.advance();
                self.make_token(TokenKind::Semicolon)
            }
            '.' if !self.peek_next().is_some_and(|c| c.is_ascii_digit()) => {
                self.advance();
                self.make_token(TokenKind::Dot)
            }
            '\'' => self.scan_string(),
            '"' => self.scan_quoted_identifier(),
            '$' => self.scan_parameter(),
            c if c.is_ascii_digit() || c == '.' => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),
            c if OP_CHARS.contains(c) => self.scan_operator(),
            other => {
                self.advance();
                self.make_token(TokenKind::Error(format!("unexpected character: {other}")))
            }
        }
    }

    /// Tokenizes the entire input.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }
}
