use std::fmt;

use crate::diag::Position;

/// Classification of the "words" produced by `Scanner`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

/// Constant value attached to a literal token at scan time.
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Str(s) => write!(f, "{}", s),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Nil => write!(f, "nil"),
        }
    }
}

/// A classified, positioned unit of source text.
///
/// Immutable once created by the scanner; the parser and evaluator only
/// read (and clone) tokens.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: String, literal: Option<Literal>, line: Position) -> Token {
        Token {
            kind,
            lexeme,
            literal,
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{:?} {} {}", self.kind, self.lexeme, literal),
            None => write!(f, "{:?} {}", self.kind, self.lexeme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_token_without_literal() {
        let token = Token::new(TokenKind::Plus, "+".to_string(), None, 1);
        assert_eq!(token.to_string(), "Plus +");
    }

    #[test]
    fn display_token_with_literal() {
        let token = Token::new(
            TokenKind::Number,
            "42.0".to_string(),
            Some(Literal::Number(42.0)),
            1,
        );
        assert_eq!(token.to_string(), "Number 42.0 42");
    }

    #[test]
    fn integral_literal_drops_fraction() {
        assert_eq!(Literal::Number(3.0).to_string(), "3");
        assert_eq!(Literal::Number(3.14).to_string(), "3.14");
    }
}
