//! Shared diagnostic vocabulary for the scanner, parser and evaluator.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Line number (starting at one).
pub type Position = u32;

/// A formatted, positioned error report.
///
/// The scanner and parser each accumulate an ordered list of these instead
/// of aborting on the first problem.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Diagnostic {
    line: Position,
    location: String,
    message: String,
}

impl Diagnostic {
    /// Diagnostic without a location hint, as reported by the scanner.
    pub fn new(line: Position, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            line,
            location: String::new(),
            message: message.into(),
        }
    }

    /// Diagnostic pointing at a token, as reported by the parser.
    pub fn at_token(token: &Token, message: impl Into<String>) -> Diagnostic {
        let location = if token.kind == TokenKind::Eof {
            " at end".to_string()
        } else {
            format!(" at '{}'", token.lexeme)
        };
        Diagnostic {
            line: token.line,
            location,
            message: message.into(),
        }
    }

    pub fn line(&self) -> Position {
        self.line
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[line {}] Error{}: {}",
            self.line, self.location, self.message
        )
    }
}

/// Raised by the parser when a required token is missing.
///
/// The top-level declaration loop catches it, records the diagnostic and
/// resynchronizes to the next statement boundary.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("{0}")]
pub struct SyntaxError(pub Diagnostic);

/// Fault raised while evaluating a program.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Type mismatch or undefined variable; carries the offending token so
    /// the report names the right line.
    #[error("[line {}] Error: {message}", .token.line)]
    Fault { token: Token, message: String },

    /// The output sink failed while printing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RuntimeError {
    pub fn fault(token: &Token, message: impl Into<String>) -> RuntimeError {
        RuntimeError::Fault {
            token: token.clone(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_style_diagnostic() {
        let diag = Diagnostic::new(3, "Unexpected character.");
        assert_eq!(diag.to_string(), "[line 3] Error: Unexpected character.");
    }

    #[test]
    fn parser_diagnostic_at_lexeme() {
        let token = Token::new(TokenKind::Plus, "+".to_string(), None, 2);
        let diag = Diagnostic::at_token(&token, "Expect expression.");
        assert_eq!(diag.to_string(), "[line 2] Error at '+': Expect expression.");
    }

    #[test]
    fn parser_diagnostic_at_end() {
        let token = Token::new(TokenKind::Eof, String::new(), None, 7);
        let diag = Diagnostic::at_token(&token, "Expect ';' after value.");
        assert_eq!(
            diag.to_string(),
            "[line 7] Error at end: Expect ';' after value."
        );
    }

    #[test]
    fn runtime_fault_reports_token_line() {
        let token = Token::new(TokenKind::Minus, "-".to_string(), None, 4);
        let fault = RuntimeError::fault(&token, "Operand must be a number.");
        assert_eq!(
            fault.to_string(),
            "[line 4] Error: Operand must be a number."
        );
    }
}
