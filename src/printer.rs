//! Parenthesized rendering of expression trees.
//!
//! Mostly a debugging aid: `1 + 2 * 3` renders as `(+ 1 (* 2 3))`, which
//! makes grouping mistakes obvious at a glance.

use crate::ast::Expr;

pub fn print(expr: &Expr) -> String {
    match expr {
        Expr::Literal(literal) => literal.to_string(),
        Expr::Grouping(inner) => parenthesize("group", &[inner]),
        Expr::Unary { operator, right } => parenthesize(&operator.lexeme, &[right]),
        Expr::Binary {
            left,
            operator,
            right,
        } => parenthesize(&operator.lexeme, &[left, right]),
        Expr::Logical {
            left,
            operator,
            right,
        } => parenthesize(&operator.lexeme, &[left, right]),
        Expr::Variable(name) => name.lexeme.clone(),
        Expr::Assign { name, value } => parenthesize(&format!("= {}", name.lexeme), &[value]),
    }
}

fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
    let mut out = String::new();
    out.push('(');
    out.push_str(name);
    for expr in exprs {
        out.push(' ');
        out.push_str(&print(expr));
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Literal, Token, TokenKind};

    fn token(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme.to_string(), None, 1)
    }

    #[test]
    fn prints_nested_expression() {
        // -123 * (45.67)
        let expr = Expr::Binary {
            left: Box::new(Expr::Unary {
                operator: token(TokenKind::Minus, "-"),
                right: Box::new(Expr::Literal(Literal::Number(123.0))),
            }),
            operator: token(TokenKind::Star, "*"),
            right: Box::new(Expr::Grouping(Box::new(Expr::Literal(Literal::Number(
                45.67,
            ))))),
        };
        assert_eq!(print(&expr), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn prints_assignment_and_variable() {
        let expr = Expr::Assign {
            name: token(TokenKind::Identifier, "a"),
            value: Box::new(Expr::Variable(token(TokenKind::Identifier, "b"))),
        };
        assert_eq!(print(&expr), "(= a b)");
    }

    #[test]
    fn prints_nil_literal() {
        assert_eq!(print(&Expr::Literal(Literal::Nil)), "nil");
    }
}
