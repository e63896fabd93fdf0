//! Tree-walking evaluator.

use std::fmt;
use std::io::prelude::*;
use std::rc::Rc;

use log::debug;

use crate::ast::{Expr, Stmt};
use crate::diag::RuntimeError;
use crate::env::Environment;
use crate::token::{Literal, Token, TokenKind};

/// A dynamically typed runtime value.
///
/// Equality is structural: values of different types are never equal, and
/// `nil` equals only `nil`. There is no object identity.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Nil,
    Number(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    /// `nil` and `false` are falsy; everything else, including `0` and
    /// the empty string, is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Value {
        match literal {
            Literal::Number(n) => Value::Number(n),
            Literal::Str(s) => Value::Str(s),
            Literal::Bool(b) => Value::Bool(b),
            Literal::Nil => Value::Nil,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            // Integral doubles print without a trailing ".0".
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Executes statements against a persistent global environment, writing
/// `print` output to the supplied sink.
#[derive(Debug)]
pub struct Evaluator<'o, W: Write> {
    output: &'o mut W,
    globals: Rc<Environment>,
}

impl<'o, W: Write> Evaluator<'o, W> {
    pub fn new(output: &'o mut W) -> Evaluator<'o, W> {
        Evaluator {
            output,
            globals: Environment::global(),
        }
    }

    /// Execute each top-level statement in order. The first runtime fault
    /// aborts the remaining statements; output printed before it stands.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        debug!("executing {} top-level statements", statements.len());
        for statement in statements {
            self.execute(statement, self.globals.clone())?;
        }
        Ok(())
    }

    fn execute(&mut self, statement: &Stmt, env: Rc<Environment>) -> Result<(), RuntimeError> {
        match statement {
            Stmt::Expression(expr) => {
                self.evaluate(expr, env)?;
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr, env)?;
                writeln!(self.output, "{}", value)?;
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr, env.clone())?,
                    None => Value::Nil,
                };
                debug!("defining variable '{}'", name.lexeme);
                env.define(&name.lexeme, value);
            }
            Stmt::Block(statements) => {
                // Dropping the child handle on exit discards the block's
                // bindings.
                let child = Environment::with_enclosing(env);
                for statement in statements {
                    self.execute(statement, child.clone())?;
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition, env.clone())?.is_truthy() {
                    self.execute(then_branch, env)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, env)?;
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition, env.clone())?.is_truthy() {
                    self.execute(body, env.clone())?;
                }
            }
        }
        Ok(())
    }

    fn evaluate(&mut self, expr: &Expr, env: Rc<Environment>) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal.clone())),
            Expr::Grouping(inner) => self.evaluate(inner, env),
            Expr::Unary { operator, right } => {
                let right = self.evaluate(right, env)?;
                match operator.kind {
                    TokenKind::Minus => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(RuntimeError::fault(operator, "Operand must be a number.")),
                    },
                    TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
                    _ => Err(RuntimeError::fault(operator, "Invalid unary operator.")),
                }
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left, env.clone())?;
                let right = self.evaluate(right, env)?;
                binary_op(operator, left, right)
            }
            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left, env.clone())?;
                let short_circuits = match operator.kind {
                    TokenKind::And => !left.is_truthy(),
                    TokenKind::Or => left.is_truthy(),
                    _ => {
                        return Err(RuntimeError::fault(operator, "Invalid logical operator."));
                    }
                };
                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right, env)
                }
            }
            Expr::Variable(name) => env.get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value, env.clone())?;
                env.assign(name, value.clone())?;
                Ok(value)
            }
        }
    }
}

fn binary_op(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match operator.kind {
        TokenKind::Plus => add(operator, left, right),
        TokenKind::Minus => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Number(l - r))
        }
        TokenKind::Star => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Number(l * r))
        }
        // Division follows IEEE-754: dividing by zero yields an infinity
        // or NaN, not a language-level fault.
        TokenKind::Slash => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Number(l / r))
        }
        TokenKind::Greater => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Bool(l > r))
        }
        TokenKind::GreaterEqual => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Bool(l >= r))
        }
        TokenKind::Less => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Bool(l < r))
        }
        TokenKind::LessEqual => {
            let (l, r) = number_operands(operator, left, right)?;
            Ok(Value::Bool(l <= r))
        }
        TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
        TokenKind::BangEqual => Ok(Value::Bool(left != right)),
        _ => Err(RuntimeError::fault(operator, "Invalid binary operator.")),
    }
}

/// `+` is overloaded: numbers add, a string on either side concatenates
/// the stringified operands, and `nil` combined with any value yields the
/// other value unchanged.
fn add(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Nil, v) | (v, Value::Nil) => Ok(v),
        (l @ Value::Str(_), r) | (l, r @ Value::Str(_)) => Ok(Value::Str(format!("{}{}", l, r))),
        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
        _ => Err(RuntimeError::fault(
            operator,
            "Cannot sum two objects from two different types.",
        )),
    }
}

fn number_operands(
    operator: &Token,
    left: Value,
    right: Value,
) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((l, r)),
        _ => Err(RuntimeError::fault(operator, "Operands must be numbers.")),
    }
}
