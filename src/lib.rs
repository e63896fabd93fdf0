//! A tree-walk interpreter for the Lox language.
//!
//! The pipeline has three stages, each surfacing its own errors:
//! [`scanner`] turns source text into tokens, [`parser`] turns tokens
//! into an abstract syntax tree and [`eval`] walks the tree. The
//! [`interpreter`] module ties the stages together behind a single
//! entry point suitable for both script and REPL front ends.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod ast;
pub mod diag;
pub mod env;
pub mod eval;
pub mod interpreter;
pub mod parser;
pub mod printer;
pub mod scanner;
pub mod token;
