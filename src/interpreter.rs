//! API to control the interpreter.

use std::io::prelude::*;

use log::{debug, info};
use thiserror::Error;

use crate::diag::{Diagnostic, RuntimeError};
use crate::eval::Evaluator;
use crate::parser::Parser;
use crate::scanner::Scanner;

/// Tree-walk interpreter.
///
/// Each call to [`run`](Interpreter::run) pushes one chunk of source
/// through the full scan/parse/evaluate pipeline. The global environment
/// persists across calls, which is what makes a REPL session coherent:
///
/// ```
/// # use rslox::interpreter::{Interpreter, LoxError};
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// interp.run("var a = 1;")?;
/// interp.run("{ var a = 2; print a; } print a;")?;
///
/// assert_eq!(output, b"2\n1\n");
/// # Ok::<(), LoxError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'o, W: Write> {
    evaluator: Evaluator<'o, W>,
}

/// Errors a run can surface.
///
/// The variant makes "had a syntax error" / "had a runtime error"
/// observable to the caller, and the payload carries the detail list.
#[derive(Debug, Error)]
pub enum LoxError {
    /// One or more scan or parse diagnostics; execution never started.
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
    Syntax(Vec<Diagnostic>),

    /// The program faulted while executing.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl<'o, W: Write> Interpreter<'o, W> {
    pub fn new(output: &'o mut W) -> Interpreter<'o, W> {
        Interpreter {
            evaluator: Evaluator::new(output),
        }
    }

    /// Scan, parse and execute one chunk of source.
    ///
    /// A chunk with any scan or parse diagnostic is never executed; the
    /// parser still runs over a badly scanned token stream so a single
    /// run reports as many problems as possible.
    pub fn run(&mut self, source: &str) -> Result<(), LoxError> {
        let (tokens, mut diagnostics) = Scanner::new(source).scan_tokens();
        debug!("scanned {} tokens", tokens.len());

        let (statements, parse_diagnostics) = Parser::new(tokens).parse();
        diagnostics.extend(parse_diagnostics);

        if !diagnostics.is_empty() {
            info!(
                "aborting before execution, {} diagnostics",
                diagnostics.len()
            );
            return Err(LoxError::Syntax(diagnostics));
        }

        self.evaluator.interpret(&statements)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(input: &str) -> Result<String, LoxError> {
        let (output, result) = interpret_capture(input);
        result.map(|()| output)
    }

    /// Like `interpret` but keeps whatever was printed before a fault.
    fn interpret_capture(input: &str) -> (String, Result<(), LoxError>) {
        let mut raw_output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut raw_output);
        let result = interp.run(input);
        let output = String::from_utf8(raw_output).expect("output is not valid UTF-8");
        (output, result)
    }

    #[test]
    fn print_expr() -> Result<(), LoxError> {
        assert_eq!(interpret("print 3 * 2;")?, "6\n");
        Ok(())
    }

    #[test]
    fn precedence() -> Result<(), LoxError> {
        assert_eq!(interpret("print 1 + 2 * 3;")?, "7\n");
        assert_eq!(interpret("print (1 + 2) * 3;")?, "9\n");
        Ok(())
    }

    #[test]
    fn string_concatenation() -> Result<(), LoxError> {
        assert_eq!(interpret("print \"1\" + 2;")?, "12\n");
        assert_eq!(interpret("print \"foo\" + \"bar\";")?, "foobar\n");
        Ok(())
    }

    #[test]
    fn init_set_get_var() -> Result<(), LoxError> {
        assert_eq!(interpret("var foo = 42; foo = 24; print foo;")?, "24\n");
        Ok(())
    }

    #[test]
    fn assignment_is_an_expression() -> Result<(), LoxError> {
        assert_eq!(interpret("var a = 1; print a = 2;")?, "2\n");
        Ok(())
    }

    #[test]
    fn block_with_shadowed_var() -> Result<(), LoxError> {
        assert_eq!(
            interpret("var a = 1; { var a = 2; print a; } print a;")?,
            "2\n1\n"
        );
        Ok(())
    }

    #[test]
    fn block_assigning_var_in_parent_scope() -> Result<(), LoxError> {
        assert_eq!(interpret("var foo = 2; { foo = foo + 1; } print foo;")?, "3\n");
        Ok(())
    }

    #[test]
    fn block_locals_do_not_leak() {
        let (_, result) = interpret_capture("{ var inner = 1; } print inner;");
        match result {
            Err(LoxError::Runtime(e)) => {
                assert_eq!(e.to_string(), "[line 1] Error: Undefined variable 'inner'.")
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn if_else() -> Result<(), LoxError> {
        assert_eq!(
            interpret("var a; if (2 + 2 == 4) a = 1; else a = 2; print a;")?,
            "1\n"
        );
        assert_eq!(
            interpret("var a; if (2 + 2 != 4) a = 1; else a = 2; print a;")?,
            "2\n"
        );
        Ok(())
    }

    #[test]
    fn while_stmt() -> Result<(), LoxError> {
        let prg = r#"
            var i = 0;
            while (i < 5) {
                print i;
                i = i + 1;
            }
        "#;
        assert_eq!(interpret(prg)?, "0\n1\n2\n3\n4\n");
        Ok(())
    }

    #[test]
    fn counting_for_loop() -> Result<(), LoxError> {
        assert_eq!(
            interpret("for (var i = 0; i < 3; i = i + 1) print i;")?,
            "0\n1\n2\n"
        );
        Ok(())
    }

    #[test]
    fn logical_operators() -> Result<(), LoxError> {
        assert_eq!(interpret("print nil or \"x\";")?, "x\n");
        assert_eq!(interpret("print false and 1;")?, "false\n");
        Ok(())
    }

    #[test]
    fn nil_prints_as_nil() -> Result<(), LoxError> {
        assert_eq!(interpret("var a; print a;")?, "nil\n");
        Ok(())
    }

    #[test]
    fn runtime_fault_halts_remaining_statements() {
        let (output, result) = interpret_capture("print 1; print ghost; print 2;");
        assert_eq!(output, "1\n");
        match result {
            Err(LoxError::Runtime(e)) => {
                assert_eq!(e.to_string(), "[line 1] Error: Undefined variable 'ghost'.")
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn syntax_error_prevents_execution() {
        let (output, result) = interpret_capture("print 1;\nvar;");
        assert_eq!(output, "");
        match result {
            Err(LoxError::Syntax(diagnostics)) => assert_eq!(diagnostics.len(), 1),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn scan_and_parse_diagnostics_are_both_reported() {
        let (output, result) = interpret_capture("@\nprint;");
        assert_eq!(output, "");
        match result {
            Err(LoxError::Syntax(diagnostics)) => {
                assert_eq!(diagnostics.len(), 2);
                assert_eq!(
                    diagnostics[0].to_string(),
                    "[line 1] Error: Unexpected character."
                );
                assert_eq!(
                    diagnostics[1].to_string(),
                    "[line 2] Error at ';': Expect expression."
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn global_environment_persists_across_runs() -> Result<(), LoxError> {
        let mut raw_output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut raw_output);
        interp.run("var a = 40;")?;
        interp.run("a = a + 2;")?;
        interp.run("print a;")?;
        assert_eq!(String::from_utf8(raw_output).unwrap(), "42\n");
        Ok(())
    }

    #[test]
    fn failed_run_does_not_poison_the_session() {
        let mut raw_output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut raw_output);
        interp.run("var a = 1;").unwrap();
        assert!(interp.run("print ghost;").is_err());
        interp.run("print a;").unwrap();
        assert_eq!(String::from_utf8(raw_output).unwrap(), "1\n");
    }
}
