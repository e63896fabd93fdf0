//! Lexical scope chain.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::diag::RuntimeError;
use crate::eval::Value;
use crate::token::Token;

/// A mutable name-to-value mapping linked to an enclosing scope.
///
/// Handed around as `Rc<Environment>`: the evaluator creates a child for
/// every block it enters and simply drops its handle on exit, which
/// discards the block's bindings along with it.
#[derive(Debug, Default)]
pub struct Environment {
    enclosing: Option<Rc<Environment>>,
    values: RefCell<HashMap<String, Value>>,
}

impl Environment {
    /// The outermost scope.
    pub fn global() -> Rc<Environment> {
        Rc::new(Environment::default())
    }

    /// A fresh scope nested inside `enclosing`.
    pub fn with_enclosing(enclosing: Rc<Environment>) -> Rc<Environment> {
        Rc::new(Environment {
            enclosing: Some(enclosing),
            values: RefCell::new(HashMap::new()),
        })
    }

    /// Install a binding in this scope only. Redefining a name already
    /// bound here overwrites it; shadowing a name from an outer scope is
    /// what makes block-local declarations work.
    pub fn define(&self, name: &str, value: Value) {
        self.values.borrow_mut().insert(name.to_string(), value);
    }

    /// Look a name up here, then outward through the enclosing chain.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.borrow().get(&name.lexeme) {
            return Ok(value.clone());
        }
        match &self.enclosing {
            Some(enclosing) => enclosing.get(name),
            None => Err(undefined(name)),
        }
    }

    /// Overwrite an existing binding, searching outward. Never creates a
    /// binding: assigning to an undeclared name is an error, not an
    /// implicit global.
    pub fn assign(&self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        let mut values = self.values.borrow_mut();
        if let Some(slot) = values.get_mut(&name.lexeme) {
            *slot = value;
            return Ok(());
        }
        drop(values);
        match &self.enclosing {
            Some(enclosing) => enclosing.assign(name, value),
            None => Err(undefined(name)),
        }
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError::fault(name, format!("Undefined variable '{}'.", name.lexeme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn name(text: &str) -> Token {
        Token::new(TokenKind::Identifier, text.to_string(), None, 1)
    }

    #[test]
    fn define_then_get() {
        let env = Environment::global();
        env.define("a", Value::Number(1.0));
        assert_eq!(env.get(&name("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn redefining_overwrites() {
        let env = Environment::global();
        env.define("a", Value::Number(1.0));
        env.define("a", Value::Number(2.0));
        assert_eq!(env.get(&name("a")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn get_walks_the_enclosing_chain() {
        let global = Environment::global();
        global.define("a", Value::Number(1.0));
        let inner = Environment::with_enclosing(global);
        assert_eq!(inner.get(&name("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn shadowing_does_not_touch_the_outer_binding() {
        let global = Environment::global();
        global.define("a", Value::Number(1.0));
        let inner = Environment::with_enclosing(global.clone());
        inner.define("a", Value::Number(2.0));
        assert_eq!(inner.get(&name("a")).unwrap(), Value::Number(2.0));
        assert_eq!(global.get(&name("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_updates_the_outer_binding_through_a_child_scope() {
        let global = Environment::global();
        global.define("a", Value::Number(1.0));
        let inner = Environment::with_enclosing(global.clone());
        inner.assign(&name("a"), Value::Number(3.0)).unwrap();
        assert_eq!(global.get(&name("a")).unwrap(), Value::Number(3.0));
    }

    #[test]
    fn get_of_unknown_name_fails() {
        let env = Environment::global();
        let err = env.get(&name("ghost")).unwrap_err();
        assert_eq!(err.to_string(), "[line 1] Error: Undefined variable 'ghost'.");
    }

    #[test]
    fn assign_never_creates_a_binding() {
        let env = Environment::global();
        assert!(env.assign(&name("ghost"), Value::Nil).is_err());
        assert!(env.get(&name("ghost")).is_err());
    }
}
