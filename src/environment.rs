use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to an environment. Closures keep their defining scope alive
/// through this, independent of the call stack.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope: its bindings plus the scope it is nested in.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap in a shared handle.
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Bind `name` in this scope, replacing any previous binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Dynamic lookup, walking outward until the chain is exhausted.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Dynamic assignment to the nearest scope already binding `name`.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }
}

/// The environment exactly `distance` hops out from `env`.
pub fn ancestor(env: &EnvRef, distance: usize) -> Option<EnvRef> {
    let mut current: EnvRef = Rc::clone(env);

    for _ in 0..distance {
        let next: EnvRef = current.borrow().enclosing.clone()?;
        current = next;
    }

    Some(current)
}

/// Read `name` from the scope `distance` hops out, as computed by the resolver.
pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
    debug!("Reading '{}' at distance {}", name.lexeme, distance);

    let scope: EnvRef = ancestor(env, distance).ok_or_else(|| undefined(name))?;
    let value: Option<Value> = scope.borrow().values.get(&name.lexeme).cloned();

    value.ok_or_else(|| undefined(name))
}

/// Write `name` into the scope `distance` hops out.
pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
    debug!("Assigning '{}' at distance {}", name.lexeme, distance);

    let scope: EnvRef = ancestor(env, distance).ok_or_else(|| undefined(name))?;
    let mut bindings = scope.borrow_mut();

    let result = match bindings.values.get_mut(&name.lexeme) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(undefined(name)),
    };

    result
}

fn undefined(name: &Token) -> LoxError {
    LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, name, 1)
    }

    #[test]
    fn lookup_walks_outward() {
        let globals = Environment::new().into_ref();
        globals.borrow_mut().define("a", Value::Number(1.0));

        let inner = Environment::with_enclosing(Rc::clone(&globals));

        assert_eq!(inner.get(&ident("a")).ok(), Some(Value::Number(1.0)));
        assert!(inner.get(&ident("b")).is_err());
    }

    #[test]
    fn assign_updates_the_declaring_scope() {
        let globals = Environment::new().into_ref();
        globals.borrow_mut().define("a", Value::Number(1.0));

        let mut inner = Environment::with_enclosing(Rc::clone(&globals));
        assert!(inner.assign(&ident("a"), Value::Number(2.0)).is_ok());

        assert_eq!(
            globals.borrow().get(&ident("a")).ok(),
            Some(Value::Number(2.0))
        );
        assert!(inner.assign(&ident("missing"), Value::Nil).is_err());
    }

    #[test]
    fn distance_lookup_skips_shadowing_scopes() {
        let outer = Environment::new().into_ref();
        outer.borrow_mut().define("x", Value::String("outer".into()));

        let middle = Environment::with_enclosing(Rc::clone(&outer)).into_ref();
        middle.borrow_mut().define("x", Value::String("middle".into()));

        let inner = Environment::with_enclosing(Rc::clone(&middle)).into_ref();

        assert_eq!(
            get_at(&inner, 2, &ident("x")).ok(),
            Some(Value::String("outer".into()))
        );
        assert_eq!(
            get_at(&inner, 1, &ident("x")).ok(),
            Some(Value::String("middle".into()))
        );
        assert!(get_at(&inner, 0, &ident("x")).is_err());

        assert!(assign_at(&inner, 2, &ident("x"), Value::Nil).is_ok());
        assert_eq!(outer.borrow().get(&ident("x")).ok(), Some(Value::Nil));
    }

    #[test]
    fn undefined_variable_message_names_the_variable() {
        let env = Environment::new();
        let err = env.get(&ident("ghost")).unwrap_err();

        assert_eq!(err.message(), "Undefined variable 'ghost'.");
    }
}
