//! Lexical scopes of a running procedure.
//!
//! A plain stack of binding maps. Writes need `&mut Value` into a binding so
//! they can reach `Heap::get_mut`, which rules out the shared parent links a
//! closure-capturing interpreter would use.

use imut_ir::Name;
use imut_value::Value;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// `let`, `var` and parameters.
    Mutable,
    /// `const` and captured outer variables.
    Immutable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    Immutable,
    Undefined,
}

#[derive(Debug)]
struct Binding {
    value: Value,
    mutability: Mutability,
}

#[derive(Debug)]
pub struct Environment {
    scopes: Vec<FxHashMap<Name, Binding>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Pop the innermost scope. The outermost scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Bind `name` in the innermost scope, replacing an earlier binding there.
    pub fn define(&mut self, name: Name, value: Value, mutability: Mutability) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, Binding { value, mutability });
        }
    }

    pub fn lookup(&self, name: Name) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name))
            .map(|binding| &binding.value)
    }

    /// Mutable access for writes *through* a binding (`x.a = 1`). The
    /// binding's own mutability does not matter here, as with `const` objects.
    pub fn lookup_mut(&mut self, name: Name) -> Option<&mut Value> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(&name))
            .map(|binding| &mut binding.value)
    }

    /// Rebind `name` (`x = 1`).
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        let binding = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(&name))
            .ok_or(AssignError::Undefined)?;
        if binding.mutability == Mutability::Immutable {
            return Err(AssignError::Immutable);
        }
        binding.value = value;
        Ok(())
    }

    /// Remove `name` from whichever scope holds it.
    pub fn take(&mut self, name: Name) -> Option<Value> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.remove(&name))
            .map(|binding| binding.value)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imut_ir::StringInterner;
    use pretty_assertions::assert_eq;

    #[test]
    fn inner_scopes_shadow_and_pop() {
        let mut interner = StringInterner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();
        env.define(x, Value::from(1), Mutability::Mutable);
        env.push_scope();
        env.define(x, Value::from(2), Mutability::Immutable);
        assert_eq!(env.lookup(x), Some(&Value::from(2)));
        assert_eq!(env.assign(x, Value::from(3)), Err(AssignError::Immutable));
        env.pop_scope();
        assert_eq!(env.assign(x, Value::from(3)), Ok(()));
        assert_eq!(env.lookup(x), Some(&Value::from(3)));
    }

    #[test]
    fn unknown_names() {
        let mut interner = StringInterner::new();
        let y = interner.intern("y");
        let mut env = Environment::new();
        assert_eq!(env.lookup(y), None);
        assert_eq!(env.assign(y, Value::Null), Err(AssignError::Undefined));
        env.pop_scope();
        env.define(y, Value::Null, Mutability::Mutable);
        assert_eq!(env.take(y), Some(Value::Null));
        assert_eq!(env.take(y), None);
    }
}
