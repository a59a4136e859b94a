//! Write targets.
//!
//! A place is a binding plus the keys leading from it to the written node.
//! Keys are evaluated up front, so navigating a place never runs procedure
//! code while a `&mut` into the environment is live.

use super::Interpreter;
use crate::environment::AssignError;
use crate::errors::{EvalError, EvalResult};
use imut_ir::{ExprId, ExprKind, Name, Span};
use imut_stack::ensure_sufficient_stack;
use imut_value::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Step {
    /// Record field or list index.
    Key(String),
    /// Map entry reached through `get(key)`.
    MapGet(String),
}

#[derive(Clone, Debug)]
pub(super) struct Place {
    pub root: Name,
    pub steps: Vec<Step>,
}

impl Interpreter<'_> {
    /// Resolve `id` to a place, evaluating computed keys left to right.
    pub(super) fn place(&mut self, id: ExprId) -> EvalResult<Place> {
        ensure_sufficient_stack(|| {
            let procedure = self.procedure;
            let expr = procedure.arena.get(id);
            match expr.kind {
                ExprKind::Ident(root) => Ok(Place {
                    root,
                    steps: Vec::new(),
                }),
                ExprKind::Member { object, property } => {
                    let mut place = self.place(object)?;
                    place
                        .steps
                        .push(Step::Key(procedure.name(property).to_string()));
                    Ok(place)
                }
                ExprKind::Index { object, index } => {
                    let mut place = self.place(object)?;
                    let key = self.eval_key(index)?;
                    place.steps.push(Step::Key(key));
                    Ok(place)
                }
                ExprKind::Call { callee, args } if args.len == 1 => {
                    let ExprKind::Member { object, property } = procedure.arena.get(callee).kind
                    else {
                        return Err(EvalError::NotAPlace { span: expr.span });
                    };
                    if procedure.name(property) != "get" {
                        return Err(EvalError::NotAPlace { span: expr.span });
                    }
                    let mut place = self.place(object)?;
                    let key = self.eval_key(procedure.arena.get_expr_list(args)[0])?;
                    place.steps.push(Step::MapGet(key));
                    Ok(place)
                }
                _ => Err(EvalError::NotAPlace { span: expr.span }),
            }
        })
    }

    /// Current value at `place`, read with the same rules as an expression.
    pub(super) fn read_place(&self, place: &Place, span: Span) -> EvalResult {
        let mut value = self.lookup(place.root, span)?.clone();
        for step in &place.steps {
            value = match step {
                Step::Key(key) => read_property(&value, key, span)?,
                Step::MapGet(key) => map_get(&value, key),
            };
        }
        Ok(value)
    }

    /// Mutable access to the node at the end of `steps`.
    pub(super) fn node_mut(&mut self, root: Name, steps: &[Step], span: Span) -> EvalResult<&mut Value> {
        let procedure = self.procedure;
        let mut node = self
            .env
            .lookup_mut(root)
            .ok_or_else(|| EvalError::UndefinedVariable {
                name: procedure.name(root).to_string(),
                span,
            })?;
        for step in steps {
            node = match step {
                Step::Key(key) => node.child_mut(key),
                Step::MapGet(key) => node.map_entry_mut(key),
            }
            .map_err(|err| EvalError::write(err, span))?;
        }
        Ok(node)
    }

    /// Store `value` at `place`: rebind a variable or assign a field.
    pub(super) fn write_place(&mut self, place: &Place, value: Value, span: Span) -> EvalResult<()> {
        let Some((last, parents)) = place.steps.split_last() else {
            let procedure = self.procedure;
            let name = procedure.name(place.root);
            return self.env.assign(place.root, value).map_err(|err| match err {
                AssignError::Immutable => EvalError::ImmutableBinding {
                    name: name.to_string(),
                    span,
                },
                AssignError::Undefined => EvalError::UndefinedVariable {
                    name: name.to_string(),
                    span,
                },
            });
        };
        let Step::Key(key) = last else {
            return Err(EvalError::NotAPlace { span });
        };
        self.node_mut(place.root, parents, span)?
            .set_key(key, value)
            .map_err(|err| EvalError::write(err, span))
    }
}

/// `value.key`, failing on `undefined` and `null` receivers.
pub(super) fn read_property(value: &Value, key: &str, span: Span) -> EvalResult {
    match value {
        Value::Undefined | Value::Null => Err(EvalError::ReadOfNullish {
            key: key.to_string(),
            found: value.type_name(),
            span,
        }),
        _ => Ok(value.read_property(key)),
    }
}

/// `map.get(key)`; `undefined` for missing entries and non-maps.
pub(super) fn map_get(value: &Value, key: &str) -> Value {
    value
        .as_map()
        .and_then(|entries| entries.get(key))
        .cloned()
        .unwrap_or(Value::Undefined)
}
