//! Tree-walking interpreter for mutation procedures.
//!
//! Runs a parsed [`Procedure`] against a state value that the selective
//! cloner has already prepared. Every write goes through the value's
//! ownership-checked helpers: a write that would reach a node still shared
//! with the original tree fails with [`EvalError::SharedWrite`] instead of
//! leaking into it.

mod place;

use crate::environment::{Environment, Mutability};
use crate::errors::{EvalError, EvalResult};
use crate::operators::{evaluate_binary, evaluate_unary, to_number};
use imut_ir::{
    AssignOp, BinaryOp, Body, Expr, ExprId, ExprKind, ExprRange, Name, Procedure, Span, Stmt,
    StmtKind, StmtRange, UpdateOp,
};
use imut_stack::ensure_sufficient_stack;
use imut_value::{Fields, Value};
use place::{map_get, read_property, Place};

/// Control flow out of a statement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    Normal,
    Return,
}

pub struct Interpreter<'p> {
    procedure: &'p Procedure,
    env: Environment,
}

impl<'p> Interpreter<'p> {
    pub fn new(procedure: &'p Procedure) -> Self {
        Interpreter {
            procedure,
            env: Environment::new(),
        }
    }

    /// Make an outer variable readable by the procedure under `name`.
    ///
    /// Captures live in the outermost scope: parameters and locals shadow
    /// them, and the procedure cannot rebind them. Names the procedure never
    /// mentions are ignored.
    pub fn capture(&mut self, name: &str, value: Value) -> &mut Self {
        if let Some(name) = self.procedure.interner.get(name) {
            self.env.define(name, value, Mutability::Immutable);
        }
        self
    }

    /// Run the procedure with `state` and `args` bound to its parameters and
    /// return the state afterwards. A `return` value is ignored.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn run(mut self, state: Value, args: Option<Value>) -> EvalResult {
        let procedure = self.procedure;
        let Some(state_param) = procedure.params.first() else {
            return Ok(state);
        };
        self.env.push_scope();
        self.env.define(state_param.name, state, Mutability::Mutable);
        if let Some(args_param) = procedure.params.get(1) {
            self.env.define(
                args_param.name,
                args.unwrap_or(Value::Undefined),
                Mutability::Mutable,
            );
        }
        match procedure.body {
            Body::Expr(id) => {
                self.eval(id)?;
            }
            Body::Block(stmts) => {
                self.exec_block(stmts)?;
            }
        }
        Ok(self.env.take(state_param.name).unwrap_or(Value::Undefined))
    }

    // Statements

    fn exec_block(&mut self, stmts: StmtRange) -> EvalResult<Flow> {
        let procedure = self.procedure;
        self.env.push_scope();
        let mut flow = Flow::Normal;
        for stmt in procedure.arena.get_stmts(stmts) {
            match self.exec_stmt(stmt) {
                Ok(Flow::Normal) => {}
                Ok(Flow::Return) => {
                    flow = Flow::Return;
                    break;
                }
                Err(err) => {
                    self.env.pop_scope();
                    return Err(err);
                }
            }
        }
        self.env.pop_scope();
        Ok(flow)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt.kind {
            StmtKind::Expr(id) => {
                self.eval(id)?;
                Ok(Flow::Normal)
            }
            StmtKind::Let {
                name,
                mutable,
                init,
            } => {
                let value = match init {
                    Some(init) => self.eval(init)?,
                    None => Value::Undefined,
                };
                let mutability = if mutable {
                    Mutability::Mutable
                } else {
                    Mutability::Immutable
                };
                self.env.define(name, value, mutability);
                Ok(Flow::Normal)
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.eval(value)?;
                }
                Ok(Flow::Return)
            }
            StmtKind::Block(stmts) => self.exec_block(stmts),
            StmtKind::Empty => Ok(Flow::Normal),
        }
    }

    // Expressions

    fn eval(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| {
            let procedure = self.procedure;
            let expr = procedure.arena.get(id);
            self.eval_expr(expr)
        })
    }

    fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        let procedure = self.procedure;
        match expr.kind {
            ExprKind::Number(bits) => Ok(Value::Number(ExprKind::number(bits))),
            ExprKind::String(s) => Ok(Value::from(procedure.name(s))),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Undefined => Ok(Value::Undefined),
            ExprKind::Ident(name) => self.lookup(name, expr.span).cloned(),
            ExprKind::Member { object, property } => {
                let object = self.eval(object)?;
                read_property(&object, procedure.name(property), expr.span)
            }
            ExprKind::Index { object, index } => {
                let object = self.eval(object)?;
                let key = self.eval_key(index)?;
                read_property(&object, &key, expr.span)
            }
            ExprKind::Call { callee, args } => self.call(expr, callee, args),
            ExprKind::Assign { op, target, value } => self.assign(op, target, value, expr.span),
            ExprKind::Update { op, prefix, target } => {
                let place = self.place(target)?;
                let old = to_number(&self.read_place(&place, expr.span)?);
                let new = match op {
                    UpdateOp::Increment => old + 1.0,
                    UpdateOp::Decrement => old - 1.0,
                };
                self.write_place(&place, Value::Number(new), expr.span)?;
                Ok(Value::Number(if prefix { new } else { old }))
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Ok(evaluate_binary(&left, &right, op))
            }
            ExprKind::Unary { op, operand } => Ok(evaluate_unary(&self.eval(operand)?, op)),
            ExprKind::Array(elems) => {
                let items = procedure
                    .arena
                    .get_expr_list(elems)
                    .iter()
                    .map(|&elem| self.eval(elem))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::list(items))
            }
            ExprKind::Object(props) => {
                let mut fields = Fields::with_capacity(props.len as usize);
                for prop in procedure.arena.get_props(props) {
                    let value = self.eval(prop.value)?;
                    fields.insert(procedure.name(prop.key).to_string(), value);
                }
                Ok(Value::record(fields))
            }
        }
    }

    fn assign(&mut self, op: AssignOp, target: ExprId, value: ExprId, span: Span) -> EvalResult {
        let place = self.place(target)?;
        let rhs = self.eval(value)?;
        let new = match compound_op(op) {
            None => rhs,
            Some(op) => evaluate_binary(&self.read_place(&place, span)?, &rhs, op),
        };
        self.write_place(&place, new.clone(), span)?;
        Ok(new)
    }

    fn call(&mut self, expr: &Expr, callee: ExprId, args: ExprRange) -> EvalResult {
        let procedure = self.procedure;
        let ExprKind::Member { object, property } = procedure.arena.get(callee).kind else {
            return Err(EvalError::NotCallable { span: expr.span });
        };
        let method = procedure.name(property);
        let args = procedure.arena.get_expr_list(args);
        match (method, args) {
            ("set", &[key, value]) => {
                let place = self.place(object)?;
                let key = self.eval_key(key)?;
                let value = self.eval(value)?;
                let map = self.map_receiver(&place, method, 2, expr.span)?;
                map.map_set(key, value)
                    .map_err(|err| EvalError::write(err, expr.span))?;
                Ok(map.clone())
            }
            ("delete", &[key]) => {
                let place = self.place(object)?;
                let key = self.eval_key(key)?;
                let map = self.map_receiver(&place, method, 1, expr.span)?;
                let removed = map
                    .map_delete(&key)
                    .map_err(|err| EvalError::write(err, expr.span))?;
                Ok(Value::Bool(removed))
            }
            _ => {
                let receiver = self.eval(object)?;
                let args = args
                    .iter()
                    .map(|&arg| self.eval(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                call_method(&receiver, method, &args, expr.span)
            }
        }
    }

    /// The map a `set`/`delete` call writes to.
    fn map_receiver(
        &mut self,
        place: &Place,
        method: &str,
        arity: usize,
        span: Span,
    ) -> EvalResult<&mut Value> {
        let node = self.node_mut(place.root, &place.steps, span)?;
        if matches!(node, Value::Map(_)) {
            return Ok(node);
        }
        let found = node.type_name();
        Err(if matches!(node, Value::Undefined | Value::Null) {
            EvalError::ReadOfNullish {
                key: method.to_string(),
                found,
                span,
            }
        } else {
            EvalError::UnknownMethod {
                method: method.to_string(),
                type_name: found,
                arity,
                span,
            }
        })
    }

    fn lookup(&self, name: Name, span: Span) -> EvalResult<&Value> {
        self.env
            .lookup(name)
            .ok_or_else(|| EvalError::UndefinedVariable {
                name: self.procedure.name(name).to_string(),
                span,
            })
    }

    /// Evaluate a computed key: a string or finite number.
    fn eval_key(&mut self, id: ExprId) -> EvalResult<String> {
        let span = self.procedure.arena.get(id).span;
        let value = self.eval(id)?;
        value.to_key().ok_or(EvalError::InvalidKey {
            found: value.type_name(),
            span,
        })
    }
}

/// Read-only methods, evaluated on an already computed receiver.
fn call_method(receiver: &Value, method: &str, args: &[Value], span: Span) -> EvalResult {
    match (receiver, method, args) {
        (Value::Map(_), "get", [key]) => Ok(map_get(receiver, &key_of(key, span)?)),
        (Value::Map(entries), "has", [key]) => {
            Ok(Value::Bool(entries.contains_key(&key_of(key, span)?)))
        }
        (Value::Undefined | Value::Null, _, _) => Err(EvalError::ReadOfNullish {
            key: method.to_string(),
            found: receiver.type_name(),
            span,
        }),
        _ => Err(EvalError::UnknownMethod {
            method: method.to_string(),
            type_name: receiver.type_name(),
            arity: args.len(),
            span,
        }),
    }
}

fn key_of(value: &Value, span: Span) -> EvalResult<String> {
    value.to_key().ok_or(EvalError::InvalidKey {
        found: value.type_name(),
        span,
    })
}

fn compound_op(op: AssignOp) -> Option<BinaryOp> {
    match op {
        AssignOp::Assign => None,
        AssignOp::Add => Some(BinaryOp::Add),
        AssignOp::Sub => Some(BinaryOp::Sub),
        AssignOp::Mul => Some(BinaryOp::Mul),
        AssignOp::Div => Some(BinaryOp::Div),
        AssignOp::Rem => Some(BinaryOp::Rem),
    }
}
