//! AST visitor.
//!
//! Traversal over the arena-allocated procedure. The visitor may mutate its
//! own state; the AST stays immutable.
//!
//! Default implementations call the `walk_*` functions, which visit children
//! depth-first, left to right. Override a `visit_*` method to intercept a node
//! and call the matching `walk_*` to keep descending.
//!
//! # Example
//!
//! ```text
//! struct CountCalls {
//!     count: usize,
//! }
//!
//! impl<'ast> Visitor<'ast> for CountCalls {
//!     fn visit_expr(&mut self, expr: &'ast Expr, arena: &'ast ExprArena) {
//!         if matches!(expr.kind, ExprKind::Call { .. }) {
//!             self.count += 1;
//!         }
//!         walk_expr(self, expr, arena);
//!     }
//! }
//! ```

use crate::ast::{Body, Expr, ExprKind, Stmt, StmtKind};
use crate::{ExprArena, ExprId};

pub trait Visitor<'ast> {
    /// Visit a procedure body.
    fn visit_body(&mut self, body: &'ast Body, arena: &'ast ExprArena) {
        walk_body(self, body, arena);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt, arena: &'ast ExprArena) {
        walk_stmt(self, stmt, arena);
    }

    fn visit_expr(&mut self, expr: &'ast Expr, arena: &'ast ExprArena) {
        walk_expr(self, expr, arena);
    }

    /// Visit an expression by id.
    fn visit_expr_id(&mut self, id: ExprId, arena: &'ast ExprArena) {
        self.visit_expr(arena.get(id), arena);
    }
}

pub fn walk_body<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    body: &'ast Body,
    arena: &'ast ExprArena,
) {
    match body {
        Body::Expr(id) => visitor.visit_expr_id(*id, arena),
        Body::Block(range) => {
            for stmt in arena.get_stmts(*range) {
                visitor.visit_stmt(stmt, arena);
            }
        }
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    stmt: &'ast Stmt,
    arena: &'ast ExprArena,
) {
    match &stmt.kind {
        StmtKind::Expr(id) => visitor.visit_expr_id(*id, arena),
        StmtKind::Let { init, .. } => {
            if let Some(init) = init {
                visitor.visit_expr_id(*init, arena);
            }
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr_id(*value, arena);
            }
        }
        StmtKind::Block(range) => {
            for inner in arena.get_stmts(*range) {
                visitor.visit_stmt(inner, arena);
            }
        }
        StmtKind::Empty => {}
    }
}

/// Walk an expression's children.
pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    expr: &'ast Expr,
    arena: &'ast ExprArena,
) {
    match &expr.kind {
        ExprKind::Number(_)
        | ExprKind::String(_)
        | ExprKind::Bool(_)
        | ExprKind::Null
        | ExprKind::Undefined
        | ExprKind::Ident(_) => {}

        ExprKind::Member { object, .. } => visitor.visit_expr_id(*object, arena),
        ExprKind::Index { object, index } => {
            visitor.visit_expr_id(*object, arena);
            visitor.visit_expr_id(*index, arena);
        }
        ExprKind::Call { callee, args } => {
            visitor.visit_expr_id(*callee, arena);
            for arg in arena.get_expr_list(*args) {
                visitor.visit_expr_id(*arg, arena);
            }
        }
        ExprKind::Assign { target, value, .. } => {
            visitor.visit_expr_id(*target, arena);
            visitor.visit_expr_id(*value, arena);
        }
        ExprKind::Update { target, .. } => visitor.visit_expr_id(*target, arena),
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr_id(*left, arena);
            visitor.visit_expr_id(*right, arena);
        }
        ExprKind::Unary { operand, .. } => visitor.visit_expr_id(*operand, arena),
        ExprKind::Array(range) => {
            for elem in arena.get_expr_list(*range) {
                visitor.visit_expr_id(*elem, arena);
            }
        }
        ExprKind::Object(range) => {
            for prop in arena.get_props(*range) {
                visitor.visit_expr_id(prop.value, arena);
            }
        }
    }
}
