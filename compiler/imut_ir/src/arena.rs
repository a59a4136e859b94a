//! Flat storage for a procedure's AST.

use crate::ast::{Expr, ExprId, ExprRange, PropRange, Property, Stmt, StmtRange};

/// Arena holding every node of one procedure.
///
/// Nodes are appended while parsing and never removed, so ids stay valid for
/// the arena's lifetime.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    stmts: Vec<Stmt>,
    props: Vec<Property>,
}

fn index_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(index_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// Get an expression by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different arena.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Store a list of expression ids contiguously.
    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = index_u32(self.expr_lists.len());
        self.expr_lists.extend(ids);
        let len = index_u32(self.expr_lists.len()) - start;
        ExprRange::new(start, len)
    }

    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.to_range()]
    }

    /// Store a block's statements contiguously.
    ///
    /// Statements of nested blocks are allocated first (while their enclosing
    /// block is still being parsed), so each block's own statements stay
    /// adjacent.
    pub fn alloc_stmts(&mut self, stmts: impl IntoIterator<Item = Stmt>) -> StmtRange {
        let start = index_u32(self.stmts.len());
        self.stmts.extend(stmts);
        let len = index_u32(self.stmts.len()) - start;
        StmtRange::new(start, len)
    }

    pub fn get_stmts(&self, range: StmtRange) -> &[Stmt] {
        &self.stmts[range.to_range()]
    }

    pub fn alloc_props(&mut self, props: impl IntoIterator<Item = Property>) -> PropRange {
        let start = index_u32(self.props.len());
        self.props.extend(props);
        let len = index_u32(self.props.len()) - start;
        PropRange::new(start, len)
    }

    pub fn get_props(&self, range: PropRange) -> &[Property] {
        &self.props[range.to_range()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }
}
