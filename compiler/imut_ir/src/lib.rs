//! imut IR - syntax types for mutation procedures
//!
//! This crate contains the data structures shared by the lexer, the parser,
//! the path extractor and the interpreter:
//! - Spans for source locations
//! - Names for interned identifiers and string literals
//! - Tokens and `TokenList` for lexer output
//! - AST nodes (Expr, Stmt, Procedure)
//! - Arena allocation for expressions and statements
//!
//! # Design
//!
//! - **Intern Everything**: strings become `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId(u32)` indices
//!
//! Number literals are stored as `u64` bits so nodes stay `Eq + Hash`.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod name;
mod span;
mod token;
pub mod visitor;

pub use arena::ExprArena;
pub use ast::{
    AssignOp, BinaryOp, Body, Expr, ExprId, ExprKind, ExprRange, Param, Procedure, PropRange,
    Property, Stmt, StmtKind, StmtRange, UnaryOp, UpdateOp,
};
pub use name::{Name, StringInterner};
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};
pub use visitor::Visitor;

static_assert_size!(Span, 8);
static_assert_size!(ExprId, 4);
