//! Expression and statement nodes of a mutation procedure.
//!
//! Children are `ExprId` indices into an [`ExprArena`](crate::ExprArena), never
//! boxes. Lists of children (call arguments, array elements, block statements,
//! object properties) are contiguous ranges in the arena.

use crate::{Name, Span, StringInterner};
use std::fmt;

/// Index into the expression arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Contiguous run of entries in one of the arena's side tables.
macro_rules! define_range {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                $name { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub fn to_range(self) -> std::ops::Range<usize> {
                self.start as usize..(self.start + self.len) as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}..+{})", stringify!($name), self.start, self.len)
            }
        }
    };
}

define_range!(
    /// Range of expression ids (call arguments, array elements).
    ExprRange
);
define_range!(
    /// Range of statements (block bodies).
    StmtRange
);
define_range!(
    /// Range of object literal properties.
    PropRange
);

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Number literal, stored as `f64` bits.
    Number(u64),
    /// String literal (interned).
    String(Name),
    Bool(bool),
    Null,
    Undefined,

    /// Variable reference.
    Ident(Name),

    /// Static member access: `object.property`
    Member { object: ExprId, property: Name },

    /// Computed member access: `object[index]`
    Index { object: ExprId, index: ExprId },

    /// Call: `callee(args...)`. Method calls have a `Member` callee.
    Call { callee: ExprId, args: ExprRange },

    /// Assignment: `target op value`
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },

    /// Increment or decrement: `x++`, `--x`
    Update {
        op: UpdateOp,
        prefix: bool,
        target: ExprId,
    },

    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    Unary { op: UnaryOp, operand: ExprId },

    /// Array literal: `[a, b]`
    Array(ExprRange),

    /// Object literal: `{ key: value }`
    Object(PropRange),
}

impl ExprKind {
    /// Decode a number literal.
    pub fn number(bits: u64) -> f64 {
        f64::from_bits(bits)
    }
}

/// Assignment operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl AssignOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Object literal entry: `key: value` (shorthand `{ x }` is `x: x`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Property {
    pub key: Name,
    pub value: ExprId,
    pub span: Span,
}

/// Statement node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[inline]
    pub const fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// Expression statement.
    Expr(ExprId),
    /// `let`/`var` (mutable) or `const` binding.
    Let {
        name: Name,
        mutable: bool,
        init: Option<ExprId>,
    },
    Return(Option<ExprId>),
    Block(StmtRange),
    /// Stray `;`.
    Empty,
}

/// Declared parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub span: Span,
}

/// Procedure body: an arrow function's bare expression or a block.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Body {
    Expr(ExprId),
    Block(StmtRange),
}

/// A parsed mutation procedure.
///
/// Owns everything needed to analyze and run it: the arena, the interner,
/// and the original source text.
#[derive(Clone, Debug)]
pub struct Procedure {
    pub params: Vec<Param>,
    pub body: Body,
    pub arena: crate::ExprArena,
    pub interner: StringInterner,
    pub source: Box<str>,
    pub span: Span,
}

impl Procedure {
    /// Name of parameter `index`, if declared.
    pub fn param_name(&self, index: usize) -> Option<Name> {
        self.params.get(index).map(|p| p.name)
    }

    /// Resolve an interned name.
    pub fn name(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    /// Source text covered by `span`.
    pub fn snippet(&self, span: Span) -> &str {
        span.snippet(&self.source)
    }
}
