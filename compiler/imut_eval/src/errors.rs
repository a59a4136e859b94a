//! Errors raised while running a procedure, and cloner warnings.

use imut_ir::Span;
use imut_value::WriteError;
use thiserror::Error;

/// A runtime failure. The partially updated copy is discarded.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EvalError {
    #[error("`{name}` is not defined")]
    UndefinedVariable { name: String, span: Span },

    #[error("cannot assign to `{name}`, it was declared with `const`")]
    ImmutableBinding { name: String, span: Span },

    /// The write would land on a node another tree still holds.
    #[error("write reaches a node shared with the original state; only paths known before the update can be written")]
    SharedWrite { span: Span },

    #[error("write reaches a frozen node")]
    FrozenWrite { span: Span },

    #[error("{error}")]
    Write {
        #[source]
        error: WriteError,
        span: Span,
    },

    #[error("cannot read `{key}` of {found}")]
    ReadOfNullish {
        key: String,
        found: &'static str,
        span: Span,
    },

    #[error("{type_name} has no method `{method}` taking {arity} argument(s)")]
    UnknownMethod {
        method: String,
        type_name: &'static str,
        arity: usize,
        span: Span,
    },

    #[error("only methods can be called")]
    NotCallable { span: Span },

    /// A write whose target is a temporary rather than a variable or a
    /// field of one.
    #[error("writes must go through a variable or one of its fields")]
    NotAPlace { span: Span },

    #[error("a {found} cannot be used as a key")]
    InvalidKey { found: &'static str, span: Span },
}

impl EvalError {
    pub fn span(&self) -> Span {
        match self {
            EvalError::UndefinedVariable { span, .. }
            | EvalError::ImmutableBinding { span, .. }
            | EvalError::SharedWrite { span }
            | EvalError::FrozenWrite { span }
            | EvalError::Write { span, .. }
            | EvalError::ReadOfNullish { span, .. }
            | EvalError::UnknownMethod { span, .. }
            | EvalError::NotCallable { span }
            | EvalError::NotAPlace { span }
            | EvalError::InvalidKey { span, .. } => *span,
        }
    }

    /// Attach `span` to a failed heap write.
    pub(crate) fn write(error: WriteError, span: Span) -> Self {
        match error {
            WriteError::Frozen => EvalError::FrozenWrite { span },
            WriteError::Shared => EvalError::SharedWrite { span },
            error => EvalError::Write { error, span },
        }
    }
}

pub type EvalResult<T = imut_value::Value> = Result<T, EvalError>;

/// A write path that does not match the shape of the state. Cloning stops
/// at that point; the procedure itself reports any write that then fails.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StructuralCloneWarning {
    #[error("path `{path}` continues past a {type_name}")]
    PastScalar {
        path: String,
        type_name: &'static str,
    },

    #[error("path `{path}` continues through absent key `{key}`")]
    AbsentKey { path: String, key: String },
}
