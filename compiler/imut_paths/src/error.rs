//! Analysis and resolution errors.

use imut_ir::Span;
use imut_parse::ParseError;
use thiserror::Error;

/// A procedure whose writes cannot be determined from its text.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum AnalysisError {
    #[error("too many parameters: expected at most 2 (state, args), found {count}")]
    TooManyParameters { count: usize, span: Span },

    #[error("a state parameter is required")]
    MissingStateParameter { span: Span },

    #[error("parameter `{name}` is declared twice")]
    DuplicateParameter { name: String, span: Span },

    /// Any assignment other than `=`, and `++`/`--` on state.
    #[error("unsupported assignment operator `{op}`")]
    CompoundAssignment { op: &'static str, span: Span },

    #[error("cannot determine key `{key}` before running the procedure")]
    UnanalyzableKey { key: String, span: Span },

    #[error("unsupported call `{method}` with {arity} argument(s); only get/1, set/2 and delete/1 are allowed on state")]
    UnsupportedCall {
        method: String,
        arity: usize,
        span: Span,
    },

    #[error("`{name}` shadows a procedure parameter")]
    ShadowedParameter { name: String, span: Span },

    #[error("the state parameter itself cannot be reassigned")]
    StateReassignment { span: Span },
}

impl AnalysisError {
    pub fn span(&self) -> Span {
        match self {
            AnalysisError::TooManyParameters { span, .. }
            | AnalysisError::MissingStateParameter { span }
            | AnalysisError::DuplicateParameter { span, .. }
            | AnalysisError::CompoundAssignment { span, .. }
            | AnalysisError::UnanalyzableKey { span, .. }
            | AnalysisError::UnsupportedCall { span, .. }
            | AnalysisError::ShadowedParameter { span, .. }
            | AnalysisError::StateReassignment { span } => *span,
        }
    }

    /// Short label for the offending source location.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisError::TooManyParameters { .. } => "extra parameter",
            AnalysisError::MissingStateParameter { .. } => "no parameters declared",
            AnalysisError::DuplicateParameter { .. } => "declared again here",
            AnalysisError::CompoundAssignment { .. } => "use a plain `=` assignment",
            AnalysisError::UnanalyzableKey { .. } => {
                "keys must be literals, the args parameter, or a field of it"
            }
            AnalysisError::UnsupportedCall { .. } => "called on state here",
            AnalysisError::ShadowedParameter { .. } => "shadowing declaration",
            AnalysisError::StateReassignment { .. } => "assigns the state parameter",
        }
    }
}

/// Failure to parse or analyze a procedure.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            CompileError::Parse(err) => err.span(),
            CompileError::Analysis(err) => err.span(),
        }
    }
}

/// The runtime argument does not fit the markers a procedure uses.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ArgumentShapeError {
    /// `%` needs a string or finite number.
    #[error("the argument is used as a key and must be a string or number, found {found}")]
    ExpectedKey { found: &'static str },

    /// `%name` needs a record or map.
    #[error("`%{field}` needs a record or map argument, found {found}")]
    ExpectedRecord { field: String, found: &'static str },

    #[error("the argument has no field `{field}`")]
    MissingField { field: String },

    #[error("argument field `{field}` is used as a key and must be a string or number, found {found}")]
    FieldNotKey { field: String, found: &'static str },
}
