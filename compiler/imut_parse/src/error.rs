//! Parse error types.

use imut_ir::{Span, Token, TokenKind};
use imut_lexer::LexError;
use thiserror::Error;

/// Failure to turn procedure source into a [`Procedure`](imut_ir::Procedure).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
        span: Span,
    },

    /// A construct mutation procedures may not contain.
    #[error("unsupported syntax: {construct}")]
    UnsupportedSyntax { construct: &'static str, span: Span },

    #[error("invalid assignment target")]
    InvalidAssignmentTarget { span: Span },

    #[error("unexpected input after the procedure")]
    TrailingInput { span: Span },
}

impl ParseError {
    pub(crate) fn unexpected(expected: &'static str, found: &Token) -> Self {
        ParseError::UnexpectedToken {
            expected,
            found: found.kind,
            span: found.span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(err) => err.span(),
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnsupportedSyntax { span, .. }
            | ParseError::InvalidAssignmentTarget { span }
            | ParseError::TrailingInput { span } => *span,
        }
    }

    /// Short label for the offending source location.
    pub fn label(&self) -> String {
        match self {
            ParseError::Lex(_) => "here".to_string(),
            ParseError::UnexpectedToken { expected, .. } => format!("expected {expected}"),
            ParseError::UnsupportedSyntax { construct, .. } => {
                format!("{construct} is not allowed in a mutation procedure")
            }
            ParseError::InvalidAssignmentTarget { .. } => {
                "only variables, fields and indices can be assigned".to_string()
            }
            ParseError::TrailingInput { .. } => "procedure already ended".to_string(),
        }
    }
}
