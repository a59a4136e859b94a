//! Update errors and their source reports.

use ariadne::{Config, Label, Report, ReportKind, Source};
use imut_eval::EvalError;
use imut_ir::Span;
use imut_parse::ParseError;
use imut_paths::{AnalysisError, ArgumentShapeError, CompileError};
use thiserror::Error;

/// Name the procedure source is reported under.
const SOURCE_NAME: &str = "<procedure>";

/// Why an update produced no new root.
///
/// Every variant leaves the original root untouched: compile and resolve
/// failures stop before anything is copied, and an execution failure drops
/// the partially written copy.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("the procedure does not contain any assignments to its state parameter")]
    EmptyUpdate,

    #[error(transparent)]
    ArgumentShape(#[from] ArgumentShapeError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl From<CompileError> for UpdateError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Parse(err) => UpdateError::Parse(err),
            CompileError::Analysis(err) => UpdateError::Analysis(err),
        }
    }
}

impl UpdateError {
    /// Location in the procedure source, for errors that have one.
    pub fn span(&self) -> Option<Span> {
        match self {
            UpdateError::Parse(err) => Some(err.span()),
            UpdateError::Analysis(err) => Some(err.span()),
            UpdateError::Eval(err) => Some(err.span()),
            UpdateError::EmptyUpdate | UpdateError::ArgumentShape(_) => None,
        }
    }

    /// Whether the error was raised before the procedure ran.
    pub fn is_static(&self) -> bool {
        !matches!(self, UpdateError::Eval(_))
    }

    fn label(&self) -> String {
        match self {
            UpdateError::Parse(err) => err.label(),
            UpdateError::Analysis(err) => err.label().to_string(),
            UpdateError::EmptyUpdate => "no write through the state parameter".to_string(),
            UpdateError::ArgumentShape(_) => "called with an incompatible argument".to_string(),
            UpdateError::Eval(_) => "failed while running".to_string(),
        }
    }

    /// Uncolored `ariadne` report of this error against `source`, the text
    /// of the procedure that produced it. Errors without a location of their
    /// own point at the whole procedure.
    pub fn render(&self, source: &str) -> String {
        let range = self
            .span()
            .map_or(0..source.len(), Span::to_range);
        let range = range.start.min(source.len())..range.end.min(source.len());

        let mut bytes = Vec::new();
        let written = Report::build(ReportKind::Error, (SOURCE_NAME, range.clone()))
            .with_config(Config::default().with_color(false))
            .with_message(self.to_string())
            .with_label(Label::new((SOURCE_NAME, range)).with_message(self.label()))
            .finish()
            .write((SOURCE_NAME, Source::from(source)), &mut bytes);
        match written {
            Ok(()) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}
