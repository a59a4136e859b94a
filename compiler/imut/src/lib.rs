//! Imut - immutable updates of value trees, written as mutation procedures.
//!
//! A procedure such as `(s, id) => { s.todos.get(id).done = true }` reads
//! like an in-place edit. [`update`] analyzes its text once to learn which
//! paths it writes, copies only the nodes along those paths, and runs the
//! procedure against the copy. Every other subtree of the result is the
//! original subtree, by identity.
//!
//! # Architecture
//!
//! ```text
//! source ──► PathCache::compile ──► lex + parse + extract (once per text)
//!                 │
//!                 ▼
//!            resolve(args) ──► SelectiveCloner ──► Interpreter ──► deep_freeze?
//! ```
//!
//! - `imut_paths`: path extraction, the compile cache, argument resolution
//! - `imut_eval`: selective cloning and the procedure interpreter
//! - `imut_value`: the shared value model
//!
//! The library installs no tracing subscriber; see [`init_tracing`].

mod error;
mod options;
mod update;

pub use error::UpdateError;
pub use options::{
    default_options, runtime_mode, set_default_options, setup, ConfigError, RuntimeMode,
    UpdateOptions, MODE_ENV_VAR,
};
pub use update::{update, Update};

pub use imut_eval::{EvalError, StructuralCloneWarning};
pub use imut_parse::ParseError;
pub use imut_paths::{
    AnalysisError, ArgumentShapeError, CacheStats, CompileError, Compiled, Effect, Path,
    PathCache, Segment,
};
pub use imut_value::{Class, Date, Fields, Heap, Record, Value, WriteError};

use std::sync::{Arc, Once};

/// Compiled form of `source` from the process-wide cache.
pub fn compile(source: &str) -> Result<Arc<Compiled>, UpdateError> {
    Ok(PathCache::global().compile(source)?)
}

/// Write paths of `source`, from the process-wide cache.
pub fn extract_paths(source: &str) -> Result<Vec<Path>, UpdateError> {
    Ok(PathCache::global().extract_paths(source)?)
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Only installs a subscriber when `RUST_LOG` is set. Safe to call more
/// than once.
///
/// # Usage
///
/// ```bash
/// RUST_LOG=imut=debug cargo test -p imut
/// RUST_LOG=imut_paths=trace,imut_eval=trace cargo test -p imut
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
