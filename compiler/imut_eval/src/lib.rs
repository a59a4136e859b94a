//! Imut Eval - selective cloning and procedure execution.
//!
//! # Architecture
//!
//! - [`SelectiveCloner`]: copies the nodes on the resolved write paths and
//!   shares the rest of the state tree
//! - [`Interpreter`]: runs a parsed procedure against the copy
//! - `Environment`: scope stack of bindings
//! - `evaluate_binary` / `evaluate_unary`: direct enum-based operator dispatch

mod clone;
mod environment;
pub mod errors;
mod interpreter;
mod operators;

pub use clone::{Cloned, SelectiveCloner};
pub use environment::Mutability;
pub use errors::{EvalError, EvalResult, StructuralCloneWarning};
pub use interpreter::Interpreter;
pub use operators::{evaluate_binary, evaluate_unary};
