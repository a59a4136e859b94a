//! Stack growth guard for deep recursion.
//!
//! Every recursive walk in the workspace goes through [`ensure_sufficient_stack`]:
//! the parser (nested member chains and literals), the selective cloner and the
//! deep freezer (value trees of arbitrary depth), and the interpreter.
//!
//! On native targets the `stacker` crate allocates a new segment when the
//! remaining stack drops below the red zone. On `wasm32` the closure is simply
//! called.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM version: the host manages the stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
