//! Stack safety utilities for deep recursion.
//!
//! Two tools live here, one per kind of depth:
//!
//! - [`Trampoline`] for traversals whose depth scales with the *input*
//!   (walking a parse graph, folding a value list, counting iterations).
//!   Each step returns either the final result or a thunk producing the
//!   next step, and [`Trampoline::compute`] drives the steps in a loop, so
//!   the call stack never grows with the size of the data.
//! - [`ensure_sufficient_stack`] for the descent through a *grammar*.
//!   Every token parse nests inside its parent's, and a `TokenRef` lets a
//!   grammar recurse once per record in the input, so each token parse
//!   first makes sure a red zone of native stack is left and switches to a
//!   fresh segment if it is not.
//!
//! On `wasm32` the runtime owns the stack and the guard is a plain call.

mod trampoline;

pub use trampoline::Trampoline;

/// Headroom every token parse needs before it recurses into its children.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Size of each segment switched to once the headroom is gone.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run one grammar step with at least the red zone of stack left.
///
/// ```text
/// fn parse(&self, env: &Environment) -> EngineResult<Option<ParseState>> {
///     ensure_sufficient_stack(|| self.parse_kind(env))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
