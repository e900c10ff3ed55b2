//! Trampolined computations.
//!
//! A [`Trampoline`] is either a completed result or an intermediate step
//! holding a thunk that produces the next step. Writing a traversal as a
//! function that returns `Trampoline::intermediate(move || recurse(..))`
//! instead of calling itself turns call-stack recursion into heap-allocated
//! iteration: [`Trampoline::compute`] forces thunks in a loop until a
//! completed result appears.
//!
//! ```text
//! fn count(list: &ImmutableList<u8>, acc: usize) -> Trampoline<'_, usize> {
//!     match list.tail() {
//!         Ok(tail) => Trampoline::intermediate(move || count(tail, acc + 1)),
//!         Err(_) => Trampoline::complete(acc),
//!     }
//! }
//! ```

use std::fmt;

/// Boxed continuation of an intermediate step.
type Thunk<'a, T> = Box<dyn FnOnce() -> Trampoline<'a, T> + 'a>;

/// A computation that is either done or has one more step to run.
pub enum Trampoline<'a, T> {
    /// The final result.
    Complete(T),
    /// More work: calling the thunk yields the next state.
    Intermediate(Thunk<'a, T>),
}

impl<'a, T> Trampoline<'a, T> {
    /// A finished computation.
    #[inline]
    pub fn complete(value: T) -> Self {
        Trampoline::Complete(value)
    }

    /// A computation that continues with `next`.
    #[inline]
    pub fn intermediate(next: impl FnOnce() -> Trampoline<'a, T> + 'a) -> Self {
        Trampoline::Intermediate(Box::new(next))
    }

    /// Returns `true` if no steps remain.
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, Trampoline::Complete(_))
    }

    /// Drive the computation to completion.
    ///
    /// Runs in constant stack space regardless of how many intermediate
    /// steps the computation takes.
    pub fn compute(self) -> T {
        let mut current = self;
        loop {
            match current {
                Trampoline::Complete(value) => return value,
                Trampoline::Intermediate(next) => current = next(),
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Trampoline<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trampoline::Complete(value) => f.debug_tuple("Complete").field(value).finish(),
            Trampoline::Intermediate(_) => f.write_str("Intermediate(..)"),
        }
    }
}

#[cfg(test)]
mod tests;
