//! Stack growth for recursive walks over syntax trees.
//!
//! Counting, cloning, comparing or printing a deeply nested tree (a long
//! `a + a + a + ...` chain folds into a left-leaning spine) recurses once per
//! level. Those walks go through [`ensure_sufficient_stack`] so nesting depth
//! is bounded by memory, not by the native stack. Dropping a tree does not
//! recurse at all.

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Grow when less than this much stack is left (100KB).
    const RED_ZONE: usize = 100 * 1024;

    /// Size of each new stack segment (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack; call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
