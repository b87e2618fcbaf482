//! Stack growth for deep recursion.
//!
//! Every lazy-rule resolution is a point where input nesting becomes call
//! depth, so the matcher runs those through [`ensure_sufficient_stack`].
//!
//! - **Native targets**: `stacker::maybe_grow` allocates a new stack segment
//!   when less than the red zone remains.
//! - **WASM targets**: no-op passthrough (WASM manages its own stack).

/// Run `f`, first growing the stack if less than `red_zone` bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(red_zone: usize, growth: usize, f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(red_zone, growth, f)
}

/// WASM version - just call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(_red_zone: usize, _growth: usize, f: impl FnOnce() -> R) -> R {
    f()
}
