//! Stack growth for deeply nested evaluation.

/// Keep at least this much stack free before recursing (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Allocate this much more when the red zone is reached (1MB).
const GROW_BY: usize = 1024 * 1024;

/// Run `f`, first moving to a fresh stack segment if little remains.
#[inline]
pub(crate) fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROW_BY, f)
}
