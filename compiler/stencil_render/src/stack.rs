//! Stack growth for nested template rendering.
//!
//! Every sub-template call and nested conditional recurses through
//! `render_blocks`. The nesting limit bounds the template depth, not the
//! native stack a single level consumes, so deep nests grow the stack on
//! demand instead of overflowing it.

/// Keep at least this much native stack before descending a level.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passes_result_through() {
        let result: Result<&str, ()> = ensure_sufficient_stack(|| Ok("rendered"));
        assert_eq!(result, Ok("rendered"));
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        fn nest(depth: u32) -> String {
            ensure_sufficient_stack(|| {
                if depth == 0 {
                    String::new()
                } else {
                    let mut inner = nest(depth - 1);
                    inner.truncate(0);
                    inner
                }
            })
        }

        assert_eq!(nest(50_000), "");
    }
}
