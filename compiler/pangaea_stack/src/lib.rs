//! Stack growth for deeply nested scripts.
//!
//! The parser descends once per nesting level and the evaluator once per
//! AST node, so a long chain like `1.+(1).+(1)...` or a deeply recursive
//! user function would overflow the native stack. Recursive entry points wrap
//! their bodies in [`ensure_sufficient_stack`], which grows the stack on
//! demand via `stacker`.
//!
//! On `wasm32` the guard is a passthrough.

/// Grow when less than this much stack remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is below the red zone.
///
/// ```text
/// fn eval_expr(&mut self, expr: &Expr, env: &Env) -> EvalResult {
///     ensure_sufficient_stack(|| self.eval_expr_inner(expr, env))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nest(depth: u32) -> u32 {
        ensure_sufficient_stack(|| if depth == 0 { 0 } else { nest(depth - 1) + 1 })
    }

    #[test]
    fn test_guard_is_transparent() {
        assert_eq!(ensure_sufficient_stack(|| "chain"), "chain");
        assert_eq!(nest(16), 16);
    }

    #[test]
    fn test_deep_nesting_grows_stack() {
        // deeper than a test thread stack allows without growth
        assert_eq!(nest(200_000), 200_000);
    }

    #[test]
    fn test_propagates_results() {
        let parsed: Result<i64, String> = ensure_sufficient_stack(|| "42".parse().map_err(|_| "bad".to_string()));
        assert_eq!(parsed, Ok(42));
    }
}
