use super::*;

fn nest(depth: &mut NestingDepth, remaining: u32) -> Result<u32, DepthExceeded> {
    if remaining == 0 {
        return Ok(depth.current());
    }
    depth.descend()?;
    let result = ensure_sufficient_stack(|| nest(depth, remaining - 1));
    depth.ascend();
    result
}

#[test]
fn test_deep_recursion_grows_stack() {
    fn deep_recurse(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { deep_recurse(n - 1) + 1 })
    }

    assert_eq!(deep_recurse(100_000), 100_000);
}

#[test]
fn test_nesting_within_limit() {
    let mut depth = NestingDepth::new();
    assert_eq!(nest(&mut depth, MAX_NESTING_DEPTH), Ok(MAX_NESTING_DEPTH));
    assert_eq!(depth.current(), 0);
}

#[test]
fn test_nesting_past_limit() {
    let mut depth = NestingDepth::with_limit(3);
    assert_eq!(nest(&mut depth, 4), Err(DepthExceeded { limit: 3 }));
    assert_eq!(depth.current(), 0);
}

#[test]
fn test_ascend_saturates() {
    let mut depth = NestingDepth::default();
    depth.ascend();
    assert_eq!(depth.current(), 0);
}
