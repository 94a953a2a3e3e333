//! Indexing behind `at` (`x[i]`).
//!
//! `at` receives its indices as an Arr because `x[i]` desugars to
//! `x.at([i])`; only the first index is used. An Int index may be negative
//! (counted from the end) and yields nil when out of range. A Range index
//! slices Python-style. Any other index falls back to a prop lookup by name.

use pangaea_ir::Name;

use crate::errors::{value_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{RangeValue, Value};

/// Bits addressable by `Int#at`.
const INT_BITS: usize = 64;

/// The first index in the `at` argument, if any.
fn first_index(interp: &Interpreter, indices: &Value) -> Option<Value> {
    interp.trace_arr(indices)?.first().cloned()
}

/// Normalize `i` against `len`; `None` when out of range.
fn position(len: usize, i: i64) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let i = if i < 0 { i + len } else { i };
    if (0..len).contains(&i) {
        usize::try_from(i).ok()
    } else {
        None
    }
}

/// Own-or-inherited prop by name, without `_missing`.
pub(crate) fn obj_at(interp: &Interpreter, recv: &Value, key: &Value) -> Value {
    match interp.trace_str(key) {
        Some(name) => interp
            .find_prop(recv, Name::intern(&name))
            .unwrap_or(Value::Nil),
        None => Value::Nil,
    }
}

/// `Obj#at`.
pub(crate) fn index_obj(interp: &Interpreter, recv: &Value, indices: &Value) -> Value {
    first_index(interp, indices).map_or(Value::Nil, |key| obj_at(interp, recv, &key))
}

/// `Arr#at`.
pub(crate) fn index_elems(
    interp: &Interpreter,
    recv: &Value,
    elems: &[Value],
    indices: &Value,
) -> EvalResult {
    let Some(index) = first_index(interp, indices) else {
        return Ok(Value::Nil);
    };
    let elem = |i: i64| position(elems.len(), i).map_or(Value::Nil, |k| elems[k].clone());
    match &index {
        Value::Int(i) => Ok(elem(*i)),
        Value::Range(r) => Ok(Value::arr(val_range(r, elems.len(), elem)?)),
        _ => Ok(obj_at(interp, recv, &index)),
    }
}

/// `Str#at`, by code point. A Range yields the joined slice.
pub(crate) fn index_str(
    interp: &Interpreter,
    recv: &Value,
    s: &str,
    indices: &Value,
) -> EvalResult {
    let Some(index) = first_index(interp, indices) else {
        return Ok(Value::Nil);
    };
    let chars: Vec<char> = s.chars().collect();
    let char_at = |i: i64| position(chars.len(), i).map(|k| chars[k]);
    match &index {
        Value::Int(i) => Ok(char_at(*i).map_or(Value::Nil, |c| Value::str(c.to_string()))),
        Value::Range(r) => {
            let mut out = String::new();
            for piece in val_range(r, chars.len(), |i| {
                char_at(i).map_or(Value::Nil, |c| Value::str(c.to_string()))
            })? {
                if let Value::Str(c) = piece {
                    out.push_str(&c);
                }
            }
            Ok(Value::str(out))
        }
        _ => Ok(obj_at(interp, recv, &index)),
    }
}

/// `Int#at`: bit `i` of the two's-complement form, LSB first. Negative
/// indices count down from the high bit.
pub(crate) fn index_bits(
    interp: &Interpreter,
    recv: &Value,
    n: i64,
    indices: &Value,
) -> EvalResult {
    let Some(index) = first_index(interp, indices) else {
        return Ok(Value::Nil);
    };
    let bit = |i: i64| position(INT_BITS, i).map_or(Value::Nil, |k| Value::Int((n >> k) & 1));
    match &index {
        Value::Int(i) => Ok(bit(*i)),
        Value::Range(r) => Ok(Value::arr(val_range(r, INT_BITS, bit)?)),
        _ => Ok(obj_at(interp, recv, &index)),
    }
}

/// Elements selected by `r` over a sequence of `len`, fetched with `elem`.
///
/// Each part must be an Int or nil; otherwise the slice is empty. The step
/// defaults to 1 and may be negative, which flips the default bounds.
pub(crate) fn val_range(
    r: &RangeValue,
    len: usize,
    elem: impl Fn(i64) -> Value,
) -> EvalResult<Vec<Value>> {
    let (Some(start), Some(stop), Some(step)) =
        (range_part(&r.start), range_part(&r.stop), range_part(&r.step))
    else {
        return Ok(Vec::new());
    };
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(value_err("cannot use 0 for range step"));
    }

    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let (default_start, default_stop) = if step > 0 { (0, len) } else { (len - 1, -1) };
    let start = start.map_or(default_start, |i| fix_bound(i, len, step));
    let stop = stop.map_or(default_stop, |i| fix_bound(i, len, step));

    let mut out = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        out.push(elem(i));
        let Some(next) = i.checked_add(step) else {
            break;
        };
        i = next;
    }
    Ok(out)
}

/// `Some(None)` for nil, `Some(Some(i))` for an Int, `None` otherwise.
fn range_part(v: &Value) -> Option<Option<i64>> {
    match v {
        Value::Nil => Some(None),
        Value::Int(i) => Some(Some(*i)),
        _ => None,
    }
}

/// Resolve a slice bound, counting negatives from the end. Bounds past
/// either end clamp to `[0, len]` for a forward step and to `[-1, len - 1]`
/// for a backward one.
fn fix_bound(i: i64, len: i64, step: i64) -> i64 {
    let i = if i < 0 { i.saturating_add(len) } else { i };
    if step > 0 {
        i.clamp(0, len)
    } else {
        i.clamp(-1, len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn range(start: Value, stop: Value, step: Value) -> RangeValue {
        RangeValue { start, stop, step }
    }

    fn ints(v: &[i64]) -> Vec<Value> {
        v.iter().map(|i| Value::Int(*i)).collect()
    }

    #[test]
    fn test_position_negative_and_out_of_range() {
        assert_eq!(position(3, 0), Some(0));
        assert_eq!(position(3, -1), Some(2));
        assert_eq!(position(3, -3), Some(0));
        assert_eq!(position(3, -4), None);
        assert_eq!(position(3, 3), None);
    }

    #[test]
    fn test_val_range_defaults() {
        let r = range(Value::Nil, Value::Nil, Value::Nil);
        assert_eq!(val_range(&r, 3, Value::Int).unwrap(), ints(&[0, 1, 2]));
    }

    #[test]
    fn test_val_range_negative_step_reverses() {
        let r = range(Value::Nil, Value::Nil, Value::Int(-1));
        assert_eq!(val_range(&r, 3, Value::Int).unwrap(), ints(&[2, 1, 0]));
    }

    #[test]
    fn test_val_range_clamps_bounds() {
        let r = range(Value::Int(-10), Value::Int(10), Value::Int(2));
        assert_eq!(val_range(&r, 5, Value::Int).unwrap(), ints(&[0, 2, 4]));
    }

    #[test]
    fn test_val_range_backward_bounds_clamp_to_last() {
        let r = range(Value::Int(5), Value::Nil, Value::Int(-1));
        assert_eq!(val_range(&r, 3, Value::Int).unwrap(), ints(&[2, 1, 0]));
        let r = range(Value::Int(2), Value::Int(-10), Value::Int(-1));
        assert_eq!(val_range(&r, 3, Value::Int).unwrap(), ints(&[2, 1, 0]));
        let r = range(Value::Int(-1), Value::Int(0), Value::Int(-2));
        assert_eq!(val_range(&r, 5, Value::Int).unwrap(), ints(&[4, 2]));
    }

    #[test]
    fn test_val_range_huge_step_stops() {
        let r = range(Value::Int(1), Value::Nil, Value::Int(i64::MAX));
        assert_eq!(val_range(&r, 3, Value::Int).unwrap(), ints(&[1]));
    }

    #[test]
    fn test_val_range_zero_step_is_value_err() {
        let r = range(Value::Int(0), Value::Int(2), Value::Int(0));
        let err = val_range(&r, 3, Value::Int).unwrap_err();
        assert_eq!(err.message, "cannot use 0 for range step");
    }

    #[test]
    fn test_val_range_non_int_part_is_empty() {
        let r = range(Value::str("a"), Value::Nil, Value::Nil);
        assert_eq!(val_range(&r, 3, Value::Int).unwrap(), Vec::<Value>::new());
    }
}
