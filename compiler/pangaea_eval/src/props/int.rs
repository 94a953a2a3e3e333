//! `Int`, also the prototype of `true` and `false`.

use super::num::{int_operands, operands, Operands};
use super::{arg, check_arity, index_bits, int_arg, iter_over, PropContainer};
use crate::errors::{cannot_treat, value_err, zero_division_err, EvalResult};
use crate::value::Value;

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Int", "<=>", |interp, _, _, args| {
        Ok(Value::Int(match operands(interp, args, 0, "Int#<=>")? {
            Operands::Ints(a, b) => ord_int(a.cmp(&b)),
            Operands::Floats(a, b) => ord_int(a.total_cmp(&b)),
        }))
    });
    c.builtin("Int", "==", |interp, _, _, args| {
        check_arity(args, 2, "Int#==")?;
        let (Some(a), Some(b)) = (interp.trace_int(&args[0]), interp.trace_int(&args[1])) else {
            return Ok(Value::Bool(false));
        };
        Ok(Value::Bool(a == b))
    });
    c.builtin("Int", "+%", |interp, _, _, args| {
        Ok(Value::Int(int_arg(interp, args, 0)?))
    });
    c.builtin("Int", "-%", |interp, _, _, args| {
        Ok(Value::Int(int_arg(interp, args, 0)?.wrapping_neg()))
    });
    c.builtin("Int", "/~", |interp, _, _, args| {
        Ok(Value::Int(!int_arg(interp, args, 0)?))
    });
    c.builtin("Int", "+", |interp, _, _, args| {
        Ok(match operands(interp, args, 0, "Int#+")? {
            Operands::Ints(a, b) => Value::Int(a.wrapping_add(b)),
            Operands::Floats(a, b) => Value::Float(a + b),
        })
    });
    c.builtin("Int", "-", |interp, _, _, args| {
        Ok(match operands(interp, args, 0, "Int#-")? {
            Operands::Ints(a, b) => Value::Int(a.wrapping_sub(b)),
            Operands::Floats(a, b) => Value::Float(a - b),
        })
    });
    c.builtin("Int", "*", |interp, _, _, args| {
        Ok(match operands(interp, args, 1, "Int#*")? {
            Operands::Ints(a, b) => Value::Int(a.wrapping_mul(b)),
            Operands::Floats(a, b) => Value::Float(a * b),
        })
    });
    c.builtin("Int", "**", |interp, _, _, args| {
        Ok(match operands(interp, args, 1, "Int#**")? {
            Operands::Ints(a, b) => int_pow(a, b),
            Operands::Floats(a, b) => Value::Float(a.powf(b)),
        })
    });
    c.builtin("Int", "/", |interp, _, _, args| {
        let (a, b) = match operands(interp, args, 1, "Int#/")? {
            Operands::Ints(a, b) => (a as f64, b as f64),
            Operands::Floats(a, b) => (a, b),
        };
        if b == 0.0 {
            return Err(zero_division_err());
        }
        Ok(Value::Float(a / b))
    });
    c.builtin("Int", "//", |interp, _, _, args| {
        let (a, b) = int_operands(interp, args, 1, "Int#//")?;
        floor_div(a, b).map(Value::Int)
    });
    c.builtin("Int", "%", |interp, _, _, args| {
        let (a, b) = int_operands(interp, args, 1, "Int#%")?;
        if b == 0 {
            return Err(zero_division_err());
        }
        Ok(Value::Int(a.wrapping_rem(b)))
    });
    c.builtin("Int", "/&", |interp, _, _, args| {
        let (a, b) = int_operands(interp, args, -1, "Int#/&")?;
        Ok(Value::Int(a & b))
    });
    c.builtin("Int", "/|", |interp, _, _, args| {
        let (a, b) = int_operands(interp, args, 0, "Int#/|")?;
        Ok(Value::Int(a | b))
    });
    c.builtin("Int", "/^", |interp, _, _, args| {
        let (a, b) = int_operands(interp, args, 0, "Int#/^")?;
        Ok(Value::Int(a ^ b))
    });
    c.builtin("Int", "<<", |interp, _, _, args| {
        let (a, b) = int_operands(interp, args, 0, "Int#<<")?;
        Ok(Value::Int(a.wrapping_shl(shift_amount(b)?)))
    });
    c.builtin("Int", ">>", |interp, _, _, args| {
        let (a, b) = int_operands(interp, args, 0, "Int#>>")?;
        Ok(Value::Int(a.wrapping_shr(shift_amount(b)?)))
    });
    c.builtin("Int", "_incBy", |interp, _, _, args| {
        let (a, b) = int_operands(interp, args, 0, "Int#_incBy")?;
        Ok(Value::Int(a.wrapping_add(b)))
    });

    c.builtin("Int", "_iter", |interp, _, _, args| {
        let n = int_arg(interp, args, 0)?;
        Ok(iter_over((1..=n).map(Value::Int).collect()))
    });
    c.builtin("Int", "at", |interp, _, _, args| {
        let n = int_arg(interp, args, 0)?;
        index_bits(interp, &args[0], n, &arg(args, 1))
    });
    c.builtin("Int", "B", |interp, _, _, args| {
        Ok(Value::Bool(int_arg(interp, args, 0)? != 0))
    });
    c.builtin("Int", "bear", |_, _, _, args| {
        check_arity(args, 1, "Int#bear")?;
        match &args[0] {
            // true and false are leaves
            Value::Bool(_) => Ok(args[0].clone()),
            recv => super::base_obj::bear(recv, args.get(1), "Int#bear"),
        }
    });
    c.builtin("Int", "chr", |interp, _, _, args| {
        let n = int_arg(interp, args, 0)?;
        u32::try_from(n)
            .ok()
            .and_then(char::from_u32)
            .map(|ch| Value::str(ch.to_string()))
            .ok_or_else(|| value_err(format!("{n} cannot be converted into char")))
    });
    c.builtin("Int", "I", |interp, _, _, args| {
        Ok(Value::Int(int_arg(interp, args, 0)?))
    });
    c.builtin("Int", "new", |interp, _, _, args| {
        let x = arg(args, 1);
        if let Some(i) = interp.trace_int(&x) {
            return Ok(Value::Int(i));
        }
        match interp.trace_float(&x) {
            Some(f) if f.is_finite() => Ok(Value::Int(truncate(f))),
            _ => Err(cannot_treat(&x, "int")),
        }
    });
    c.builtin("Int", "prime?", |interp, _, _, args| {
        Ok(Value::Bool(is_prime(int_arg(interp, args, 0)?)))
    });
    c.builtin("Int", "sqrt", |interp, _, _, args| {
        let n = int_arg(interp, args, 0)?;
        if n < 0 {
            return Err(value_err(format!("sqrt of {n} is not a real number")));
        }
        Ok(Value::Float((n as f64).sqrt()))
    });
    c.builtin("Int", "even?", |interp, _, _, args| {
        Ok(Value::Bool(int_arg(interp, args, 0)? % 2 == 0))
    });
    c.builtin("Int", "odd?", |interp, _, _, args| {
        Ok(Value::Bool(int_arg(interp, args, 0)? % 2 != 0))
    });
    c.builtin("Int", "abs", |interp, _, _, args| {
        Ok(Value::Int(int_arg(interp, args, 0)?.wrapping_abs()))
    });
    c.builtin("Int", "S", |interp, _, kwargs, args| {
        check_arity(args, 1, "Int#S")?;
        match &args[0] {
            Value::Bool(b) => Ok(Value::str(b.to_string())),
            _ => {
                let n = int_arg(interp, args, 0)?;
                super::obj::formatted_str(interp, &Value::Int(n), kwargs)
            }
        }
    });
}

fn ord_int(ord: std::cmp::Ordering) -> i64 {
    ord as i64
}

#[allow(clippy::cast_possible_truncation)]
pub(super) fn truncate(f: f64) -> i64 {
    f.trunc() as i64
}

/// Exact when the result fits an Int, else a Float.
fn int_pow(a: i64, b: i64) -> Value {
    u32::try_from(b)
        .ok()
        .and_then(|exp| a.checked_pow(exp))
        .map_or_else(|| Value::Float((a as f64).powf(b as f64)), Value::Int)
}

/// Quotient rounded toward negative infinity.
fn floor_div(a: i64, b: i64) -> EvalResult<i64> {
    if b == 0 {
        return Err(zero_division_err());
    }
    let q = a.wrapping_div(b);
    if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

fn shift_amount(b: i64) -> EvalResult<u32> {
    u32::try_from(b)
        .ok()
        .filter(|b| *b < 64)
        .ok_or_else(|| value_err(format!("shift amount {b} must be within (0:64)")))
}

/// Deterministic Miller-Rabin over the full `i64` range.
fn is_prime(n: i64) -> bool {
    const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    let Ok(n) = u64::try_from(n) else {
        return false;
    };
    if n < 2 {
        return false;
    }
    for p in WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }
    let mut d = n - 1;
    let mut r = 0;
    while d % 2 == 0 {
        d /= 2;
        r += 1;
    }
    'witness: for a in WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..r {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[allow(clippy::cast_possible_truncation)]
fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    (u128::from(a) * u128::from(b) % u128::from(m)) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_floor_div_rounds_down() {
        assert_eq!(floor_div(7, 2).unwrap(), 3);
        assert_eq!(floor_div(-7, 2).unwrap(), -4);
        assert_eq!(floor_div(7, -2).unwrap(), -4);
        assert_eq!(floor_div(-1, 2).unwrap(), -1);
        assert_eq!(floor_div(-8, 2).unwrap(), -4);
    }

    #[test]
    fn test_floor_div_by_zero() {
        let err = floor_div(1, 0).unwrap_err();
        assert_eq!(err.message, "cannot be divided by 0");
    }

    #[test]
    fn test_int_pow_falls_back_to_float() {
        assert_eq!(int_pow(2, 10), Value::Int(1024));
        assert_eq!(int_pow(2, -1), Value::Float(0.5));
        assert!(matches!(int_pow(10, 40), Value::Float(_)));
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<i64> = (0..30).filter(|n| is_prime(*n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(is_prime(1_000_000_007));
        assert!(!is_prime(1_000_000_007 * 3));
        assert!(!is_prime(-7));
    }
}
