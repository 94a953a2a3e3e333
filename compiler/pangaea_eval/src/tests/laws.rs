//! Algebraic laws checked over generated inputs.

use proptest::prelude::*;

use crate::value::{format_float, quote_str};
use crate::{Interpreter, IoHandles, Value};

fn eval(src: &str) -> Option<Value> {
    Interpreter::builder()
        .io(IoHandles::buffered(""))
        .build()
        .eval_source(src)
        .ok()
}

fn arr_src(v: &[i64]) -> String {
    let elems: Vec<String> = v.iter().map(i64::to_string).collect();
    format!("[{}]", elems.join(", "))
}

fn ints(v: impl IntoIterator<Item = i64>) -> Value {
    Value::arr(v.into_iter().map(Value::Int).collect())
}

#[test]
fn test_scalars_read_back_from_s() {
    for src in ["nil", "true", "false", "[1, [2, nil], \"a\"]"] {
        let direct = eval(src);
        let read_back = eval(&format!("{src}.S.eval"));
        assert_eq!(read_back, direct, "{src}");
    }
}

#[allow(clippy::disallowed_types, reason = "proptest macros internally use Arc")]
mod generated {
    use super::*;

    proptest! {
        #[test]
        fn str_repeat_multiplies_len(s in "[a-z日本é ]{0,6}", n in 0i64..6) {
            let src = format!("({} * {n}).len", quote_str(&s));
            let expected = i64::try_from(s.chars().count()).unwrap_or(i64::MAX) * n;
            prop_assert_eq!(eval(&src), Some(Value::Int(expected)));
        }

        #[test]
        fn arr_concat_keeps_prefix_and_len(
            a in proptest::collection::vec(-100i64..100, 0..8),
            b in proptest::collection::vec(-100i64..100, 0..8),
        ) {
            let src = format!("{} + {}", arr_src(&a), arr_src(&b));
            let expected = ints(a.iter().chain(&b).copied());
            prop_assert_eq!(eval(&src), Some(expected));
            let len = format!("({src}).len");
            let total = i64::try_from(a.len() + b.len()).unwrap_or(i64::MAX);
            prop_assert_eq!(eval(&len), Some(Value::Int(total)));
        }

        #[test]
        fn int_reads_back_from_s(i in -1_000_000_000_000i64..1_000_000_000_000) {
            prop_assert_eq!(eval(&format!("{i}.S.eval")), Some(Value::Int(i)));
        }

        #[test]
        fn float_reads_back_from_repr(
            x in proptest::num::f64::NORMAL | proptest::num::f64::SUBNORMAL | proptest::num::f64::ZERO,
        ) {
            let src = format!("({}).repr.eval", format_float(x));
            prop_assert_eq!(eval(&src), Some(Value::Float(x)));
        }

        #[test]
        fn str_reads_back_from_repr(s in "[a-zA-Z0-9 _!?.\\\\\"\n\t]{0,16}") {
            let src = format!("{}.repr.eval", quote_str(&s));
            prop_assert_eq!(eval(&src), Some(Value::str(s.as_str())));
        }

        #[test]
        fn nil_is_additive_identity(i in -1000i64..1000, s in "[a-z]{0,4}") {
            prop_assert_eq!(eval(&format!("nil + {i}")), Some(Value::Int(i)));
            prop_assert_eq!(eval(&format!("{i} + nil")), Some(Value::Int(i)));
            let quoted = quote_str(&s);
            prop_assert_eq!(eval(&format!("nil + {quoted}")), Some(Value::str(s.as_str())));
            prop_assert_eq!(eval(&format!("{quoted} + nil")), Some(Value::str(s.as_str())));
            prop_assert_eq!(eval(&format!("[{i}] + nil")), Some(ints([i])));
        }

        #[test]
        fn reduce_folds_left(
            v in proptest::collection::vec(-50i64..50, 0..6),
            seed in -50i64..50,
        ) {
            let src = format!("f := {{|acc, x| acc * 2 + x}}; {}$({seed})^f", arr_src(&v));
            let expected = v.iter().fold(seed, |acc, x| acc * 2 + x);
            prop_assert_eq!(eval(&src), Some(Value::Int(expected)));
        }
    }
}
