use pretty_assertions::assert_eq;

use crate::errors::ErrKind;
use crate::interpreter::Interpreter;
use crate::io::IoHandles;
use crate::value::Value;

fn interp(input: &str) -> Interpreter {
    Interpreter::builder().io(IoHandles::buffered(input)).build()
}

fn eval(src: &str) -> Value {
    match interp("").eval_source(src) {
        Ok(v) => v,
        Err(e) => panic!("{src:?} raised {}", e.report()),
    }
}

fn eval_err(src: &str) -> ErrKind {
    match interp("").eval_source(src) {
        Ok(v) => panic!("{src:?} returned {v:?}"),
        Err(e) => e.kind,
    }
}

fn ints(v: &[i64]) -> Value {
    Value::arr(v.iter().copied().map(Value::Int).collect())
}

#[test]
fn test_scalar_prop_call() {
    assert_eq!(eval("3.+(4)"), Value::Int(7));
    assert_eq!(eval("\"ab\".uc"), Value::str("AB"));
}

#[test]
fn test_list_chain_squashes_nil() {
    assert_eq!(eval("[1, 2, 3]@{|x| x if x.odd?}"), ints(&[1, 3]));
    assert_eq!(eval("3@{|x| x * 10}"), ints(&[10, 20, 30]));
}

#[test]
fn test_strict_list_keeps_nil() {
    assert_eq!(
        eval("[1, 2, 3]=@{|x| x if x.odd?}"),
        Value::arr(vec![Value::Int(1), Value::Nil, Value::Int(3)])
    );
}

#[test]
fn test_strict_list_surfaces_errors() {
    assert_eq!(eval_err("[2, 0]=@{|x| 8 // x}"), ErrKind::ZeroDivisionErr);
}

#[test]
fn test_thoughtful_list_substitutes_element() {
    assert_eq!(eval("[2, 0, 4]~@{|x| 8 // x}"), ints(&[4, 0, 2]));
}

#[test]
fn test_lonely_skips_nil_receiver() {
    assert_eq!(eval("nil&.foo"), Value::Nil);
    assert_eq!(eval("1&.+(1)"), Value::Int(2));
    assert_eq!(eval_err("nil.foo"), ErrKind::NoPropErr);
}

#[test]
fn test_lonely_list_acts_per_element() {
    assert_eq!(eval("[1, nil, 2]&@{|x| x * 2}"), ints(&[2, 4]));
}

#[test]
fn test_thoughtful_scalar_recovers_receiver() {
    assert_eq!(eval("1~.foo"), Value::Int(1));
    assert_eq!(eval("5~.{|x| nil}"), Value::Int(5));
    assert_eq!(eval("5~.{|x| x + 1}"), Value::Int(6));
}

#[test]
fn test_reduce_prop_with_seed() {
    assert_eq!(eval("[1, 2, 3]$(0)+"), Value::Int(6));
    assert_eq!(eval("[\"a\", \"b\"]$(\"x\")+"), Value::str("xab"));
}

#[test]
fn test_reduce_without_seed_starts_from_nil() {
    assert_eq!(eval("[1, 2, 3]$+"), Value::Int(6));
}

#[test]
fn test_reduce_literal_passes_acc_and_elem() {
    assert_eq!(eval("[1, 2, 3]$([]){|acc, x| acc + [x * x]}"), ints(&[1, 4, 9]));
}

#[test]
fn test_thoughtful_reduce_skips_failed_steps() {
    assert_eq!(eval("[2, 0, 5]~$(100){|acc, x| acc // x}"), Value::Int(10));
}

#[test]
fn test_var_chain_uses_bound_func() {
    assert_eq!(eval("f := {|x| x * 3}; 2.^f"), Value::Int(6));
    assert_eq!(eval("add := {|a, b| a + b}; [1, 2, 3]$(10)^add"), Value::Int(16));
    assert_eq!(eval_err("1.^undefinedFunc"), ErrKind::NameErr);
}

#[test]
fn test_literal_call_spreads_arr_for_multiple_params() {
    assert_eq!(eval("[1, 2].{|a, b| a - b}"), Value::Int(-1));
    assert_eq!(eval("[1, 2].{|a| a}"), ints(&[1, 2]));
}

#[test]
fn test_anonymous_chain_uses_first_arg() {
    assert_eq!(
        eval("[\"a\", \"b\"]@{|| .uc}"),
        Value::arr(vec![Value::str("A"), Value::str("B")])
    );
}

#[test]
fn test_literal_proxy_takes_over_func_chain() {
    assert_eq!(
        eval("o := {_literalProxy: m{|f| f(10)}}; o.{|x| x + 1}"),
        Value::Int(11)
    );
}

#[test]
fn test_list_chain_over_diamond() {
    let interp = interp("a\nb\n");
    let v = interp.eval_source("<>@uc").ok();
    assert_eq!(v, Some(Value::arr(vec![Value::str("A"), Value::str("B")])));
}

#[test]
fn test_list_chain_on_non_iterable_is_type_err() {
    assert_eq!(eval_err("1.5@{|x| x}"), ErrKind::TypeErr);
}
