//! Whole-language tests: scripts in, values and output out.

mod laws;

use pretty_assertions::assert_eq;

use crate::{ErrKind, EvalError, Interpreter, IoHandles, Value};

fn run(src: &str) -> (Result<Value, EvalError>, String) {
    let io = IoHandles::buffered("");
    let interp = Interpreter::builder().io(io.clone()).build();
    let result = interp.eval_source(src);
    (result, io.output())
}

fn eval(src: &str) -> Value {
    match run(src).0 {
        Ok(v) => v,
        Err(e) => panic!("{src:?} raised {}", e.report()),
    }
}

fn eval_err(src: &str) -> EvalError {
    match run(src).0 {
        Ok(v) => panic!("{src:?} returned {v:?}"),
        Err(e) => e,
    }
}

fn strs(v: &[&str]) -> Value {
    Value::arr(v.iter().map(|s| Value::str(*s)).collect())
}

fn ints(v: &[i64]) -> Value {
    Value::arr(v.iter().copied().map(Value::Int).collect())
}

#[test]
fn test_embedded_string() {
    assert_eq!(eval(r#""Hello, #{ "world" }!""#), Value::str("Hello, world!"));
}

#[test]
fn test_iter_recur_sequence() {
    assert_eq!(
        eval("<{|a| yield a; recur(a+1)}>.new(1).{|it| [it.next, it.next, it.next]}"),
        ints(&[1, 2, 3])
    );
}

#[test]
fn test_list_chain_squashes_nil_names() {
    assert_eq!(
        eval("[{name: 'Taro}, {name: nil}, {name: 'Jiro}]@name"),
        strs(&["Taro", "Jiro"])
    );
}

#[test]
fn test_strict_list_chain_keeps_nil_names() {
    assert_eq!(
        eval("[{name: 'Taro}, {name: nil}, {name: 'Jiro}]=@name"),
        Value::arr(vec![Value::str("Taro"), Value::Nil, Value::str("Jiro")])
    );
}

#[test]
fn test_reduce_with_seed() {
    assert_eq!(eval("[1, 2, 3]$(0)+"), Value::Int(6));
}

#[test]
fn test_defers_run_in_order_after_return() {
    let (result, out) = run(r#"{|i| defer "one".p; defer "two".p; return i}(1)"#);
    assert_eq!(result.ok(), Some(Value::Int(1)));
    assert_eq!(out, "one\ntwo\n");
}

#[test]
fn test_int_bits_by_range() {
    assert_eq!(eval("5[0:3]"), ints(&[1, 0, 1]));
}

#[test]
fn test_str_index_by_code_point() {
    assert_eq!(eval(r#""日本語"[1]"#), Value::str("本"));
}

#[test]
fn test_bear_adds_only_own_pairs() {
    assert_eq!(
        eval("{a: 1}.bear({b: 2}).keys(private?: true)"),
        strs(&["b"])
    );
}

#[test]
fn test_map_non_hashable_key_lookup() {
    assert_eq!(eval("%{[1,2]: 3}[[1,2]]"), Value::Int(3));
}

#[test]
fn test_bear_keeps_proto_and_equality() {
    assert_eq!(eval("o := {a: 1}; o.bear({b: 2}).proto == o"), Value::Bool(true));
    assert_eq!(eval("o := {a: 1}; o.bear({}) == o"), Value::Bool(true));
}

#[test]
fn test_yield_continues_and_return_wins() {
    assert_eq!(eval("{|| yield 1; yield 2; 3}()"), Value::Int(1));
    assert_eq!(eval("{|| yield 1; return 2}()"), Value::Int(2));
    assert_eq!(eval("{|| 1; 2}()"), Value::Int(2));
    assert_eq!(eval("{||}()"), Value::Nil);
}

#[test]
fn test_conditional_return_falls_through() {
    assert_eq!(eval("{|x| return 1 if x; 2}(false)"), Value::Int(2));
    assert_eq!(eval("{|x| return 1 if x; 2}(true)"), Value::Int(1));
}

#[test]
fn test_conditional_yield_stops_iteration() {
    assert_eq!(
        eval("<{|a| yield a if a <= 3; recur(a + 1)}>.new(1)@{|x| x * x}"),
        ints(&[1, 4, 9])
    );
}

#[test]
fn test_iter_new_leaves_original_untouched() {
    let src = "
        it := <{|a| yield a; recur(a + 2)}>.new(0)
        it.next
        fresh := it.new(10)
        [it.next, fresh.next, it.next]
    ";
    assert_eq!(eval(src), ints(&[2, 10, 4]));
}

#[test]
fn test_deferred_error_replaces_outcome() {
    let (result, out) = run("{|| defer 1 // 0; defer \"after\".p; 1}()");
    assert_eq!(result.err().map(|e| e.kind), Some(ErrKind::ZeroDivisionErr));
    assert_eq!(out, "after\n");
}

#[test]
fn test_builtin_iteration_orders() {
    assert_eq!(eval("\"añb\"@{|c| c}"), strs(&["a", "ñ", "b"]));
    assert_eq!(eval("(1:10:3)@{|x| x}"), ints(&[1, 4, 7]));
    assert_eq!(eval("(5:1:-2)@{|x| x}"), ints(&[5, 3]));
    assert_eq!(
        eval("{b: 2, a: 1, _c: 3}@{|k, v| k}"),
        strs(&["a", "b"])
    );
}

#[test]
fn test_range_step_zero_is_value_err() {
    assert_eq!(eval_err("(1:5:0)@{|x| x}").kind, ErrKind::ValueErr);
}

#[test]
fn test_negative_and_out_of_range_indices() {
    assert_eq!(eval("[1, 2, 3][-1]"), Value::Int(3));
    assert_eq!(eval("[1, 2, 3][-3]"), Value::Int(1));
    assert_eq!(eval("[1, 2, 3][3]"), Value::Nil);
    assert_eq!(eval("[1, 2, 3][-4]"), Value::Nil);
    assert_eq!(eval("\"abc\"[::-1]"), Value::str("cba"));
    assert_eq!(eval("[1, 2, 3, 4][1:3]"), ints(&[2, 3]));
}

#[test]
fn test_obj_index_is_prop_lookup() {
    assert_eq!(eval("{a: 1}[\"a\"]"), Value::Int(1));
    assert_eq!(eval("{a: 1}[\"b\"]"), Value::Nil);
}

#[test]
fn test_division_by_zero() {
    for src in ["1 / 0", "1 // 0", "1 % 0"] {
        assert_eq!(eval_err(src).kind, ErrKind::ZeroDivisionErr, "{src}");
    }
}

#[test]
fn test_arithmetic() {
    assert_eq!(eval("7 / 2"), Value::Float(3.5));
    assert_eq!(eval("7 // 2"), Value::Int(3));
    assert_eq!(eval("-7 // 2"), Value::Int(-4));
    assert_eq!(eval("2 ** 10"), Value::Int(1024));
    assert_eq!(eval("1 + 0.5"), Value::Float(1.5));
    assert_eq!(eval("true + 1"), Value::Int(2));
}

#[test]
fn test_bool_is_int_alias() {
    assert_eq!(eval("1 == true"), Value::Bool(true));
    assert_eq!(eval("true.S"), Value::str("true"));
    assert_eq!(eval("false.repr"), Value::str("false"));
}

#[test]
fn test_boolification() {
    for (src, expected) in [
        ("[].B", false),
        ("[0].B", true),
        ("\"\".B", false),
        ("0.B", false),
        ("0.0.B", false),
        ("nil.B", false),
        ("{}.B", false),
        ("%{}.B", false),
        ("{|| nil}.B", true),
        ("(1:2).B", true),
    ] {
        assert_eq!(eval(src), Value::Bool(expected), "{src}");
    }
}

#[test]
fn test_str_and_repr() {
    assert_eq!(eval("\"a\".S"), Value::str("a"));
    assert_eq!(eval("\"a\".repr"), Value::str("\"a\""));
    assert_eq!(eval("[1, \"a\"].S"), Value::str("[1, \"a\"]"));
    assert_eq!(eval("0.1.S"), Value::str("0.1"));
}

#[test]
fn test_print_end_kwarg() {
    let (_, out) = run(r#"1.p; "x".p(end: "!"); [1].p"#);
    assert_eq!(out, "1\nx![1]\n");
}

#[test]
fn test_str_eval_and_eval_env() {
    assert_eq!(eval("\"1 + 2\".eval"), Value::Int(3));
    assert_eq!(eval("\"a := 1; b := 2\".evalEnv.keys"), strs(&["a", "b"]));
    assert_eq!(eval_err("\"1 +\".eval").kind, ErrKind::SyntaxErr);
}

#[test]
fn test_err_values() {
    assert_eq!(eval("ValueErr.new(\"x\").msg"), Value::str("x"));
    assert_eq!(eval("ValueErr.new(\"x\").S"), Value::str("ValueErr: x"));
    assert_eq!(eval("ValueErr.new(\"x\").type == ValueErr"), Value::Bool(true));
    let e = eval_err("raise TypeErr.new(\"boom\")");
    assert_eq!((e.kind, e.message.as_str()), (ErrKind::TypeErr, "boom"));
    assert_eq!(eval_err("raise 1").kind, ErrKind::TypeErr);
}

#[test]
fn test_kernel_assertions() {
    assert_eq!(eval("assert(1)"), Value::Nil);
    assert_eq!(eval_err("assert(0)").kind, ErrKind::AssertionErr);
    assert_eq!(eval_err("assertEq(1, 2)").kind, ErrKind::AssertionErr);
    assert_eq!(
        eval("assertRaises(ZeroDivisionErr, \"cannot be divided by 0\", {|| 1 // 0})"),
        Value::Nil
    );
    assert_eq!(
        eval_err("assertRaises(ValueErr, \"x\", {|| 1})").kind,
        ErrKind::AssertionErr
    );
}

#[test]
fn test_undefined_name() {
    assert_eq!(eval_err("undefinedName").kind, ErrKind::NameErr);
}

#[test]
fn test_error_trace_grows_while_unwinding() {
    let e = eval_err("f := {|x| x.foo}\nf(1)");
    let report = e.report();
    assert!(
        report.starts_with("NoPropErr: property `foo` is not defined."),
        "{report}"
    );
    assert!(report.contains("line: 1, col: "), "{report}");
    assert!(report.contains("line: 2, col: 1\nf(1)"), "{report}");
}

#[test]
fn test_recursive_trace_has_no_adjacent_duplicates() {
    let e = eval_err("f := {|n| raise ValueErr.new(\"x\") if n == 0; f(n - 1)}\nf(50)");
    let lines: Vec<&str> = e.stack_trace.lines().collect();
    let segments: Vec<&[&str]> = lines.chunks(2).collect();
    assert!(segments.windows(2).all(|w| w[0] != w[1]), "{}", e.stack_trace);
    let mut distinct = segments.clone();
    distinct.sort_unstable();
    distinct.dedup();
    assert!(distinct.len() <= 3, "{}", e.stack_trace);
}

#[test]
fn test_deep_recursion() {
    assert_eq!(
        eval("f := {|n| 0 if n == 0 else f(n - 1) + 1}; f(1000)"),
        Value::Int(1000)
    );
}

#[test]
fn test_unpacking() {
    assert_eq!(eval("a := [2, 3]; [1, *a]"), ints(&[1, 2, 3]));
    assert_eq!(eval("{|a, b| a - b}(*[5, 2])"), Value::Int(3));
    assert_eq!(eval("{|k: 0| k}(**{k: 4})"), Value::Int(4));
}

#[test]
fn test_kwargs_and_positional_vars() {
    assert_eq!(eval("{|a, k: 10| a + k}(1, k: 2)"), Value::Int(3));
    assert_eq!(eval("{|a, k: 10| a + k}(1)"), Value::Int(11));
    assert_eq!(eval("{|| \\1 + \\2}(3, 4)"), Value::Int(7));
    assert_eq!(eval("{|| \\0}(3, 4)"), ints(&[3, 4]));
}

#[test]
fn test_closures_capture_and_assign_locally() {
    assert_eq!(
        eval("make := {|n| {|x| x + n}}; add2 := make(2); add2(5)"),
        Value::Int(7)
    );
    assert_eq!(eval("n := 1; f := {|| n := 5; n}; f(); n"), Value::Int(1));
}

#[test]
fn test_which_finds_owner() {
    assert_eq!(eval("1.which(\"+\") == Int"), Value::Bool(true));
    assert_eq!(eval("1.which(\"p\") == Obj"), Value::Bool(true));
    assert_eq!(eval("1.which(\"nope\")"), Value::Nil);
}

#[test]
fn test_missing_handles_unknown_props() {
    assert_eq!(
        eval("o := {_missing: m{|name| name + \"!\"}}; o.hello"),
        Value::str("hello!")
    );
}

#[test]
fn test_diamond_reads_lines() {
    let io = IoHandles::buffered("x\ny\n");
    let interp = Interpreter::builder().io(io.clone()).build();
    let v = interp.eval_source("[<>.S, <>.uc, <>.S]").ok();
    assert_eq!(v, Some(strs(&["x", "Y", ""])));
}

#[test]
fn test_argv() {
    let interp = Interpreter::builder()
        .io(IoHandles::buffered(""))
        .argv(vec!["a".into(), "b".into()])
        .build();
    assert_eq!(interp.eval_source("Kernel.argv").ok(), Some(strs(&["a", "b"])));
}

#[test]
fn test_err_prototypes_print_by_name() {
    assert_eq!(eval("ValueErr.S"), Value::str("ValueErr"));
    assert_eq!(eval("Err.repr"), Value::str("Err"));
    let (result, out) = run("ValueErr.new(\"v\").type.p");
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(out, "ValueErr\n");
}

#[test]
fn test_explicit_kwarg_beats_unpacked() {
    assert_eq!(
        eval("{|a: 1, b: 2| [\\a, \\b]}(a: 3, **{a: 6, b: 9})"),
        ints(&[3, 9])
    );
    assert_eq!(
        eval("{|a: 1| a}(**{a: 6}, **{a: 7})"),
        Value::Int(6)
    );
}

#[test]
fn test_local_funcs_survive_their_frame_when_escaping() {
    let src = "
        make := {|| fact := {|n| 1 if n <= 1 else n * fact(n - 1)}; fact}
        make()(5)
    ";
    assert_eq!(eval(src), Value::Int(120));
    assert_eq!(eval("{|| g := {|x| x * 2}; g(3)}()"), Value::Int(6));
    assert_eq!(
        eval("<{|a| double := {|x| x * 2}; yield double(a) if a < 3; recur(a + 1)}>.new(0)@{|x| x}"),
        ints(&[0, 2, 4])
    );
}

#[test]
fn test_prototype_chains_end_at_base_obj() {
    assert_eq!(eval("Int.proto.proto.proto == BaseObj"), Value::Bool(true));
    assert_eq!(eval("1.proto.proto.proto.proto == BaseObj"), Value::Bool(true));
    assert_eq!(eval("ValueErr.proto.proto.proto == BaseObj"), Value::Bool(true));
    assert_eq!(eval("EitherVal.proto.proto.proto == BaseObj"), Value::Bool(true));
    assert_eq!(eval("BaseObj.proto"), Value::Nil);
    assert_eq!(eval("{}.proto.proto == BaseObj"), Value::Bool(true));
}

#[test]
fn test_missing_is_inherited_and_base_obj_has_none() {
    let src = "p := {_missing: m{|name| name + \"?\"}}; c := p.bear({a: 1}); [c.a, c.zzz]";
    assert_eq!(eval(src), Value::arr(vec![Value::Int(1), Value::str("zzz?")]));
    assert_eq!(eval_err("{}.zzz").kind, ErrKind::NoPropErr);
    assert_eq!(eval_err("BaseObj.zzz").kind, ErrKind::NoPropErr);
}

#[test]
fn test_repeat_rejects_huge_counts() {
    for src in [
        "\"abc\" * 9223372036854775807",
        "\"a\" * 1000000000000",
        "[1] * 9223372036854775807",
        "\"a\" * -1",
    ] {
        assert_eq!(eval_err(src).kind, ErrKind::ValueErr, "{src}");
    }
    assert_eq!(eval("\"ab\" * 2"), Value::str("abab"));
}

#[test]
fn test_inc_by_overflow_is_value_err() {
    let e = eval_err("\"a\"._incBy(9223372036854775807)");
    assert_eq!(e.kind, ErrKind::ValueErr);
    assert_eq!(eval("\"a\"._incBy(2)"), Value::str("c"));
}

#[test]
fn test_range_iteration_stops_before_overflow() {
    assert_eq!(
        eval("(9223372036854775800:9223372036854775807:5)@{|x| x}"),
        ints(&[9_223_372_036_854_775_800, 9_223_372_036_854_775_805])
    );
    assert_eq!(
        eval("(-9223372036854775800:-9223372036854775807:-5)@{|x| x}"),
        ints(&[-9_223_372_036_854_775_800, -9_223_372_036_854_775_805])
    );
}

#[test]
fn test_backward_slice_starts_at_last_elem() {
    assert_eq!(eval("[1, 2, 3][5::-1]"), ints(&[3, 2, 1]));
    assert_eq!(eval("\"abc\"[10::-1]"), Value::str("cba"));
}

#[test]
fn test_unbounded_recursion_raises() {
    let e = eval_err("f := {|n| f(n + 1)}; f(0)");
    assert_eq!(e.kind, ErrKind::Err);
    assert!(e.message.starts_with("stack overflow"), "{}", e.message);
}

#[test]
fn test_call_depth_is_configurable_and_recovers() {
    let interp = Interpreter::builder()
        .io(IoHandles::buffered(""))
        .max_call_depth(50)
        .build();
    let env = interp.global_env();
    assert!(interp
        .eval_source_in("f := {|n| 0 if n == 0 else f(n - 1) + 1}", &env)
        .is_ok());
    assert_eq!(interp.eval_source_in("f(40)", &env).ok(), Some(Value::Int(40)));
    assert!(interp.eval_source_in("f(60)", &env).is_err());
    assert_eq!(interp.eval_source_in("f(40)", &env).ok(), Some(Value::Int(40)));
}

#[test]
fn test_try_fmap_keeps_value_until_an_error() {
    assert_eq!(eval("1.try.fmap {\\ + 2}.fmap {\\ + 4}.val"), Value::Int(7));
    assert_eq!(eval("1.try.fmap {\\ + 2}.A"), Value::arr(vec![Value::Int(3), Value::Nil]));
    assert_eq!(eval("1.try.fmap {\\ + 2}.err"), Value::Nil);
    assert_eq!(eval("1.try.fmap {\\ + 2}.or(\"failed\")"), Value::Int(3));
    assert_eq!(eval("1.try.fmap(2).val"), Value::Nil);
}

#[test]
fn test_try_fmap_catches_errors() {
    assert_eq!(eval("1.try.fmap {\\ / 0}.fmap {\\ - 1}.val"), Value::Nil);
    assert_eq!(eval("1.try.fmap {\\ / 0}.or(\"failed\")"), Value::str("failed"));
    assert_eq!(
        eval("1.try.fmap {\\ / 0}.err.type == ZeroDivisionErr"),
        Value::Bool(true)
    );
    assert_eq!(eval("1.try.fmap {a}.A[1].msg"), Value::str("name `a` is not defined"));
    assert_eq!(eval("{}.try.fmap {Err.new(\"e\")}.err.msg"), Value::str("e"));
}

#[test]
fn test_either_props_check_their_receiver() {
    let e = eval_err("EitherVal.fmap {|x| x + 1}");
    assert_eq!((e.kind, e.message.as_str()), (ErrKind::TypeErr, "EitherVal cannot be treated as EitherVal"));
    let e = eval_err("EitherErr.err");
    assert_eq!((e.kind, e.message.as_str()), (ErrKind::TypeErr, "EitherErr cannot be treated as EitherErr"));
    let e = eval_err("1.try.fmap");
    assert_eq!(e.message, "EitherVal#fmap requires at least 2 args");
    for src in ["Either.A", "Either.err", "Either.fmap {|x| x}", "Either.or(1)", "Either.val"] {
        assert_eq!(eval_err(src).kind, ErrKind::NotImplementedErr, "{src}");
    }
    assert_eq!(eval("EitherErr._name"), Value::str("EitherErr"));
}

#[test]
fn test_traverse_flattens_nested_collections() {
    let v = eval("{a: 1, b: [2, {c: 3}], d: []}.traverse");
    let expected = eval("[[['a], 1], [['b, 0], 2], [['b, 1, 'c], 3], [['d], []]]");
    assert_eq!(v, expected);
    assert_eq!(eval("5.traverse"), Value::arr(Vec::new()));
}

#[test]
fn test_traverse_selects_paths_by_key() {
    let v = eval("{a: {c: 1}, b: [{c: 2}, {d: 3}]}.traverse(key: \"c\")");
    let expected = eval("[[['a, 'c], 1], [['b, 0, 'c], 2]]");
    assert_eq!(v, expected);
    assert_eq!(eval_err("{a: 1}.traverse(key: 1)").kind, ErrKind::TypeErr);
}

#[test]
fn test_dedent_strips_common_indent() {
    assert_eq!(eval("\"  a\\n    b\\n  c\".dedent"), Value::str("a\n  b\nc"));
}
