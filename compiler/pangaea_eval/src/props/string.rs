//! `Str`.

use std::rc::Rc;

use regex::Regex;

use super::{
    arg, check_arity, index_str, iter_over, kwarg, repeat_count, str_arg, PropContainer,
};
use crate::environment::Env;
use crate::errors::{cannot_treat, type_err, value_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{quote_str, Value};

/// Largest Str that `*` builds.
const MAX_STR_BYTES: usize = 1 << 30;

/// `args[0]` and `args[1]` as Strs; a nil right operand is `""`.
fn str_operands(
    interp: &Interpreter,
    args: &[Value],
    prop: &str,
) -> EvalResult<(Rc<str>, Rc<str>)> {
    check_arity(args, 2, prop)?;
    let a = str_arg(interp, args, 0)?;
    let b = match interp.trace_str(&args[1]) {
        Some(b) => b,
        None if interp.traces_to_nil(&args[1]) => "".into(),
        None => return Err(cannot_treat(&args[1], "str")),
    };
    Ok((a, b))
}

fn compile(pattern: &str) -> EvalResult<Regex> {
    Regex::new(pattern).map_err(|_| value_err(format!("{} is invalid regex pattern", quote_str(pattern))))
}

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Str", "<=>", |interp, _, _, args| {
        let (a, b) = str_operands(interp, args, "Str#<=>")?;
        Ok(Value::Int(a.cmp(&b) as i64))
    });
    c.builtin("Str", "==", |interp, _, _, args| {
        check_arity(args, 2, "Str#==")?;
        let (Some(a), Some(b)) = (interp.trace_str(&args[0]), interp.trace_str(&args[1])) else {
            return Ok(Value::Bool(false));
        };
        Ok(Value::Bool(a == b))
    });
    c.builtin("Str", "+", |interp, _, _, args| {
        let (a, b) = str_operands(interp, args, "Str#+")?;
        Ok(Value::str(format!("{a}{b}")))
    });
    c.builtin("Str", "*", |interp, _, _, args| {
        check_arity(args, 2, "Str#*")?;
        let s = str_arg(interp, args, 0)?;
        let n = repeat_count(interp, args, s.len(), MAX_STR_BYTES)?;
        Ok(Value::str(s.repeat(n)))
    });
    c.builtin("Str", "/", |interp, _, _, args| {
        let (s, sep) = str_operands(interp, args, "Str#/")?;
        let re = compile(&sep)?;
        Ok(Value::arr(
            re.split(&s)
                .filter(|piece| !piece.is_empty())
                .map(Value::str)
                .collect(),
        ))
    });
    c.builtin("Str", "/~", |interp, _, _, args| {
        check_arity(args, 1, "Str#/~")?;
        let s = str_arg(interp, args, 0)?;
        let negated: Vec<u8> = s.bytes().map(|b| !b).collect();
        Ok(Value::str(String::from_utf8_lossy(&negated).into_owned()))
    });
    c.builtin("Str", "_incBy", |interp, _, _, args| {
        check_arity(args, 2, "Str#_incBy")?;
        let s = str_arg(interp, args, 0)?;
        let n = interp
            .trace_int(&args[1])
            .ok_or_else(|| type_err("\\2 must be int"))?;
        inc_last_char(&s, n).map(Value::str)
    });
    c.builtin("Str", "_iter", |interp, _, _, args| {
        check_arity(args, 1, "Str#_iter")?;
        let s = str_arg(interp, args, 0)?;
        Ok(iter_over(s.chars().map(|c| Value::str(c.to_string())).collect()))
    });
    c.builtin("Str", "at", |interp, _, _, args| {
        check_arity(args, 1, "Str#at")?;
        let s = str_arg(interp, args, 0)?;
        index_str(interp, &args[0], &s, &arg(args, 1))
    });
    c.builtin("Str", "B", |interp, _, _, args| {
        check_arity(args, 1, "Str#B")?;
        Ok(Value::Bool(!str_arg(interp, args, 0)?.is_empty()))
    });
    c.builtin("Str", "F", |interp, _, _, args| {
        check_arity(args, 1, "Str#F")?;
        let s = str_arg(interp, args, 0)?;
        s.trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| value_err(format!("{} cannot be converted into float", quote_str(&s))))
    });
    c.builtin("Str", "I", |interp, _, kwargs, args| {
        check_arity(args, 1, "Str#I")?;
        let s = str_arg(interp, args, 0)?;
        let base = match kwarg(kwargs, "base") {
            Some(b) => interp.trace_int(b).ok_or_else(|| cannot_treat(b, "int"))?,
            None => 10,
        };
        parse_int_in_base(&s, base).map(Value::Int)
    });
    c.builtin("Str", "lc", |interp, _, _, args| {
        check_arity(args, 1, "Str#lc")?;
        Ok(Value::str(str_arg(interp, args, 0)?.to_lowercase()))
    });
    c.builtin("Str", "uc", |interp, _, _, args| {
        check_arity(args, 1, "Str#uc")?;
        Ok(Value::str(str_arg(interp, args, 0)?.to_uppercase()))
    });
    c.builtin("Str", "len", |interp, _, _, args| {
        check_arity(args, 1, "Str#len")?;
        let n = str_arg(interp, args, 0)?.chars().count();
        Ok(Value::Int(i64::try_from(n).unwrap_or(i64::MAX)))
    });
    c.builtin("Str", "match", |interp, _, _, args| {
        check_arity(args, 2, "Str#match")?;
        let s = interp
            .trace_str(&args[0])
            .ok_or_else(|| type_err("\\1 must be str"))?;
        let pattern = interp
            .trace_str(&args[1])
            .ok_or_else(|| type_err("\\2 must be str"))?;
        let re = compile(&pattern)?;
        let groups = re.captures(&s).map_or_else(Vec::new, |caps| {
            caps.iter()
                .map(|m| Value::str(m.map_or("", |m| m.as_str())))
                .collect()
        });
        Ok(Value::arr(groups))
    });
    c.builtin("Str", "sub", |interp, _, _, args| {
        check_arity(args, 3, "Str#sub")?;
        let s = interp
            .trace_str(&args[0])
            .ok_or_else(|| type_err("\\1 must be str"))?;
        let pattern = interp
            .trace_str(&args[1])
            .ok_or_else(|| type_err("\\2 must be str"))?;
        let replacement = interp
            .trace_str(&args[2])
            .ok_or_else(|| type_err("\\3 must be str"))?;
        let re = compile(&pattern)?;
        let replaced = re.replace_all(&s, &*replacement);
        let upper = convert_case_spans(&replaced, "\\U", str::to_uppercase);
        Ok(Value::str(convert_case_spans(&upper, "\\L", str::to_lowercase)))
    });
    c.builtin("Str", "new", |interp, env, _, args| {
        check_arity(args, 1, "Str#new")?;
        let x = arg(args, 1);
        if let Some(s) = interp.trace_str(&x) {
            return Ok(Value::Str(s));
        }
        interp.call_prop0(env, &x, interp.names().s)
    });
    c.builtin("Str", "ord", |interp, _, _, args| {
        check_arity(args, 1, "Str#ord")?;
        let s = str_arg(interp, args, 0)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::Int(i64::from(u32::from(c)))),
            _ => Err(value_err(format!(
                "length must be 1. got {} ({})",
                s.chars().count(),
                quote_str(&s)
            ))),
        }
    });
    c.builtin("Str", "sym?", |interp, _, _, args| {
        check_arity(args, 1, "Str#sym?")?;
        Ok(Value::Bool(is_symbol(&str_arg(interp, args, 0)?)))
    });
    c.builtin("Str", "dedent", |interp, _, _, args| {
        check_arity(args, 1, "Str#dedent")?;
        Ok(Value::str(dedent(&str_arg(interp, args, 0)?)))
    });
    c.builtin("Str", "eval", |interp, _, _, args| {
        check_arity(args, 1, "Str#eval")?;
        let src = str_arg(interp, args, 0)?;
        interp.eval_source(&src)
    });
    c.builtin("Str", "evalEnv", |interp, _, _, args| {
        check_arity(args, 1, "Str#evalEnv")?;
        let src = str_arg(interp, args, 0)?;
        let env = Env::new_enclosed(&interp.global_env());
        interp.eval_source_in(&src, &env)?;
        Ok(interp.new_obj(env.items()))
    });
    c.builtin("Str", "S", |interp, _, _, args| {
        check_arity(args, 1, "Str#S")?;
        Ok(Value::Str(str_arg(interp, args, 0)?))
    });
    c.builtin("Str", "repr", |interp, _, _, args| {
        check_arity(args, 1, "Str#repr")?;
        Ok(Value::str(quote_str(&str_arg(interp, args, 0)?)))
    });
}

/// Shift the last code point by `n`.
fn inc_last_char(s: &str, n: i64) -> EvalResult<String> {
    let mut chars: Vec<char> = s.chars().collect();
    let Some(last) = chars.pop() else {
        return Ok(String::new());
    };
    let next = i64::from(u32::from(last))
        .checked_add(n)
        .and_then(|shifted| u32::try_from(shifted).ok())
        .and_then(char::from_u32)
        .ok_or_else(|| {
            value_err(format!(
                "{} shifted by {n} cannot be converted into char",
                quote_str(&last.to_string())
            ))
        })?;
    chars.push(next);
    Ok(chars.into_iter().collect())
}

/// Strip the leading blanks all non-blank lines share. Blank lines end up
/// empty.
fn dedent(s: &str) -> String {
    let is_blank = |c: char| c == ' ' || c == '\t';
    let lines: Vec<&str> = s
        .split('\n')
        .map(|l| if l.chars().all(is_blank) { "" } else { l })
        .collect();
    let mut margin: Option<&str> = None;
    for line in lines.iter().copied().filter(|l| !l.is_empty()) {
        let indent = &line[..line.len() - line.trim_start_matches(is_blank).len()];
        margin = match margin {
            None => Some(indent),
            Some(m) if indent.starts_with(m) => Some(m),
            Some(m) if m.starts_with(indent) => Some(indent),
            Some(_) => Some(""),
        };
        if margin == Some("") {
            break;
        }
    }
    let margin = margin.unwrap_or("");
    lines
        .iter()
        .map(|l| l.strip_prefix(margin).unwrap_or(l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Base 2 to 36, with an optional sign.
fn parse_int_in_base(s: &str, base: i64) -> EvalResult<i64> {
    let radix = u32::try_from(base)
        .ok()
        .filter(|b| (2..=36).contains(b))
        .ok_or_else(|| value_err(format!("base {base} must be within (2:37)")))?;
    i64::from_str_radix(s, radix)
        .map_err(|_| value_err(format!("{} cannot be converted into int", quote_str(s))))
}

/// Apply `f` to each `<marker>...\E` span, dropping the markers.
fn convert_case_spans(s: &str, marker: &str, f: fn(&str) -> String) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find(marker) {
        let body = &rest[start + marker.len()..];
        let Some(end) = body.find("\\E") else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&f(&body[..end]));
        rest = &body[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Whether `s` can be written as a bare symbol (`'name`).
fn is_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    let body = s.strip_suffix(['?', '!']).unwrap_or(s);
    body.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_case_spans() {
        assert_eq!(
            convert_case_spans("a\\Ubc\\Ed\\Uef\\E", "\\U", str::to_uppercase),
            "aBCdEF"
        );
        assert_eq!(convert_case_spans("x\\Uy", "\\U", str::to_uppercase), "x\\Uy");
        assert_eq!(convert_case_spans("\\LAB\\E", "\\L", str::to_lowercase), "ab");
    }

    #[test]
    fn test_inc_last_char() {
        assert_eq!(inc_last_char("aa", 1).unwrap(), "ab");
        assert_eq!(inc_last_char("b", -1).unwrap(), "a");
        assert_eq!(inc_last_char("", 3).unwrap(), "");
        assert!(inc_last_char("a", -100).is_err());
    }

    #[test]
    fn test_dedent() {
        assert_eq!(dedent("  a\n    b\n  c"), "a\n  b\nc");
        assert_eq!(dedent("\n    x\n  \n    y\n"), "\nx\n\ny\n");
        assert_eq!(dedent("\ta\n  b"), "\ta\n  b");
        assert_eq!(dedent("no indent"), "no indent");
        assert_eq!(dedent(""), "");
    }

    #[test]
    fn test_parse_int_in_base() {
        assert_eq!(parse_int_in_base("ff", 16).unwrap(), 255);
        assert_eq!(parse_int_in_base("-101", 2).unwrap(), -5);
        assert_eq!(
            parse_int_in_base("1.5", 10).unwrap_err().message,
            "\"1.5\" cannot be converted into int"
        );
        assert_eq!(
            parse_int_in_base("1", 1).unwrap_err().message,
            "base 1 must be within (2:37)"
        );
    }

    #[test]
    fn test_is_symbol() {
        assert!(is_symbol("foo"));
        assert!(is_symbol("empty?"));
        assert!(is_symbol("_x1!"));
        assert!(!is_symbol("1x"));
        assert!(!is_symbol("a b"));
        assert!(!is_symbol(""));
        assert!(!is_symbol("a?b"));
    }
}
