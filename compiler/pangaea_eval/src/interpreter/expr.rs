//! Expression evaluation: literals, identifiers, operators, `if`.

use pangaea_ir::{Expr, ExprKind, Name, Pair, StrSegment};
use pangaea_stack::ensure_sufficient_stack;

use super::call::unpack_prefix;
use super::Interpreter;
use crate::environment::Env;
use crate::errors::{name_err, syntax_err, type_err, EvalResult};
use crate::value::{FuncKind, HashKey, MapValue, ObjValue, Value};

impl Interpreter {
    /// Evaluate `expr`; an error leaving it gets `expr`'s location appended.
    pub fn eval_expr(&self, expr: &Expr, env: &Env) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr, env))
            .map_err(|e| e.with_trace(&expr.src))
    }

    fn eval_expr_inner(&self, expr: &Expr, env: &Env) -> EvalResult {
        match &expr.kind {
            ExprKind::Int(i) => Ok(Value::Int(*i)),
            ExprKind::Float(x) => Ok(Value::Float(*x)),
            ExprKind::Str { value, .. } => Ok(Value::str(value.as_str())),
            ExprKind::Sym(s) => Ok(Value::str(s.as_str())),
            ExprKind::EmbeddedStr { segments, tail } => self.eval_embedded_str(segments, tail, env),
            ExprKind::Range { start, stop, step } => {
                let part = |e: &Option<Box<Expr>>| match e {
                    Some(e) => self.eval_expr(e, env),
                    None => Ok(Value::Nil),
                };
                let start = part(start)?;
                let stop = part(stop)?;
                let step = part(step)?;
                Ok(Value::range(start, stop, step))
            }
            ExprKind::Arr(elems) => self.eval_arr(elems, env),
            ExprKind::Obj { pairs, embedded } => self.eval_obj(pairs, embedded, env),
            ExprKind::Map { pairs, embedded } => self.eval_map(pairs, embedded, env),
            ExprKind::Ident(name) => self.eval_ident(*name, env),
            ExprKind::PinnedIdent(_) => Err(syntax_err(
                "cannot use `^` other than key or var chain.",
            )),
            ExprKind::Prefix { op, right } => self.eval_prefix(*op, right, env),
            ExprKind::Infix { op, left, right } => self.eval_infix(*op, left, right, env),
            ExprKind::Assign { target, value } => {
                let v = self.eval_expr(value, env)?;
                env.set(*target, v.clone());
                Ok(v)
            }
            ExprKind::If {
                then,
                cond,
                otherwise,
            } => {
                let c = self.eval_expr(cond, env)?;
                if self.is_truthy(env, &c)? {
                    self.eval_expr(then, env)
                } else if let Some(e) = otherwise {
                    self.eval_expr(e, env)
                } else {
                    Ok(Value::Nil)
                }
            }
            ExprKind::Func(component) => self.make_func(component, FuncKind::Func, env),
            ExprKind::Iter(component) => self.make_func(component, FuncKind::Iter, env),
            ExprKind::PropCall {
                chain,
                receiver,
                prop,
                args,
                kwargs,
            } => self.eval_prop_call(chain, receiver.as_deref(), *prop, args, kwargs, env),
            ExprKind::LiteralCall {
                chain,
                receiver,
                func,
            } => self.eval_literal_call(chain, receiver.as_deref(), func, env),
            ExprKind::VarCall {
                chain,
                receiver,
                var,
            } => self.eval_var_call(chain, receiver.as_deref(), *var, env),
            ExprKind::Diamond => Ok(self.protos.diamond.clone()),
        }
    }

    fn eval_ident(&self, name: Name, env: &Env) -> EvalResult {
        if name == self.names.true_ {
            return Ok(Value::Bool(true));
        }
        if name == self.names.false_ {
            return Ok(Value::Bool(false));
        }
        if name == self.names.nil {
            return Ok(Value::Nil);
        }
        env.get(name)
            .ok_or_else(|| name_err(format!("name `{name}` is not defined")))
    }

    fn eval_embedded_str(&self, segments: &[StrSegment], tail: &str, env: &Env) -> EvalResult {
        let mut out = String::new();
        for seg in segments {
            out.push_str(&seg.text);
            let v = self.eval_expr(&seg.expr, env)?;
            out.push_str(&self.to_display(env, &v)?);
        }
        out.push_str(tail);
        Ok(Value::str(out))
    }

    fn eval_arr(&self, elems: &[Expr], env: &Env) -> EvalResult {
        let mut out = Vec::with_capacity(elems.len());
        for elem in elems {
            match unpack_prefix(elem) {
                Some(("*", inner)) => {
                    let v = self.eval_expr(inner, env)?;
                    let spread = self.trace_arr(&v).ok_or_else(|| {
                        type_err(format!("cannot use `*` unpacking for `{}`", v.inspect()))
                    })?;
                    out.extend(spread.iter().cloned());
                }
                _ => out.push(self.eval_expr(elem, env)?),
            }
        }
        Ok(Value::arr(out))
    }

    /// Obj literal. Keys must be Str; a repeated key keeps its first value.
    fn eval_obj(&self, pairs: &[Pair], embedded: &[Expr], env: &Env) -> EvalResult {
        let mut out = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let key = self.eval_obj_key(&pair.key, env)?;
            let value = self.eval_expr(&pair.value, env)?;
            out.push((key, value));
        }
        for expr in embedded {
            let v = self.eval_expr(expr, env)?;
            let Value::Obj(obj) = &v else {
                return Err(type_err(format!(
                    "cannot use `**` unpacking for `{}`",
                    v.inspect()
                )));
            };
            out.extend(obj.all_pairs().map(|(k, v)| (k, v.clone())));
        }
        Ok(self.new_obj(out))
    }

    fn eval_obj_key(&self, key: &Expr, env: &Env) -> EvalResult<Name> {
        if let ExprKind::PinnedIdent(name) = &key.kind {
            let v = self.eval_ident(*name, env)?;
            return self
                .trace_str(&v)
                .map(|s| Name::intern(&s))
                .ok_or_else(|| type_err("key of obj must be str"));
        }
        let v = self.eval_expr(key, env)?;
        self.trace_str(&v)
            .map(|s| Name::intern(&s))
            .ok_or_else(|| type_err(format!("cannot use `{}` as Obj key.", v.inspect())))
    }

    /// Map literal. `**` accepts a Map or an Obj (whose keys become Strs).
    fn eval_map(&self, pairs: &[Pair], embedded: &[Expr], env: &Env) -> EvalResult {
        let mut map = MapValue::new();
        for pair in pairs {
            let key = match &pair.key.kind {
                ExprKind::PinnedIdent(name) => self.eval_ident(*name, env)?,
                _ => self.eval_expr(&pair.key, env)?,
            };
            let value = self.eval_expr(&pair.value, env)?;
            self.map_insert(env, &mut map, key, value)?;
        }
        for expr in embedded {
            let v = self.eval_expr(expr, env)?;
            match &v {
                Value::Map(m) => {
                    for (k, val) in m.iter() {
                        self.map_insert(env, &mut map, k.clone(), val.clone())?;
                    }
                }
                Value::Obj(o) => {
                    for (k, val) in o.all_pairs() {
                        self.map_insert(env, &mut map, Value::str(k.as_str()), val.clone())?;
                    }
                }
                _ => {
                    return Err(type_err(format!(
                        "cannot use `**` unpacking for `{}`",
                        v.inspect()
                    )))
                }
            }
        }
        Ok(Value::map(map))
    }

    /// Insert unless an equal key exists. Non-hashable keys compare with `==`.
    pub(crate) fn map_insert(
        &self,
        env: &Env,
        map: &mut MapValue,
        key: Value,
        value: Value,
    ) -> EvalResult<()> {
        if let Some(hash) = HashKey::of(&key) {
            map.insert_hashable(hash, key, value);
            return Ok(());
        }
        for (existing, _) in map.non_hashable() {
            if self.values_equal(env, existing, &key)? {
                return Ok(());
            }
        }
        map.push_non_hashable(key, value);
        Ok(())
    }

    fn eval_prefix(&self, op: Name, right: &Expr, env: &Env) -> EvalResult {
        let prop = match op.as_str() {
            "*" => return Err(syntax_err("cannot use `*` unpacking outside of Arr.")),
            "**" => return Err(syntax_err("cannot use `**` unpacking outside of Obj.")),
            "-" => Name::intern("-%"),
            "+" => Name::intern("+%"),
            _ => op,
        };
        let v = self.eval_expr(right, env)?;
        self.call_prop(env, &v, prop, &[], &ObjValue::default())
    }

    /// `a op b` is `a.op(b)`; `||` and `&&` short-circuit and return an operand.
    fn eval_infix(&self, op: Name, left: &Expr, right: &Expr, env: &Env) -> EvalResult {
        let l = self.eval_expr(left, env)?;
        match op.as_str() {
            "||" => {
                if self.is_truthy(env, &l)? {
                    Ok(l)
                } else {
                    self.eval_expr(right, env)
                }
            }
            "&&" => {
                if self.is_truthy(env, &l)? {
                    self.eval_expr(right, env)
                } else {
                    Ok(l)
                }
            }
            _ => {
                let r = self.eval_expr(right, env)?;
                self.call_prop(env, &l, op, &[r], &ObjValue::default())
            }
        }
    }
}
