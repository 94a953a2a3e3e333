//! The chain-call engine.
//!
//! A chain call applies one operation (a prop call, or a func applied to the
//! receiver) under a *main* chain (`.` scalar, `@` list, `$` reduce) and an
//! *additional* chain (vanilla, `&` lonely, `~` thoughtful, `=` strict).
//!
//! Each sigil is a middleware wrapping a [`Handler`]; a chain is the
//! composition of its middlewares around a terminal handler that performs the
//! operation on one receiver. Main middlewares sit outside additional ones,
//! so `&@` and `~@` act per element and `~$` per reduction step.
//!
//! Three combinations do not fall out of plain composition and have their own
//! middleware: `=@` keeps nils, `~@` keeps nils and substitutes failed
//! elements, and `~$` over a func skips failed steps.

use std::rc::Rc;

use smallvec::SmallVec;

use pangaea_ir::{AdditionalChain, Chain, Expr, FuncComponent, MainChain, Name};

use super::Interpreter;
use crate::environment::Env;
use crate::errors::{name_err, EvalResult};
use crate::value::{FuncKind, ObjValue, Value};

/// Operation on one receiver. The slice holds arguments a middleware puts
/// before the call-site arguments (the element, for a reduce step).
pub(crate) type Handler<'a> = Rc<dyn Fn(&Value, &[Value]) -> EvalResult + 'a>;

type Middleware = for<'a> fn(&'a ChainContext<'a>, Handler<'a>) -> Handler<'a>;

type Middlewares = SmallVec<[Middleware; 3]>;

pub(crate) struct ChainContext<'a> {
    interp: &'a Interpreter,
    env: &'a Env,
    /// Seed of a reduce chain; nil when omitted.
    chain_arg: Value,
    /// The func of a literal or var chain, handed to `_literalProxy`.
    func: Option<Value>,
}

impl Interpreter {
    /// `recv.prop(args)` under `chain`.
    pub(crate) fn eval_prop_call(
        &self,
        chain: &Chain,
        receiver: Option<&Expr>,
        prop: Name,
        args: &[Expr],
        kwargs: &[(Name, Expr)],
        env: &Env,
    ) -> EvalResult {
        let recv = self.eval_receiver(receiver, env)?;
        let chain_arg = self.eval_chain_arg(chain, env)?;
        let (args, kwargs) = self.eval_call_args(args, kwargs, env)?;

        let ctx = ChainContext {
            interp: self,
            env,
            chain_arg,
            func: None,
        };
        let terminal: Handler<'_> = Rc::new(|recv: &Value, lead: &[Value]| -> EvalResult {
            if lead.is_empty() {
                return self.call_prop(env, recv, prop, &args, &kwargs);
            }
            let mut all = Vec::with_capacity(lead.len() + args.len());
            all.extend_from_slice(lead);
            all.extend_from_slice(&args);
            self.call_prop(env, recv, prop, &all, &kwargs)
        });
        let handler = compose(&ctx, &prop_middlewares(chain), terminal);
        handler(&recv, &[])
    }

    /// `recv.{|x| ...}` under `chain`.
    pub(crate) fn eval_literal_call(
        &self,
        chain: &Chain,
        receiver: Option<&Expr>,
        func: &Rc<FuncComponent>,
        env: &Env,
    ) -> EvalResult {
        let recv = self.eval_receiver(receiver, env)?;
        let chain_arg = self.eval_chain_arg(chain, env)?;
        let func = self.make_func(func, FuncKind::Func, env)?;
        self.apply_func_chain(chain, &recv, chain_arg, func, env)
    }

    /// `recv.^f` under `chain`: like a literal chain with the func bound to `f`.
    pub(crate) fn eval_var_call(
        &self,
        chain: &Chain,
        receiver: Option<&Expr>,
        var: Name,
        env: &Env,
    ) -> EvalResult {
        let recv = self.eval_receiver(receiver, env)?;
        let chain_arg = self.eval_chain_arg(chain, env)?;
        let func = env
            .get(var)
            .ok_or_else(|| name_err(format!("name `{var}` is not defined")))?;
        self.apply_func_chain(chain, &recv, chain_arg, func, env)
    }

    fn apply_func_chain(
        &self,
        chain: &Chain,
        recv: &Value,
        chain_arg: Value,
        func: Value,
        env: &Env,
    ) -> EvalResult {
        let ctx = ChainContext {
            interp: self,
            env,
            chain_arg,
            func: Some(func.clone()),
        };
        let terminal: Handler<'_> =
            Rc::new(move |recv: &Value, _: &[Value]| -> EvalResult {
                self.call_with_receiver(env, &func, recv)
            });
        let handler = compose(&ctx, &literal_middlewares(chain), terminal);
        handler(recv, &[])
    }

    /// The explicit receiver, or `\1` for an anonymous chain.
    fn eval_receiver(&self, receiver: Option<&Expr>, env: &Env) -> EvalResult {
        match receiver {
            Some(expr) => self.eval_expr(expr, env),
            None => env
                .get(self.names.first)
                .ok_or_else(|| name_err("name `\\1` is not defined")),
        }
    }

    fn eval_chain_arg(&self, chain: &Chain, env: &Env) -> EvalResult {
        match &chain.arg {
            Some(expr) => self.eval_expr(expr, env),
            None => Ok(Value::Nil),
        }
    }
}

/// Wrap `terminal` so that `middlewares[0]` is the outermost layer.
fn compose<'a>(
    ctx: &'a ChainContext<'a>,
    middlewares: &[Middleware],
    terminal: Handler<'a>,
) -> Handler<'a> {
    middlewares
        .iter()
        .rev()
        .fold(terminal, |next, middleware| middleware(ctx, next))
}

fn prop_middlewares(chain: &Chain) -> Middlewares {
    match (chain.main, chain.additional) {
        (MainChain::List, AdditionalChain::Strict) => SmallVec::from_slice(&[keep_nil as Middleware]),
        (MainChain::List, AdditionalChain::Thoughtful) => {
            SmallVec::from_slice(&[keep_nil as Middleware, thoughtful])
        }
        (main, additional) => {
            let mut mws = Middlewares::new();
            mws.extend(main_middleware(main, reduce));
            mws.extend(additional_middleware(additional));
            mws
        }
    }
}

fn literal_middlewares(chain: &Chain) -> Middlewares {
    let mut mws = Middlewares::new();
    mws.push(literal_proxy);
    match (chain.main, chain.additional) {
        (MainChain::List, AdditionalChain::Strict) => mws.push(keep_nil),
        (MainChain::List, AdditionalChain::Thoughtful) => {
            mws.push(keep_nil);
            mws.push(thoughtful);
        }
        (MainChain::Reduce, AdditionalChain::Thoughtful) => mws.push(thoughtful_reduce_literal),
        (main, additional) => {
            mws.extend(main_middleware(main, reduce_literal));
            mws.extend(additional_middleware(additional));
        }
    }
    mws
}

fn main_middleware(main: MainChain, reducer: Middleware) -> Option<Middleware> {
    match main {
        MainChain::Scalar => None,
        MainChain::List => Some(squash_nil),
        MainChain::Reduce => Some(reducer),
    }
}

fn additional_middleware(additional: AdditionalChain) -> Option<Middleware> {
    match additional {
        AdditionalChain::Vanilla | AdditionalChain::Strict => None,
        AdditionalChain::Lonely => Some(lonely),
        AdditionalChain::Thoughtful => Some(thoughtful),
    }
}

/// `@`: apply to every element, dropping nil results.
fn squash_nil<'a>(ctx: &'a ChainContext<'a>, next: Handler<'a>) -> Handler<'a> {
    Rc::new(move |recv: &Value, lead: &[Value]| -> EvalResult {
        let mut out = Vec::new();
        ctx.interp.for_each(ctx.env, recv, |elem| {
            let v = next(&elem, lead)?;
            if !v.is_nil() {
                out.push(v);
            }
            Ok(())
        })?;
        Ok(Value::arr(out))
    })
}

/// `=@`: apply to every element, keeping nil results.
fn keep_nil<'a>(ctx: &'a ChainContext<'a>, next: Handler<'a>) -> Handler<'a> {
    Rc::new(move |recv: &Value, lead: &[Value]| -> EvalResult {
        let mut out = Vec::new();
        ctx.interp.for_each(ctx.env, recv, |elem| {
            out.push(next(&elem, lead)?);
            Ok(())
        })?;
        Ok(Value::arr(out))
    })
}

/// `$` on a prop: `acc = acc.prop(elem, args...)` for every element.
fn reduce<'a>(ctx: &'a ChainContext<'a>, next: Handler<'a>) -> Handler<'a> {
    Rc::new(move |recv: &Value, lead: &[Value]| -> EvalResult {
        let mut acc = ctx.chain_arg.clone();
        ctx.interp.for_each(ctx.env, recv, |elem| {
            let mut step = Vec::with_capacity(lead.len() + 1);
            step.push(elem);
            step.extend_from_slice(lead);
            acc = next(&acc, &step)?;
            Ok(())
        })?;
        Ok(acc)
    })
}

/// `$` on a func: `acc = f([acc, elem])` for every element.
fn reduce_literal<'a>(ctx: &'a ChainContext<'a>, next: Handler<'a>) -> Handler<'a> {
    Rc::new(move |recv: &Value, lead: &[Value]| -> EvalResult {
        let mut acc = ctx.chain_arg.clone();
        ctx.interp.for_each(ctx.env, recv, |elem| {
            acc = next(&Value::arr(vec![acc.clone(), elem]), lead)?;
            Ok(())
        })?;
        Ok(acc)
    })
}

/// `~$` on a func: a step that fails or returns nil leaves `acc` unchanged.
fn thoughtful_reduce_literal<'a>(ctx: &'a ChainContext<'a>, next: Handler<'a>) -> Handler<'a> {
    Rc::new(move |recv: &Value, lead: &[Value]| -> EvalResult {
        let mut acc = ctx.chain_arg.clone();
        ctx.interp.for_each(ctx.env, recv, |elem| {
            match next(&Value::arr(vec![acc.clone(), elem]), lead) {
                Ok(v) if !v.is_nil() => acc = v,
                _ => {}
            }
            Ok(())
        })?;
        Ok(acc)
    })
}

/// `&`: a nil receiver is returned as is.
fn lonely<'a>(_ctx: &'a ChainContext<'a>, next: Handler<'a>) -> Handler<'a> {
    Rc::new(move |recv: &Value, lead: &[Value]| -> EvalResult {
        if recv.is_nil() {
            return Ok(Value::Nil);
        }
        next(recv, lead)
    })
}

/// `~`: a failed or nil result is replaced by the receiver.
fn thoughtful<'a>(_ctx: &'a ChainContext<'a>, next: Handler<'a>) -> Handler<'a> {
    Rc::new(move |recv: &Value, lead: &[Value]| -> EvalResult {
        match next(recv, lead) {
            Ok(v) if !v.is_nil() => Ok(v),
            _ => Ok(recv.clone()),
        }
    })
}

/// A receiver with `_literalProxy` takes over func chains applied to it.
fn literal_proxy<'a>(ctx: &'a ChainContext<'a>, next: Handler<'a>) -> Handler<'a> {
    Rc::new(move |recv: &Value, lead: &[Value]| -> EvalResult {
        let name = ctx.interp.names.literal_proxy;
        match (&ctx.func, ctx.interp.find_prop(recv, name)) {
            (Some(func), Some(_)) => ctx.interp.call_prop(
                ctx.env,
                recv,
                name,
                std::slice::from_ref(func),
                &ObjValue::default(),
            ),
            _ => next(recv, lead),
        }
    })
}

#[cfg(test)]
mod tests;
