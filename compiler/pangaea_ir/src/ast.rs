//! AST produced by the parser and walked by the evaluator.
//!
//! Every node carries a [`Source`] so the evaluator can accrete stack traces.
//! Function bodies are shared (`Rc`) because closures capture them.
//!
//! `Display` renders the canonical source form: infix and prefix expressions
//! are fully parenthesized, kwargs are sorted, and index sugar `x[i]` shows up
//! as the call it desugars to (`x.at([i])`). Func values print through this
//! form, and Func equality compares it.

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use crate::{Name, Source};

/// A parsed script.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub src: Source,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    Expr(Expr),
    /// `return e`, `raise e`, `yield e`, `defer e`.
    Jump { kind: JumpKind, value: Option<Expr> },
    /// `return e if c` and friends.
    JumpIf {
        kind: JumpKind,
        value: Option<Expr>,
        cond: Expr,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JumpKind {
    Return,
    Raise,
    Yield,
    Defer,
}

impl JumpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JumpKind::Return => "return",
            JumpKind::Raise => "raise",
            JumpKind::Yield => "yield",
            JumpKind::Defer => "defer",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub src: Source,
}

impl Expr {
    pub fn new(kind: ExprKind, src: Source) -> Self {
        Expr { kind, src }
    }
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Int(i64),
    Float(f64),
    /// `value` is unescaped; `text` is the literal as written between the quotes.
    Str {
        value: String,
        text: String,
        raw: bool,
    },
    /// `'name`
    Sym(String),
    /// `"a#{x}b#{y}c"`: each segment is literal text followed by an expression.
    EmbeddedStr {
        segments: Vec<StrSegment>,
        tail: String,
    },
    Range {
        start: Option<Box<Expr>>,
        stop: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    /// Elements may be `*e` prefix expressions.
    Arr(Vec<Expr>),
    Obj {
        pairs: Vec<Pair>,
        embedded: Vec<Expr>,
    },
    Map {
        pairs: Vec<Pair>,
        embedded: Vec<Expr>,
    },
    Ident(Name),
    /// `^name`
    PinnedIdent(Name),
    Prefix {
        op: Name,
        right: Box<Expr>,
    },
    Infix {
        op: Name,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        target: Name,
        value: Box<Expr>,
    },
    If {
        then: Box<Expr>,
        cond: Box<Expr>,
        otherwise: Option<Box<Expr>>,
    },
    Func(Rc<FuncComponent>),
    Iter(Rc<FuncComponent>),
    PropCall {
        chain: Chain,
        receiver: Option<Box<Expr>>,
        prop: Name,
        args: Vec<Expr>,
        kwargs: Vec<(Name, Expr)>,
    },
    LiteralCall {
        chain: Chain,
        receiver: Option<Box<Expr>>,
        func: Rc<FuncComponent>,
    },
    VarCall {
        chain: Chain,
        receiver: Option<Box<Expr>>,
        var: Name,
    },
    /// `<>`
    Diamond,
}

#[derive(Clone, Debug)]
pub struct StrSegment {
    pub text: String,
    pub expr: Expr,
}

#[derive(Clone, Debug)]
pub struct Pair {
    pub key: Expr,
    pub value: Expr,
}

/// Parameters and body shared by func and iter literals.
#[derive(Debug)]
pub struct FuncComponent {
    pub params: Vec<Name>,
    pub kwargs: Vec<(Name, Expr)>,
    pub body: Rc<[Stmt]>,
    pub src: Source,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum MainChain {
    /// `.`
    #[default]
    Scalar,
    /// `@`
    List,
    /// `$`
    Reduce,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AdditionalChain {
    #[default]
    Vanilla,
    /// `&`
    Lonely,
    /// `~`
    Thoughtful,
    /// `=`
    Strict,
}

#[derive(Clone, Debug, Default)]
pub struct Chain {
    pub main: MainChain,
    pub additional: AdditionalChain,
    pub arg: Option<Box<Expr>>,
}

impl Chain {
    pub fn scalar() -> Self {
        Chain::default()
    }

    pub fn token(&self) -> &'static str {
        match (self.additional, self.main) {
            (AdditionalChain::Vanilla, MainChain::Scalar) => ".",
            (AdditionalChain::Vanilla, MainChain::List) => "@",
            (AdditionalChain::Vanilla, MainChain::Reduce) => "$",
            (AdditionalChain::Lonely, MainChain::Scalar) => "&.",
            (AdditionalChain::Lonely, MainChain::List) => "&@",
            (AdditionalChain::Lonely, MainChain::Reduce) => "&$",
            (AdditionalChain::Thoughtful, MainChain::Scalar) => "~.",
            (AdditionalChain::Thoughtful, MainChain::List) => "~@",
            (AdditionalChain::Thoughtful, MainChain::Reduce) => "~$",
            (AdditionalChain::Strict, MainChain::Scalar) => "=.",
            (AdditionalChain::Strict, MainChain::List) => "=@",
            (AdditionalChain::Strict, MainChain::Reduce) => "=$",
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.stmts, "\n")
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Expr(e) => write!(f, "{e}"),
            StmtKind::Jump { kind, value } => write_jump(f, *kind, value.as_ref()),
            StmtKind::JumpIf { kind, value, cond } => {
                write_jump(f, *kind, value.as_ref())?;
                write!(f, " if {cond}")
            }
        }
    }
}

fn write_jump(f: &mut Formatter<'_>, kind: JumpKind, value: Option<&Expr>) -> fmt::Result {
    write!(f, "{} ", kind.as_str())?;
    if let Some(v) = value {
        write!(f, "{v}")?;
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Int(i) => write!(f, "{i}"),
            ExprKind::Float(x) => write!(f, "{x:?}"),
            ExprKind::Str { text, raw: true, .. } => write!(f, "`{text}`"),
            ExprKind::Str { text, .. } => write!(f, "\"{text}\""),
            ExprKind::Sym(s) => write!(f, "'{s}"),
            ExprKind::EmbeddedStr { segments, tail } => {
                f.write_str("\"")?;
                for seg in segments {
                    write!(f, "{}#{{ {} }}", seg.text, seg.expr)?;
                }
                write!(f, "{tail}\"")
            }
            ExprKind::Range { start, stop, step } => {
                f.write_str("(")?;
                for (i, part) in [start, stop, step].into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(":")?;
                    }
                    if let Some(e) = part {
                        write!(f, "{e}")?;
                    }
                }
                f.write_str(")")
            }
            ExprKind::Arr(elems) => {
                f.write_str("[")?;
                write_joined(f, elems, ", ")?;
                f.write_str("]")
            }
            ExprKind::Obj { pairs, embedded } => write_pairs(f, "{", pairs, embedded),
            ExprKind::Map { pairs, embedded } => write_pairs(f, "%{", pairs, embedded),
            ExprKind::Ident(name) => write!(f, "{name}"),
            ExprKind::PinnedIdent(name) => write!(f, "^{name}"),
            ExprKind::Prefix { op, right } => write!(f, "({op}{right})"),
            ExprKind::Infix { op, left, right } => write!(f, "({left} {op} {right})"),
            ExprKind::Assign { target, value } => write!(f, "({target} := {value})"),
            ExprKind::If {
                then,
                cond,
                otherwise,
            } => {
                write!(f, "({then} if {cond}")?;
                if let Some(e) = otherwise {
                    write!(f, " else {e}")?;
                }
                f.write_str(")")
            }
            ExprKind::Func(func) => write!(f, "{{{func}}}"),
            ExprKind::Iter(func) => write!(f, "<{{{func}}}>"),
            ExprKind::PropCall {
                chain,
                receiver,
                prop,
                args,
                kwargs,
            } => {
                write_receiver(f, receiver.as_deref(), chain)?;
                write!(f, "{prop}(")?;
                write_args(f, args, kwargs)?;
                f.write_str(")")
            }
            ExprKind::LiteralCall {
                chain,
                receiver,
                func,
            } => {
                write_receiver(f, receiver.as_deref(), chain)?;
                write!(f, "{{{func}}}")
            }
            ExprKind::VarCall {
                chain,
                receiver,
                var,
            } => {
                write_receiver(f, receiver.as_deref(), chain)?;
                write!(f, "^{var}")
            }
            ExprKind::Diamond => f.write_str("<>"),
        }
    }
}

impl Display for Chain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())?;
        if let Some(arg) = &self.arg {
            write!(f, "({arg})")?;
        }
        Ok(())
    }
}

/// `|params| body` without the surrounding braces.
impl Display for FuncComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("|")?;
        let params: Vec<&Name> = self.params.iter().collect();
        write_args(f, &params, &self.kwargs)?;
        f.write_str("|")?;
        match &*self.body {
            [] => f.write_str(" "),
            [only] => write!(f, " {only}"),
            many => {
                f.write_str("\n")?;
                write_joined(f, many, "\n")?;
                f.write_str("\n")
            }
        }
    }
}

fn write_receiver(f: &mut Formatter<'_>, receiver: Option<&Expr>, chain: &Chain) -> fmt::Result {
    if let Some(recv) = receiver {
        write!(f, "{recv}")?;
    }
    write!(f, "{chain}")
}

fn write_joined<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_args<T: Display>(
    f: &mut Formatter<'_>,
    args: &[T],
    kwargs: &[(Name, Expr)],
) -> fmt::Result {
    let mut parts: Vec<String> = args.iter().map(ToString::to_string).collect();
    let mut sorted: Vec<&(Name, Expr)> = kwargs.iter().collect();
    sorted.sort_by_key(|(k, _)| k.as_str());
    parts.extend(sorted.iter().map(|(k, v)| format!("{k}: {v}")));
    f.write_str(&parts.join(", "))
}

fn write_pairs(f: &mut Formatter<'_>, open: &str, pairs: &[Pair], embedded: &[Expr]) -> fmt::Result {
    let mut parts: Vec<String> = pairs
        .iter()
        .map(|p| format!("{}: {}", p.key, p.value))
        .collect();
    parts.extend(embedded.iter().map(|e| format!("**{e}")));
    write!(f, "{open}{}}}", parts.join(", "))
}
