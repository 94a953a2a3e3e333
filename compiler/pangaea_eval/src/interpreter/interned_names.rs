//! Names the evaluator looks up on hot paths, interned once per interpreter.

use pangaea_ir::{Name, StringInterner};

/// Protocol prop names and reserved identifiers.
#[derive(Clone, Copy)]
pub(crate) struct SymNames {
    pub(crate) iter: Name,
    pub(crate) next: Name,
    pub(crate) missing: Name,
    pub(crate) literal_proxy: Name,
    pub(crate) b: Name,
    pub(crate) s: Name,
    pub(crate) eq: Name,
    pub(crate) call: Name,
    pub(crate) true_: Name,
    pub(crate) false_: Name,
    pub(crate) nil: Name,
    pub(crate) io: Name,
    pub(crate) value: Name,
    pub(crate) error: Name,
    /// `\`
    pub(crate) arg: Name,
    /// `\0`
    pub(crate) args: Name,
    /// `\_`
    pub(crate) kwargs: Name,
    /// `\1`
    pub(crate) first: Name,
}

impl SymNames {
    pub(crate) fn new(interner: &StringInterner) -> Self {
        SymNames {
            iter: interner.intern("_iter"),
            next: interner.intern("next"),
            missing: interner.intern("_missing"),
            literal_proxy: interner.intern("_literalProxy"),
            b: interner.intern("B"),
            s: interner.intern("S"),
            eq: interner.intern("=="),
            call: interner.intern("call"),
            true_: interner.intern("true"),
            false_: interner.intern("false"),
            nil: interner.intern("nil"),
            io: interner.intern("IO"),
            value: interner.intern("_value"),
            error: interner.intern("_error"),
            arg: interner.intern("\\"),
            args: interner.intern("\\0"),
            kwargs: interner.intern("\\_"),
            first: interner.intern("\\1"),
        }
    }

    /// `\n` for the n-th (1-based) positional argument.
    pub(crate) fn positional(n: usize) -> Name {
        Name::intern(&format!("\\{n}"))
    }
}
