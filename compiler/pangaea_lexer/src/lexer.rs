use logos::Logos;
use pangaea_ir::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    #[token("\n")]
    Newline,
    #[token(";")]
    Semicolon,

    // Keywords
    #[token("return")]
    Return,
    #[token("raise")]
    Raise,
    #[token("yield")]
    Yield,
    #[token("defer")]
    Defer,
    #[token("if")]
    If,
    #[token("else")]
    Else,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("<{")]
    IterOpen,
    #[token("}>")]
    IterClose,
    #[token("%{")]
    MapOpen,
    #[token("<>")]
    Diamond,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(":=")]
    ColonEq,
    #[token("=>")]
    FatArrow,
    #[token("|")]
    Pipe,

    // Chains
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("$")]
    Dollar,
    #[token("&")]
    Amp,
    #[token("~")]
    Tilde,
    #[token("=")]
    Eq,
    #[token("^")]
    Caret,

    // Operators
    #[token("||")]
    OrOr,
    #[token("&&")]
    AndAnd,
    #[token("!")]
    Bang,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=>")]
    Spaceship,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("//")]
    SlashSlash,
    #[token("%")]
    Percent,
    #[token("/~")]
    BitNot,
    #[token("/&")]
    BitAnd,
    #[token("/|")]
    BitOr,
    #[token("/^")]
    BitXor,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("+%")]
    PlusPercent,
    #[token("-%")]
    MinusPercent,

    /// `a += 1` and friends; carries the operator without `=`.
    #[regex(r"(\+|-|\*\*|\*|//|/&|/\||/\^|/|%|<<|>>|\|\||&&)=", |lex| {
        let s = lex.slice();
        s[..s.len() - 1].to_string()
    })]
    CompoundAssign(String),

    // Literals
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    /// Raw text between double quotes, holes and escapes untouched.
    #[token("\"", lex_double_quoted)]
    Str(String),

    #[regex(r"`[^`]*`", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    RawStr(String),

    /// `?a`; carries the (possibly escaped) char text.
    #[regex(r"\?(\\.|[^\\\s])", |lex| lex.slice()[1..].to_string())]
    Char(String),

    #[regex(
        r"'([A-Za-z_][A-Za-z0-9_]*[!?]?|<=>|==|!=|<=|>=|\*\*|//|/~|/&|/\||/\^|<<|>>|\+%|-%|[-+*/%<>!])",
        |lex| lex.slice()[1..].to_string()
    )]
    Sym(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*[!?]?", |lex| lex.slice().to_string())]
    Ident(String),

    /// `\`, `\1`, `\_`, `\name`.
    #[regex(r"\\([0-9]+|[A-Za-z_][A-Za-z0-9_]*[!?]?)?", |lex| lex.slice().to_string())]
    ScopedIdent(String),
}

impl Token {
    /// Operator spelling, for tokens usable as infix/prefix operators or prop names.
    pub fn op_str(&self) -> Option<&'static str> {
        Some(match self {
            Token::OrOr => "||",
            Token::AndAnd => "&&",
            Token::Bang => "!",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Spaceship => "<=>",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::StarStar => "**",
            Token::Slash => "/",
            Token::SlashSlash => "//",
            Token::Percent => "%",
            Token::BitNot => "/~",
            Token::BitAnd => "/&",
            Token::BitOr => "/|",
            Token::BitXor => "/^",
            Token::Shl => "<<",
            Token::Shr => ">>",
            Token::PlusPercent => "+%",
            Token::MinusPercent => "-%",
            _ => return None,
        })
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(op) = self.op_str() {
            return f.write_str(op);
        }
        match self {
            Token::Comment => f.write_str("#"),
            Token::Newline => f.write_str("newline"),
            Token::Semicolon => f.write_str(";"),
            Token::Return => f.write_str("return"),
            Token::Raise => f.write_str("raise"),
            Token::Yield => f.write_str("yield"),
            Token::Defer => f.write_str("defer"),
            Token::If => f.write_str("if"),
            Token::Else => f.write_str("else"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::LBrace => f.write_str("{"),
            Token::RBrace => f.write_str("}"),
            Token::IterOpen => f.write_str("<{"),
            Token::IterClose => f.write_str("}>"),
            Token::MapOpen => f.write_str("%{"),
            Token::Diamond => f.write_str("<>"),
            Token::Comma => f.write_str(","),
            Token::Colon => f.write_str(":"),
            Token::ColonEq => f.write_str(":="),
            Token::FatArrow => f.write_str("=>"),
            Token::Pipe => f.write_str("|"),
            Token::Dot => f.write_str("."),
            Token::At => f.write_str("@"),
            Token::Dollar => f.write_str("$"),
            Token::Amp => f.write_str("&"),
            Token::Tilde => f.write_str("~"),
            Token::Eq => f.write_str("="),
            Token::Caret => f.write_str("^"),
            Token::CompoundAssign(op) => write!(f, "{op}="),
            Token::Int(i) => write!(f, "{i}"),
            Token::Float(x) => write!(f, "{x}"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::RawStr(s) => write!(f, "`{s}`"),
            Token::Char(c) => write!(f, "?{c}"),
            Token::Sym(s) => write!(f, "'{s}"),
            Token::Ident(s) | Token::ScopedIdent(s) => f.write_str(s),
            _ => f.write_str("operator"),
        }
    }
}

/// Piece of a double-quoted string's raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrPiece<'a> {
    /// Literal text, escapes unresolved.
    Text(&'a str),
    /// Code of a `#{ }` hole; `offset` is its byte offset in the raw text.
    Hole { code: &'a str, offset: usize },
}

/// Split the raw text of a double-quoted string into literal text and holes.
pub fn str_pieces(raw: &str) -> Vec<StrPiece<'_>> {
    let bytes = raw.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'#' if bytes.get(i + 1) == Some(&b'{') => {
                let Some(len) = scan_hole(&raw[i + 2..]) else {
                    break;
                };
                pieces.push(StrPiece::Text(&raw[start..i]));
                pieces.push(StrPiece::Hole {
                    code: &raw[i + 2..i + 1 + len],
                    offset: i + 2,
                });
                i += 2 + len;
                start = i;
            }
            _ => i += 1,
        }
    }
    pieces.push(StrPiece::Text(raw.get(start..).unwrap_or_default()));
    pieces
}

/// Scan a double-quoted string whose opening quote was just consumed.
fn lex_double_quoted(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let rest = lex.remainder();
    let len = scan_double_quoted(rest)?;
    let content = rest[..len].to_string();
    lex.bump(len + 1);
    Some(content)
}

/// Byte length of string content up to (not including) the closing quote.
fn scan_double_quoted(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Some(i),
            b'\\' => i += 2,
            b'#' if bytes.get(i + 1) == Some(&b'{') => {
                i += 2 + scan_hole(&rest[i + 2..])?;
            }
            _ => i += 1,
        }
    }
    None
}

/// Byte length of an embedded `#{ ... }` hole including its closing brace.
fn scan_hole(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(i + 1),
            b'}' => depth -= 1,
            b'"' => {
                i += 1 + scan_double_quoted(&rest[i + 1..])?;
            }
            b'`' => {
                i += 1 + rest[i + 1..].find('`')?;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Resolve backslash escapes of a double-quoted or char literal.
///
/// Unknown escapes keep the backslash.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('s') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('#') => out.push('#'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

pub type SpannedToken = Spanned<Token>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character `{text}`")]
    UnexpectedChar { text: String, span: Span },
    #[error("unterminated string literal")]
    UnterminatedStr { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } | LexError::UnterminatedStr { span } => *span,
        }
    }
}

/// Tokenize `source`, offsetting spans by `base` (used for `#{}` holes).
pub fn tokenize(source: &str, base: usize) -> Result<Vec<SpannedToken>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span::from_range(range.start + base..range.end + base);
        match result {
            Ok(token) => tokens.push(Spanned { value: token, span }),
            Err(()) => {
                let text = &source[range.clone()];
                return Err(if text.starts_with('"') || text.starts_with('`') {
                    LexError::UnterminatedStr {
                        span: Span::from_range(range.start + base..source.len() + base),
                    }
                } else {
                    LexError::UnexpectedChar {
                        text: text.to_string(),
                        span,
                    }
                });
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests;
