//! Raw token kinds produced by the lexer.
//!
//! The same enumeration is used for operator kinds stored in `UnaryOp` and
//! `BinaryOp` nodes, so classification (`is_binary_operator`, `precedence`)
//! works directly on what the lexer hands over.

use std::fmt;

use crate::Span;

/// Kind of a raw lexer token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals and names
    Numerical,
    Character,
    String,
    Identifier,

    // Keywords
    Function,
    Struct,
    If,
    Elif,
    Else,
    While,
    For,
    In,
    Return,
    Global,
    Import,
    New,
    Null,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    Period,
    Semicolon,
    Set,
    Reference,

    // Arithmetic
    Plus,
    Minus,
    Modulus,
    Caret,
    Asterisk,
    Slash,
    Increment,
    Decrement,

    // Logical
    Or,
    And,
    Not,

    // Comparison
    Equals,
    NotEqual,
    More,
    Less,
    MoreEqual,
    LessEqual,

    EndOfFile,
}

impl TokenKind {
    /// Source spelling of this kind, used in diagnostics.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Numerical => "numerical literal",
            Self::Character => "character literal",
            Self::String => "string literal",
            Self::Identifier => "identifier",
            Self::Function => "function",
            Self::Struct => "struct",
            Self::If => "if",
            Self::Elif => "elif",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::In => "in",
            Self::Return => "return",
            Self::Global => "global",
            Self::Import => "import",
            Self::New => "new",
            Self::Null => "null",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::OpenBrace => "{",
            Self::CloseBrace => "}",
            Self::OpenBracket => "[",
            Self::CloseBracket => "]",
            Self::Comma => ",",
            Self::Period => ".",
            Self::Semicolon => ";",
            Self::Set => "=",
            Self::Reference => "&",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Modulus => "%",
            Self::Caret => "^",
            Self::Asterisk => "*",
            Self::Slash => "/",
            Self::Increment => "++",
            Self::Decrement => "--",
            Self::Or => "||",
            Self::And => "&&",
            Self::Not => "!",
            Self::Equals => "==",
            Self::NotEqual => "!=",
            Self::More => ">",
            Self::Less => "<",
            Self::MoreEqual => ">=",
            Self::LessEqual => "<=",
            Self::EndOfFile => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// A raw token record as handed over by the lexer.
///
/// The literal payload (number text, identifier name) is the source text
/// covered by `span`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LexToken {
    pub kind: TokenKind,
    pub span: Span,
}

impl LexToken {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        LexToken { kind, span }
    }

    /// Token that does not come from source text (tests, synthesized code).
    pub const fn dummy(kind: TokenKind) -> Self {
        LexToken {
            kind,
            span: Span::DUMMY,
        }
    }
}
