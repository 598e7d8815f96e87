//! Errors raised while building syntax trees.
//!
//! Two categories surface here:
//! - `ParseError`: a structural problem in the token stream, reported to the
//!   user with the offending token's position.
//! - `StackError`: the parser driver broke a stack invariant. These are
//!   defects in the caller, not in the user's program.

use std::fmt;

use crate::{Span, TokenKind};

/// Kind of structural error found while assembling the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token appeared where it has no meaning, e.g. asking the precedence
    /// of something that is not a binary operator.
    UnexpectedToken { found: TokenKind },
    /// A binary operator had fewer than two operands to fold.
    MissingOperand { operator: TokenKind },
    /// An expression was finished without any operand.
    EmptyExpression,
    /// Operands were left over after every operator was folded.
    ExtraOperand,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found } => write!(f, "unexpected token `{found}`"),
            Self::MissingOperand { operator } => {
                write!(f, "operator `{operator}` is missing an operand")
            }
            Self::EmptyExpression => write!(f, "expected an expression"),
            Self::ExtraOperand => write!(f, "expected an operator between operands"),
        }
    }
}

/// A structural error with its source position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    #[inline]
    pub const fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }

    pub const fn unexpected_token(found: TokenKind, span: Span) -> Self {
        ParseError {
            kind: ParseErrorKind::UnexpectedToken { found },
            span,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}

impl std::error::Error for ParseError {}

/// Misuse of a `NodeList` used as a stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackError {
    /// `top()` or `pop()` on an empty list.
    EmptyStack,
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStack => write!(f, "internal error: node stack is empty"),
        }
    }
}

impl std::error::Error for StackError {}
