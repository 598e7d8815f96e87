//! Operator classification and binding strength.
//!
//! Lower numbers bind looser:
//! - 0: `||` `&&`
//! - 1: `==` `!=` `<` `>` `>=` `<=`
//! - 2: `+` `-`
//! - 3: `*` `%` `/`
//! - 4: `^`
//!
//! Every level is left-associative, `^` included.

use crate::{ParseErrorKind, TokenKind};

/// Whether `kind` is one of the sixteen binary operator kinds.
///
/// `++` and `--` are classified here but have no precedence level.
pub const fn is_binary_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Modulus
            | TokenKind::Caret
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Increment
            | TokenKind::Decrement
            | TokenKind::Or
            | TokenKind::And
            | TokenKind::Equals
            | TokenKind::MoreEqual
            | TokenKind::LessEqual
            | TokenKind::NotEqual
            | TokenKind::More
            | TokenKind::Less
    )
}

/// Binding strength of a binary operator.
///
/// Fails with `UnexpectedToken` for any kind outside the table; callers
/// attach the token's span.
pub const fn precedence(kind: TokenKind) -> Result<u8, ParseErrorKind> {
    match kind {
        TokenKind::Or | TokenKind::And => Ok(0),
        TokenKind::Equals
        | TokenKind::NotEqual
        | TokenKind::Less
        | TokenKind::More
        | TokenKind::MoreEqual
        | TokenKind::LessEqual => Ok(1),
        TokenKind::Plus | TokenKind::Minus => Ok(2),
        TokenKind::Asterisk | TokenKind::Modulus | TokenKind::Slash => Ok(3),
        TokenKind::Caret => Ok(4),
        found => Err(ParseErrorKind::UnexpectedToken { found }),
    }
}
