//! Precedence climbing over an operand stack and an operator stack.
//!
//! The parser driver reads a flat infix run (`1 + 2 * 3`) and feeds it here
//! one piece at a time. Operands are fully built subtrees (literals,
//! identifiers, calls, parenthesized groups, unary operations); operators are
//! the raw lexer records.
//!
//! When an operator arrives, every stacked operator that binds at least as
//! tightly is folded into a `BinaryOp` first, so equal levels associate to
//! the left.

use crate::{precedence, LexToken, NodeList, ParseError, ParseErrorKind, Span, Token};

/// Working stacks for one infix expression.
#[derive(Debug, Default)]
pub struct ExpressionAssembler {
    operands: NodeList,
    operators: Vec<Pending>,
}

/// A stacked operator with its already-checked level.
#[derive(Copy, Clone, Debug)]
struct Pending {
    token: LexToken,
    level: u8,
}

impl ExpressionAssembler {
    pub fn new() -> Self {
        ExpressionAssembler::default()
    }

    pub fn push_operand(&mut self, operand: Token) {
        self.operands.push(operand);
    }

    /// Stack a binary operator, folding anything that binds at least as
    /// tightly.
    pub fn push_operator(&mut self, token: LexToken) -> Result<(), ParseError> {
        let level =
            precedence(token.kind).map_err(|kind| ParseError::new(kind, token.span))?;

        while let Some(top) = self.operators.last() {
            if level > top.level {
                break;
            }
            self.fold()?;
        }

        self.operators.push(Pending { token, level });
        Ok(())
    }

    /// Fold every remaining operator and return the single resulting tree.
    pub fn finish(mut self) -> Result<Token, ParseError> {
        while !self.operators.is_empty() {
            self.fold()?;
        }

        match self.operands.len() {
            0 => Err(ParseError::new(ParseErrorKind::EmptyExpression, Span::DUMMY)),
            1 => self
                .operands
                .pop()
                .map_err(|_| ParseError::new(ParseErrorKind::EmptyExpression, Span::DUMMY)),
            _ => Err(ParseError::new(ParseErrorKind::ExtraOperand, Span::DUMMY)),
        }
    }

    /// Number of operands waiting to be folded.
    pub fn pending_operands(&self) -> usize {
        self.operands.len()
    }

    /// Pop the top operator and its two operands, push the combined node.
    fn fold(&mut self) -> Result<(), ParseError> {
        let Some(Pending { token, .. }) = self.operators.pop() else {
            return Ok(());
        };
        let missing = || {
            ParseError::new(
                ParseErrorKind::MissingOperand {
                    operator: token.kind,
                },
                token.span,
            )
        };

        let right = self.operands.pop().map_err(|_| missing())?;
        let left = self.operands.pop().map_err(|_| missing())?;

        tracing::trace!(op = %token.kind, "folding binary operator");
        self.operands.push(Token::binary(token.kind, left, right));
        Ok(())
    }
}
