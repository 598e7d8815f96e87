//! Control-flow nodes.
//!
//! `if`/`elif`/`else` form a chain hanging off an `IfChain`; `while` is a
//! separate shape with no successor, so an `else` can never carry a
//! condition and a `while` can never carry a next branch.

use super::NodeTag;
use crate::{ensure_sufficient_stack, Identifier, NodeList, Token};

/// `if condition { body }` followed by an optional `elif`/`else` chain.
#[derive(Clone, Debug, PartialEq)]
pub struct IfChain {
    pub condition: Box<Token>,
    pub body: NodeList,
    pub next: Option<Box<ElseBranch>>,
}

impl IfChain {
    pub(crate) fn node_count(&self) -> usize {
        1 + self.condition.node_count()
            + self.body.node_count()
            + self.next.as_deref().map_or(0, ElseBranch::node_count)
    }

    /// Move the condition, body, and every branch's children into `out`.
    /// Returns the number of `elif`/`else` branches released.
    pub(crate) fn detach(&mut self, out: &mut Vec<Token>) -> usize {
        out.push(super::take(&mut self.condition));
        self.body.drain_into(out);

        let mut branches = 0;
        let mut next = self.next.take();
        while let Some(branch) = next {
            branches += 1;
            next = match *branch {
                ElseBranch::Elif {
                    condition,
                    body,
                    next,
                } => {
                    out.push(*condition);
                    out.extend(body);
                    next
                }
                ElseBranch::Else { body } => {
                    out.extend(body);
                    None
                }
            };
        }
        branches
    }
}

/// Successor of an `if` or `elif`.
#[derive(Clone, Debug, PartialEq)]
pub enum ElseBranch {
    Elif {
        condition: Box<Token>,
        body: NodeList,
        next: Option<Box<ElseBranch>>,
    },
    Else {
        body: NodeList,
    },
}

impl ElseBranch {
    pub fn elif(condition: Token, body: NodeList, next: Option<ElseBranch>) -> Self {
        ElseBranch::Elif {
            condition: Box::new(condition),
            body,
            next: next.map(Box::new),
        }
    }

    pub fn otherwise(body: NodeList) -> Self {
        ElseBranch::Else { body }
    }

    pub fn tag(&self) -> NodeTag {
        match self {
            ElseBranch::Elif { .. } => NodeTag::Elif,
            ElseBranch::Else { .. } => NodeTag::Else,
        }
    }

    pub fn body(&self) -> &NodeList {
        match self {
            ElseBranch::Elif { body, .. } | ElseBranch::Else { body } => body,
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        ensure_sufficient_stack(|| match self {
            ElseBranch::Elif {
                condition,
                body,
                next,
            } => {
                1 + condition.node_count()
                    + body.node_count()
                    + next.as_deref().map_or(0, ElseBranch::node_count)
            }
            ElseBranch::Else { body } => 1 + body.node_count(),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileLoop {
    pub condition: Box<Token>,
    pub body: NodeList,
}

/// `for iterator in iterable { body }`.
#[derive(Clone, Debug, PartialEq)]
pub struct ForLoop {
    pub iterable: Box<Token>,
    pub iterator: Identifier,
    pub body: NodeList,
}
