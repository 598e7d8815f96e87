//! Owning, growable sequence of syntax nodes.
//!
//! `NodeList` holds the statements of a block, the arguments of a call, the
//! elements of an array literal, and serves as the parser driver's working
//! stack (`push`/`top`/`pop`).
//!
//! # Growth
//!
//! Capacity starts at 5 and grows by exactly 5 slots whenever a push finds
//! the list full. Growth is linear, not geometric: after `n` pushes the
//! capacity is `5 + 5 * ceil(max(0, n - 5) / 5)`.

use std::fmt;
use std::ops::Index;

use crate::{StackError, Token};

/// Capacity of a freshly created list.
pub const INITIAL_CAPACITY: usize = 5;

/// Slots added each time a full list is pushed to.
pub const GROWTH: usize = 5;

/// Ordered sequence of owned nodes.
#[derive(Clone)]
pub struct NodeList {
    nodes: Vec<Token>,
    /// Logical capacity, tracked separately since `Vec` may over-allocate.
    capacity: usize,
}

impl NodeList {
    pub fn new() -> Self {
        NodeList {
            nodes: Vec::with_capacity(INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
        }
    }

    /// Append `node`, growing by `GROWTH` slots if the list is full.
    pub fn push(&mut self, node: Token) {
        if self.nodes.len() == self.capacity {
            self.extend_capacity(GROWTH);
        }
        self.nodes.push(node);
    }

    fn extend_capacity(&mut self, additional: usize) {
        self.nodes.reserve_exact(additional);
        self.capacity += additional;
        tracing::trace!(capacity = self.capacity, "node list grown");
    }

    /// Last node pushed.
    pub fn top(&self) -> Result<&Token, StackError> {
        self.nodes.last().ok_or(StackError::EmptyStack)
    }

    pub fn top_mut(&mut self) -> Result<&mut Token, StackError> {
        self.nodes.last_mut().ok_or(StackError::EmptyStack)
    }

    /// Remove and return the last node. Capacity is left unchanged.
    pub fn pop(&mut self) -> Result<Token, StackError> {
        self.nodes.pop().ok_or(StackError::EmptyStack)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.nodes
    }

    /// Number of nodes owned by every subtree in the list.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(Token::node_count).sum()
    }

    /// Move every node into `out`, leaving the list empty.
    pub(crate) fn drain_into(&mut self, out: &mut Vec<Token>) {
        out.append(&mut self.nodes);
    }

    /// Release every node in index order, returning how many nodes were
    /// released in total.
    pub fn destroy(self) -> usize {
        self.nodes.into_iter().map(Token::destroy).sum()
    }
}

impl Default for NodeList {
    fn default() -> Self {
        NodeList::new()
    }
}

impl PartialEq for NodeList {
    /// Lists compare by contents; capacity is an allocation detail.
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl fmt::Debug for NodeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.nodes).finish()
    }
}

impl Index<usize> for NodeList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.nodes[index]
    }
}

impl FromIterator<Token> for NodeList {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        let mut list = NodeList::new();
        for node in iter {
            list.push(node);
        }
        list
    }
}

impl IntoIterator for NodeList {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
