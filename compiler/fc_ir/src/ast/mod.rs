//! Syntax tree nodes.
//!
//! `Token` is a closed sum over every node kind. Each variant owns its
//! children outright (`Box<Token>`, `Identifier`, `NodeList`), so a tree is
//! released exactly once when its owner lets go of it.
//!
//! # Module Structure
//!
//! - `nodes.rs`: literals, names, calls, prototypes, operators
//! - `control.rs`: `if`/`elif`/`else` chains, `while`, `for`

mod control;
mod nodes;

use std::fmt;

pub use control::{ElseBranch, ForLoop, IfChain, WhileLoop};
pub use nodes::{
    BinaryOp, CreateArray, CreateStruct, FunctionCall, FunctionPrototype, Identifier, Import,
    Indexer, Literal, Property, Reference, Return, SetVariable, StructPrototype, UnaryOp,
};

use crate::{ensure_sufficient_stack, NodeList, TokenKind};

/// Kind tag of a syntax node.
///
/// `Elif` and `Else` tag the branches of an `IfChain`; they never appear as a
/// free-standing `Token`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeTag {
    Value,
    Identifier,
    SetVariable,
    FunctionCall,
    FunctionPrototype,
    StructPrototype,
    Property,
    Indexer,
    UnaryOp,
    BinaryOp,
    If,
    Elif,
    Else,
    While,
    For,
    CreateStruct,
    CreateArray,
    Return,
    Reference,
    Import,
}

/// A syntax tree node.
///
/// Dropping a tree releases it iteratively, so nesting depth is not limited
/// by the native stack. `Clone`, `PartialEq` and `Debug` recurse through
/// `ensure_sufficient_stack`.
pub enum Token {
    Value(Literal),
    Identifier(Identifier),
    SetVariable(SetVariable),
    FunctionCall(FunctionCall),
    FunctionPrototype(FunctionPrototype),
    StructPrototype(StructPrototype),
    Property(Property),
    Indexer(Indexer),
    UnaryOp(UnaryOp),
    BinaryOp(BinaryOp),
    If(IfChain),
    While(WhileLoop),
    For(ForLoop),
    CreateStruct(CreateStruct),
    CreateArray(CreateArray),
    Return(Return),
    Reference(Reference),
    Import(Import),
}

// Constructors

impl Token {
    pub fn null() -> Self {
        Token::Value(Literal::Null)
    }

    pub fn numerical(value: f64) -> Self {
        Token::Value(Literal::Numerical(value))
    }

    pub fn character(value: char) -> Self {
        Token::Value(Literal::Character(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Token::Value(Literal::String(value.into()))
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Token::Identifier(Identifier::new(name))
    }

    pub fn set_variable(identifier: Identifier, value: Token, global: bool) -> Self {
        Token::SetVariable(SetVariable {
            identifier,
            value: Box::new(value),
            global,
        })
    }

    pub fn call(identifier: Identifier, arguments: NodeList) -> Self {
        Token::FunctionCall(FunctionCall {
            identifier,
            arguments,
        })
    }

    pub fn function(identifier: Identifier, params: NodeList, body: NodeList) -> Self {
        Token::FunctionPrototype(FunctionPrototype {
            identifier,
            params,
            body,
        })
    }

    pub fn struct_prototype(identifier: Identifier, properties: NodeList) -> Self {
        Token::StructPrototype(StructPrototype {
            identifier,
            properties,
        })
    }

    pub fn property(name: impl Into<String>) -> Self {
        Token::Property(Property { name: name.into() })
    }

    pub fn indexer(index: Token) -> Self {
        Token::Indexer(Indexer {
            index: Box::new(index),
        })
    }

    pub fn unary(op: TokenKind, operand: Token) -> Self {
        Token::UnaryOp(UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(op: TokenKind, left: Token, right: Token) -> Self {
        Token::BinaryOp(BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn if_chain(condition: Token, body: NodeList, next: Option<ElseBranch>) -> Self {
        Token::If(IfChain {
            condition: Box::new(condition),
            body,
            next: next.map(Box::new),
        })
    }

    pub fn while_loop(condition: Token, body: NodeList) -> Self {
        Token::While(WhileLoop {
            condition: Box::new(condition),
            body,
        })
    }

    pub fn for_loop(iterable: Token, iterator: Identifier, body: NodeList) -> Self {
        Token::For(ForLoop {
            iterable: Box::new(iterable),
            iterator,
            body,
        })
    }

    pub fn create_struct(identifier: Identifier) -> Self {
        Token::CreateStruct(CreateStruct { identifier })
    }

    pub fn create_array(elements: NodeList) -> Self {
        Token::CreateArray(CreateArray { elements })
    }

    pub fn ret(value: Option<Token>) -> Self {
        Token::Return(Return {
            value: value.map(Box::new),
        })
    }

    pub fn reference(value: Token) -> Self {
        Token::Reference(Reference {
            value: Box::new(value),
        })
    }

    pub fn import(path: impl Into<String>) -> Self {
        Token::Import(Import { path: path.into() })
    }
}

// Ownership walks

impl Token {
    pub fn tag(&self) -> NodeTag {
        match self {
            Token::Value(_) => NodeTag::Value,
            Token::Identifier(_) => NodeTag::Identifier,
            Token::SetVariable(_) => NodeTag::SetVariable,
            Token::FunctionCall(_) => NodeTag::FunctionCall,
            Token::FunctionPrototype(_) => NodeTag::FunctionPrototype,
            Token::StructPrototype(_) => NodeTag::StructPrototype,
            Token::Property(_) => NodeTag::Property,
            Token::Indexer(_) => NodeTag::Indexer,
            Token::UnaryOp(_) => NodeTag::UnaryOp,
            Token::BinaryOp(_) => NodeTag::BinaryOp,
            Token::If(_) => NodeTag::If,
            Token::While(_) => NodeTag::While,
            Token::For(_) => NodeTag::For,
            Token::CreateStruct(_) => NodeTag::CreateStruct,
            Token::CreateArray(_) => NodeTag::CreateArray,
            Token::Return(_) => NodeTag::Return,
            Token::Reference(_) => NodeTag::Reference,
            Token::Import(_) => NodeTag::Import,
        }
    }

    /// Number of nodes owned by this subtree, itself included.
    ///
    /// Identifiers and `elif`/`else` branches count as one node each.
    pub fn node_count(&self) -> usize {
        ensure_sufficient_stack(|| match self {
            Token::Value(_) | Token::Property(_) | Token::Import(_) => 1,
            Token::Identifier(identifier) => identifier.node_count(),
            Token::SetVariable(node) => 1 + node.identifier.node_count() + node.value.node_count(),
            Token::FunctionCall(node) => {
                1 + node.identifier.node_count() + node.arguments.node_count()
            }
            Token::FunctionPrototype(node) => {
                1 + node.identifier.node_count() + node.params.node_count() + node.body.node_count()
            }
            Token::StructPrototype(node) => {
                1 + node.identifier.node_count() + node.properties.node_count()
            }
            Token::Indexer(node) => 1 + node.index.node_count(),
            Token::UnaryOp(node) => 1 + node.operand.node_count(),
            Token::BinaryOp(node) => 1 + node.left.node_count() + node.right.node_count(),
            Token::If(chain) => chain.node_count(),
            Token::While(node) => 1 + node.condition.node_count() + node.body.node_count(),
            Token::For(node) => {
                1 + node.iterable.node_count() + node.iterator.node_count() + node.body.node_count()
            }
            Token::CreateStruct(node) => 1 + node.identifier.node_count(),
            Token::CreateArray(node) => 1 + node.elements.node_count(),
            Token::Return(node) => 1 + node.value.as_deref().map_or(0, Token::node_count),
            Token::Reference(node) => 1 + node.value.node_count(),
        })
    }

    /// Release this subtree, returning how many nodes were released.
    ///
    /// Every child listed for a kind is released exactly once, depth first.
    /// Adding a node kind without a case here is a compile error.
    pub fn destroy(mut self) -> usize {
        ensure_sufficient_stack(|| {
            let mut children = Vec::new();
            let own = 1 + self.detach_children(&mut children);
            own + children.into_iter().map(Token::destroy).sum::<usize>()
        })
    }

    /// Move every child node into `out`, leaving `self` without children.
    ///
    /// Returns how many owned nodes that are not `Token`s (embedded
    /// identifiers, `elif`/`else` branches) were released along the way.
    fn detach_children(&mut self, out: &mut Vec<Token>) -> usize {
        match self {
            Token::Value(_) | Token::Property(_) | Token::Import(_) => 0,
            Token::Identifier(identifier) => {
                identifier.detach_modifiers(out);
                0
            }
            Token::SetVariable(node) => {
                node.identifier.detach_modifiers(out);
                out.push(take(&mut node.value));
                1
            }
            Token::FunctionCall(node) => {
                node.identifier.detach_modifiers(out);
                node.arguments.drain_into(out);
                1
            }
            Token::FunctionPrototype(node) => {
                node.identifier.detach_modifiers(out);
                node.params.drain_into(out);
                node.body.drain_into(out);
                1
            }
            Token::StructPrototype(node) => {
                node.identifier.detach_modifiers(out);
                node.properties.drain_into(out);
                1
            }
            Token::Indexer(node) => {
                out.push(take(&mut node.index));
                0
            }
            Token::UnaryOp(node) => {
                out.push(take(&mut node.operand));
                0
            }
            Token::BinaryOp(node) => {
                out.push(take(&mut node.left));
                out.push(take(&mut node.right));
                0
            }
            Token::If(chain) => chain.detach(out),
            Token::While(node) => {
                out.push(take(&mut node.condition));
                node.body.drain_into(out);
                0
            }
            Token::For(node) => {
                out.push(take(&mut node.iterable));
                node.iterator.detach_modifiers(out);
                node.body.drain_into(out);
                1
            }
            Token::CreateStruct(node) => {
                node.identifier.detach_modifiers(out);
                1
            }
            Token::CreateArray(node) => {
                node.elements.drain_into(out);
                0
            }
            Token::Return(node) => {
                out.extend(node.value.take().map(|value| *value));
                0
            }
            Token::Reference(node) => {
                out.push(take(&mut node.value));
                0
            }
        }
    }
}

/// Move a boxed child out, leaving a `null` leaf in its place.
fn take(slot: &mut Token) -> Token {
    std::mem::replace(slot, Token::null())
}

impl Drop for Token {
    fn drop(&mut self) {
        #[cfg(test)]
        tests::count_released_literal(self);

        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

macro_rules! guarded_token_impls {
    ($($variant:ident),* $(,)?) => {
        impl Clone for Token {
            fn clone(&self) -> Self {
                ensure_sufficient_stack(|| match self {
                    $(Token::$variant(node) => Token::$variant(node.clone()),)*
                })
            }
        }

        impl PartialEq for Token {
            fn eq(&self, other: &Self) -> bool {
                ensure_sufficient_stack(|| match (self, other) {
                    $((Token::$variant(a), Token::$variant(b)) => a == b,)*
                    _ => false,
                })
            }
        }

        impl fmt::Debug for Token {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                ensure_sufficient_stack(|| match self {
                    $(Token::$variant(node) => {
                        f.debug_tuple(stringify!($variant)).field(node).finish()
                    })*
                })
            }
        }
    };
}

guarded_token_impls!(
    Value,
    Identifier,
    SetVariable,
    FunctionCall,
    FunctionPrototype,
    StructPrototype,
    Property,
    Indexer,
    UnaryOp,
    BinaryOp,
    If,
    While,
    For,
    CreateStruct,
    CreateArray,
    Return,
    Reference,
    Import,
);

/// Prefix rendering of expression nodes: `(+ 1 (* 2 3))`.
///
/// Statement nodes render as their tag; this is for diagnostics and tests,
/// not for round-tripping source.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Token::Value(Literal::Null) => f.write_str("null"),
            Token::Value(Literal::Numerical(n)) => write!(f, "{n}"),
            Token::Value(Literal::Character(c)) => write!(f, "{c:?}"),
            Token::Value(Literal::String(s)) => write!(f, "{s:?}"),
            Token::Identifier(identifier) => f.write_str(&identifier.name),
            Token::Property(property) => write!(f, ".{}", property.name),
            Token::Indexer(indexer) => write!(f, "[{}]", indexer.index),
            Token::UnaryOp(node) => write!(f, "({} {})", node.op, node.operand),
            Token::BinaryOp(node) => write!(f, "({} {} {})", node.op, node.left, node.right),
            Token::Reference(node) => write!(f, "(& {})", node.value),
            other => write!(f, "<{:?}>", other.tag()),
        })
    }
}

#[cfg(test)]
mod tests;
