//! Leaf, naming, call, and operator nodes.

use crate::{NodeList, Token, TokenKind};

/// Datum owned by a value-literal node.
///
/// The evaluator turns it into a runtime value; string literals become
/// character collections at that point.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Numerical(f64),
    Character(char),
    String(String),
}

/// A name plus the property/index operations applied after it.
///
/// `a.b[0]` is `Identifier { name: "a", modifiers: [Property(b), Indexer(0)] }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub modifiers: Option<NodeList>,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier {
            name: name.into(),
            modifiers: None,
        }
    }

    pub fn with_modifiers(name: impl Into<String>, modifiers: NodeList) -> Self {
        Identifier {
            name: name.into(),
            modifiers: Some(modifiers),
        }
    }

    #[inline]
    pub fn has_modifiers(&self) -> bool {
        self.modifiers.is_some()
    }

    pub(crate) fn node_count(&self) -> usize {
        1 + self.modifiers.as_ref().map_or(0, NodeList::node_count)
    }

    pub(crate) fn detach_modifiers(&mut self, out: &mut Vec<Token>) {
        if let Some(modifiers) = &mut self.modifiers {
            modifiers.drain_into(out);
        }
    }
}

/// `name = value`, optionally into the global table.
#[derive(Clone, Debug, PartialEq)]
pub struct SetVariable {
    pub identifier: Identifier,
    pub value: Box<Token>,
    pub global: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub identifier: Identifier,
    pub arguments: NodeList,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionPrototype {
    pub identifier: Identifier,
    pub params: NodeList,
    pub body: NodeList,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructPrototype {
    pub identifier: Identifier,
    pub properties: NodeList,
}

/// `.name` inside a modifier chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: String,
}

/// `[index]` inside a modifier chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Indexer {
    pub index: Box<Token>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryOp {
    pub op: TokenKind,
    pub operand: Box<Token>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryOp {
    pub op: TokenKind,
    pub left: Box<Token>,
    pub right: Box<Token>,
}

/// `new Name`; fields are filled in at runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct CreateStruct {
    pub identifier: Identifier,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreateArray {
    pub elements: NodeList,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Return {
    pub value: Option<Box<Token>>,
}

/// `&expr`: bind the result's apartment itself rather than a copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    pub value: Box<Token>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    pub path: String,
}
