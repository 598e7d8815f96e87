//! fastcode IR - syntax tree types for the fastcode interpreter.
//!
//! This crate contains the data structures the parser driver builds and
//! the evaluator walks:
//! - Spans and raw lexer records (`Span`, `TokenKind`, `LexToken`)
//! - The syntax tree (`Token` and its node structs)
//! - `NodeList`, the owning node sequence that doubles as a parser stack
//! - Operator classification and the precedence table
//! - `ExpressionAssembler`, the working stacks of precedence climbing
//!
//! # Ownership
//!
//! The tree is strictly owned: every node has exactly one owner (another
//! node, a `NodeList`, or the program root). Sharing only happens between
//! runtime values, never between syntax nodes.

mod assemble;
pub mod ast;
mod error;
mod kind;
mod node_list;
mod precedence;
mod span;
mod stack;

pub use assemble::ExpressionAssembler;
pub use ast::{
    BinaryOp, CreateArray, CreateStruct, ElseBranch, ForLoop, FunctionCall, FunctionPrototype,
    Identifier, IfChain, Import, Indexer, Literal, NodeTag, Property, Reference, Return,
    SetVariable, StructPrototype, Token, UnaryOp, WhileLoop,
};
pub use error::{ParseError, ParseErrorKind, StackError};
pub use kind::{LexToken, TokenKind};
pub use node_list::NodeList;
pub use precedence::{is_binary_operator, precedence};
pub use span::Span;
pub use stack::ensure_sufficient_stack;
