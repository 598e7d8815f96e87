use std::cell::Cell;

use super::*;
use pretty_assertions::assert_eq;

thread_local! {
    static RELEASED_LITERALS: Cell<usize> = const { Cell::new(0) };
}

/// Called from `Token::drop`: tallies non-null literal leaves as they go.
pub(super) fn count_released_literal(token: &Token) {
    if matches!(token, Token::Value(literal) if !matches!(literal, Literal::Null)) {
        RELEASED_LITERALS.with(|n| n.set(n.get() + 1));
    }
}

/// Number of literal leaves released while `f` runs on this thread.
fn released_during(f: impl FnOnce()) -> usize {
    let before = RELEASED_LITERALS.with(Cell::get);
    f();
    RELEASED_LITERALS.with(Cell::get) - before
}

/// `0 + 1 + 1 + ...` folded into a left-leaning spine `depth` operators deep.
fn spine(depth: usize) -> Token {
    let mut tree = Token::numerical(0.0);
    for _ in 0..depth {
        tree = Token::binary(TokenKind::Plus, tree, Token::numerical(1.0));
    }
    tree
}

fn list(nodes: impl IntoIterator<Item = Token>) -> NodeList {
    nodes.into_iter().collect()
}

/// `function add(a, b) { return a + b; }`
fn add_function() -> Token {
    Token::function(
        Identifier::new("add"),
        list([Token::identifier("a"), Token::identifier("b")]),
        list([Token::ret(Some(Token::binary(
            TokenKind::Plus,
            Token::identifier("a"),
            Token::identifier("b"),
        )))]),
    )
}

#[test]
fn test_tags_cover_every_kind() {
    let nodes = [
        (Token::numerical(1.0), NodeTag::Value),
        (Token::identifier("x"), NodeTag::Identifier),
        (
            Token::set_variable(Identifier::new("x"), Token::null(), false),
            NodeTag::SetVariable,
        ),
        (
            Token::call(Identifier::new("f"), NodeList::new()),
            NodeTag::FunctionCall,
        ),
        (add_function(), NodeTag::FunctionPrototype),
        (
            Token::struct_prototype(Identifier::new("Point"), NodeList::new()),
            NodeTag::StructPrototype,
        ),
        (Token::property("x"), NodeTag::Property),
        (Token::indexer(Token::numerical(0.0)), NodeTag::Indexer),
        (
            Token::unary(TokenKind::Not, Token::identifier("x")),
            NodeTag::UnaryOp,
        ),
        (
            Token::binary(TokenKind::Plus, Token::null(), Token::null()),
            NodeTag::BinaryOp,
        ),
        (
            Token::if_chain(Token::identifier("c"), NodeList::new(), None),
            NodeTag::If,
        ),
        (
            Token::while_loop(Token::identifier("c"), NodeList::new()),
            NodeTag::While,
        ),
        (
            Token::for_loop(Token::identifier("xs"), Identifier::new("x"), NodeList::new()),
            NodeTag::For,
        ),
        (
            Token::create_struct(Identifier::new("Point")),
            NodeTag::CreateStruct,
        ),
        (Token::create_array(NodeList::new()), NodeTag::CreateArray),
        (Token::ret(None), NodeTag::Return),
        (Token::reference(Token::identifier("x")), NodeTag::Reference),
        (Token::import("lib/math"), NodeTag::Import),
    ];

    for (node, tag) in nodes {
        assert_eq!(node.tag(), tag);
    }
}

#[test]
fn test_branch_tags() {
    let elif = ElseBranch::elif(Token::identifier("y"), NodeList::new(), None);
    let otherwise = ElseBranch::otherwise(list([Token::identifier("z")]));
    assert_eq!(elif.tag(), NodeTag::Elif);
    assert_eq!(otherwise.tag(), NodeTag::Else);
    assert_eq!(otherwise.body().len(), 1);
}

#[test]
fn test_function_prototype_releases_every_node() {
    let function = add_function();
    // prototype, name, 2 params, return, binary op, 2 operands
    assert_eq!(function.node_count(), 8);
    assert_eq!(function.destroy(), 8);
}

#[test]
fn test_identifier_modifiers_are_owned() {
    // p.items[0]
    let modifiers = list([
        Token::property("items"),
        Token::indexer(Token::numerical(0.0)),
    ]);
    let identifier = Identifier::with_modifiers("p", modifiers);
    assert!(identifier.has_modifiers());
    assert!(!Identifier::new("p").has_modifiers());

    let node = Token::Identifier(identifier);
    assert_eq!(node.node_count(), 4);
    let copy = node.clone();
    assert_eq!(released_during(|| assert_eq!(node.destroy(), 4)), 1);
    assert_eq!(released_during(|| drop(copy)), 1);
}

#[test]
fn test_every_literal_is_released_once() {
    // if 1 { a = 2 } elif 3 { f(4, 5) } else { [6, 'x', "s"] }
    let chain = Token::if_chain(
        Token::numerical(1.0),
        list([Token::set_variable(
            Identifier::new("a"),
            Token::numerical(2.0),
            false,
        )]),
        Some(ElseBranch::elif(
            Token::numerical(3.0),
            list([Token::call(
                Identifier::new("f"),
                list([Token::numerical(4.0), Token::numerical(5.0)]),
            )]),
            Some(ElseBranch::otherwise(list([Token::create_array(list([
                Token::numerical(6.0),
                Token::character('x'),
                Token::string("s"),
            ]))]))),
        )),
    );
    assert_eq!(chain.node_count(), 16);

    let copy = chain.clone();
    assert_eq!(copy, chain);
    let mut released = 0;
    assert_eq!(released_during(|| released = chain.destroy()), 8);
    assert_eq!(released, 16);
    assert_eq!(released_during(|| drop(copy)), 8);
}

#[test]
fn test_if_chain_releases_all_branches() {
    // if x { a = 1 } elif y { } else { b }
    let chain = Token::if_chain(
        Token::identifier("x"),
        list([Token::set_variable(
            Identifier::new("a"),
            Token::numerical(1.0),
            false,
        )]),
        Some(ElseBranch::elif(
            Token::identifier("y"),
            NodeList::new(),
            Some(ElseBranch::otherwise(list([Token::identifier("b")]))),
        )),
    );
    assert_eq!(chain.node_count(), 9);
    let mut released = 0;
    assert_eq!(released_during(|| released = chain.destroy()), 1);
    assert_eq!(released, 9);
}

#[test]
fn test_for_and_while_release_bodies() {
    // for i in arr { print(i) }
    let for_loop = Token::for_loop(
        Token::identifier("arr"),
        Identifier::new("i"),
        list([Token::call(
            Identifier::new("print"),
            list([Token::identifier("i")]),
        )]),
    );
    assert_eq!(for_loop.node_count(), 6);
    assert_eq!(for_loop.destroy(), 6);

    let while_loop = Token::while_loop(
        Token::binary(TokenKind::Less, Token::identifier("i"), Token::numerical(3.0)),
        list([Token::ret(None)]),
    );
    assert_eq!(while_loop.node_count(), 5);
    assert_eq!(released_during(|| drop(while_loop)), 1);
}

#[test]
fn test_struct_nodes() {
    let prototype = Token::struct_prototype(
        Identifier::new("Point"),
        list([Token::identifier("x"), Token::identifier("y")]),
    );
    assert_eq!(prototype.destroy(), 4);

    let create = Token::set_variable(
        Identifier::new("p"),
        Token::create_struct(Identifier::new("Point")),
        true,
    );
    assert_eq!(create.destroy(), 4);
}

#[test]
fn test_leaf_and_wrapper_nodes() {
    assert_eq!(Token::import("io").destroy(), 1);
    assert_eq!(Token::string("hi").destroy(), 1);
    assert_eq!(Token::ret(Some(Token::numerical(0.0))).destroy(), 2);
    assert_eq!(Token::reference(Token::identifier("x")).destroy(), 2);
    assert_eq!(
        Token::create_array(list([Token::character('a'), Token::character('b')])).destroy(),
        3
    );
}

#[test]
fn test_deep_tree_destroy_does_not_overflow() {
    let depth = 200_000;
    let tree = spine(depth);
    assert_eq!(tree.node_count(), 2 * depth + 1);
    let mut released = 0;
    assert_eq!(released_during(|| released = tree.destroy()), depth + 1);
    assert_eq!(released, 2 * depth + 1);
}

#[test]
fn test_deep_tree_drop_does_not_overflow() {
    let depth = 200_000;
    let tree = spine(depth);
    assert_eq!(released_during(|| drop(tree)), depth + 1);

    let mut program = NodeList::new();
    program.push(spine(depth));
    assert_eq!(released_during(|| drop(program)), depth + 1);
}

#[test]
fn test_deep_tree_clone_and_compare() {
    let tree = spine(100_000);
    let copy = tree.clone();
    assert!(copy == tree);
    assert!(copy != spine(99_999));
}

#[test]
fn test_display_renders_prefix_form() {
    let expr = Token::binary(
        TokenKind::Plus,
        Token::numerical(1.0),
        Token::binary(TokenKind::Asterisk, Token::numerical(2.0), Token::numerical(3.0)),
    );
    assert_eq!(expr.to_string(), "(+ 1 (* 2 3))");
    assert_eq!(Token::ret(None).to_string(), "<Return>");
}
