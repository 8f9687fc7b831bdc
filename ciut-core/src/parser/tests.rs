// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

#![cfg(test)]

use super::*;
use crate::log::LogStatus;
use crate::{alt, hashset, sym};

/// Balanced parentheses:
/// ```text
/// S -> ( S ) S | ε
/// ```
/// T: 0:'(', 1:')'   NT: 0:S
fn build_table() -> ParsingTable {
    let mut symbol_table = SymbolTable::new();
    symbol_table.add_terminal("(");
    symbol_table.add_terminal(")");
    symbol_table.add_nonterminal("S");
    ParsingTable {
        num_nt: 1,
        num_t: 3,
        alts: vec![(0, alt!(t 0, nt 0, t 1, nt 0)), (0, alt!(e))],
        table: vec![0, 1, 1],
        first: vec![hashset![sym!(t 0), sym!(e)]],
        follow: vec![hashset![sym!(t 1), sym!(end)]],
        symbol_table,
        start: 0,
    }
}

fn tokens(text: &str) -> Vec<ParserToken> {
    let mut line = 1;
    let mut result = vec![];
    for c in text.chars() {
        match c {
            '\n' => line += 1,
            ' ' => {}
            '(' | ')' | '@' => result.push((Token::Symbol(c.to_string()), line)),
            _ => result.push((Token::Id(c.to_string()), line)),
        }
    }
    result
}

fn parse(table: &ParsingTable, text: &str) -> ParseOutcome {
    let mut parser = Parser::new(table);
    parser.parse_stream(tokens(text).into_iter())
}

fn errors_str(outcome: &ParseOutcome) -> Vec<String> {
    outcome.errors.iter().map(|e| e.to_string()).collect()
}

#[test]
fn table_lookup() {
    let table = build_table();
    assert_eq!(table.error_entry(), 2);
    assert_eq!(table.get_alt(0, sym!(t 0)), Some(0));
    assert_eq!(table.get_alt(0, sym!(t 1)), Some(1));
    assert_eq!(table.get_alt(0, sym!(end)), Some(1));
    assert_eq!(table.get_alt(0, sym!(e)), None);
    assert_eq!(table.get_alt(0, sym!(t 7)), None);
    assert!(table.is_in_first(0, sym!(t 0)));
    assert!(!table.is_in_first(0, sym!(e)));
    assert!(table.is_in_follow(0, sym!(end)));
    assert_eq!(table.lookahead(&Token::Symbol(")".to_string())), sym!(t 1));
    assert_eq!(table.lookahead(&Token::Symbol("@".to_string())), sym!(e));
    assert_eq!(table.lookahead(&Token::End), sym!(end));
}

#[test]
fn parse_valid() {
    let table = build_table();
    let tests = vec![
        ("( )", 2),
        ("( ( ) ) ( )", 6),
        ("", 0),
        ("(\n(\n)\n)", 4),
    ];
    for (test_id, (text, expected_leaves)) in tests.into_iter().enumerate() {
        let outcome = parse(&table, text);
        assert!(outcome.has_no_errors(), "test {test_id} failed: {:?}", errors_str(&outcome));
        let leaves = outcome.tree.leaves().into_iter().map(|t| t.lexeme().to_string()).collect::<Vec<_>>();
        let input = tokens(text).into_iter().map(|(t, _)| t.lexeme().to_string()).collect::<Vec<_>>();
        assert_eq!(leaves.len(), expected_leaves, "test {test_id} failed");
        assert_eq!(leaves, input, "test {test_id} failed");
        assert_eq!(outcome.num_tokens, expected_leaves + 1, "test {test_id} failed");
        // the end marker is the last child of the root and has been matched
        let root = outcome.tree.root();
        let end = *outcome.tree.children(root).last().unwrap();
        assert_eq!(outcome.tree.get(end).symbol, Symbol::End, "test {test_id} failed");
        assert_eq!(outcome.tree.get(end).token, Some(Token::End), "test {test_id} failed");
    }
}

#[test]
fn parse_tree_shape() {
    let table = build_table();
    let outcome = parse(&table, "( )");
    let tree = &outcome.tree;
    let st = Some(&table.symbol_table);
    let labels = tree.iter_pre().map(|i| tree.get(i).to_str(st)).collect::<Vec<_>>();
    assert_eq!(labels, vec!["S", "(SYMBOL, ()", "S", "epsilon", "(SYMBOL, ))", "S", "epsilon", "$"]);
    assert_eq!(tree.children(tree.root()).len(), 5);
    assert_eq!(tree.num_epsilons(), 2);
}

#[test]
fn parse_errors() {
    let table = build_table();
    let tests: Vec<(&str, Vec<&str>, usize)> = vec![
        // missing terminal: the terminal is skipped
        ("(",           vec!["#1 : syntax error, missing )"], 2),
        ("( (",         vec!["#1 : syntax error, missing )", "#1 : syntax error, missing )"], 3),
        // extra token after the start symbol
        ("( ) )",       vec!["#1 : syntax error, missing $"], 3),
        // illegal token discarded, then the parsing resumes
        ("@ ( )",       vec!["#1 : syntax error, illegal @"], 4),
        ("@ x\n( )",    vec!["#1 : syntax error, illegal @", "#1 : syntax error, illegal ID"], 5),
        // nothing valid: all discarded until the end
        ("@ @",         vec!["#1 : syntax error, illegal @", "#1 : syntax error, illegal @", "#1 : syntax error, missing S"], 3),
        ("(\n\n",       vec!["#1 : syntax error, missing )"], 2),
        // the diagnostic line follows the last token read
        ("( x\n)",      vec!["#1 : syntax error, illegal ID", "#2 : syntax error, missing S"], 4),
    ];
    for (test_id, (text, expected, expected_num_tokens)) in tests.into_iter().enumerate() {
        let mut parser = Parser::new(&table);
        let outcome = parser.parse_stream(tokens(text).into_iter());
        assert_eq!(errors_str(&outcome), expected, "test {test_id} failed");
        assert_eq!(outcome.num_tokens, expected_num_tokens, "test {test_id} failed");
        assert_eq!(parser.num_errors(), expected.len(), "test {test_id} failed");
    }
}

#[test]
fn recovery_keeps_statement() {
    let table = build_table();
    let mut parser = Parser::new(&table);
    let outcome = parser.parse_stream(tokens("@ ( )").into_iter());
    let leaves = outcome.tree.leaves().into_iter().map(|t| t.lexeme()).collect::<Vec<_>>();
    assert_eq!(leaves, vec!["(", ")"]);
    assert!(parser.get_notes().any(|n| n.starts_with("resynchronized on '('")), "{}", parser.get_log());
}

#[test]
fn missing_terminal_node() {
    let table = build_table();
    let outcome = parse(&table, "(");
    let tree = &outcome.tree;
    // S -> ( S ) S: the ')' node stays without token
    let children = tree.children(tree.root());
    let close = tree.get(children[2]);
    assert_eq!(close.symbol, sym!(t 1));
    assert_eq!(close.token, None);
    assert_eq!(close.to_str(Some(&table.symbol_table)), ")");
    assert_eq!(tree.get(children[4]).token, Some(Token::End));
}

#[test]
fn termination_bound() {
    let table = build_table();
    for n in [0, 1, 10, 100] {
        let mut text = "@ ".repeat(n);
        text.push_str(") ( ( ) ) ) (");
        let input_len = tokens(&text).len();
        let outcome = parse(&table, &text);
        assert!(outcome.num_tokens <= input_len + 1, "n = {n}");
        assert!(outcome.errors.len() <= outcome.num_tokens + outcome.tree.len(), "n = {n}");
    }
}

#[test]
fn idempotence() {
    let table = build_table();
    for text in ["( ( ) ( ) )", "@ ( ( ) )", ") ) (", "( x ) ) @ ("] {
        let outcome1 = parse(&table, text);
        let outcome2 = parse(&table, text);
        assert_eq!(outcome1, outcome2, "text '{text}'");
    }
}

#[test]
fn serde_tree() {
    let table = build_table();
    let outcome = parse(&table, "( )");
    let ser = outcome.tree.to_serde(Some(&table.symbol_table));
    assert_eq!(ser.name, "S");
    assert_eq!(ser.children.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["(", "S", ")", "S", "$"]);
    assert_eq!(ser.children[0].token, Some(SerToken { class: "SYMBOL".to_string(), lexeme: "(".to_string() }));
    assert_eq!(ser.children[1].children[0].name, "epsilon");
    assert_eq!(ser.children[4].token, None);
}

#[test]
fn syntax_error_display() {
    assert_eq!(SyntaxError::missing(3, ";").to_string(), "#3 : syntax error, missing ;");
    assert_eq!(SyntaxError::illegal(12, "else").to_string(), "#12 : syntax error, illegal else");
}
