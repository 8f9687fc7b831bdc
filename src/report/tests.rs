// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

#![cfg(test)]

use ciut_core::lexer::{LexErrorKind, LexicalError};
use ciut_core::parser::SyntaxError;
use crate::ciut::{ciut_table, compile};
use super::*;

#[test]
fn report_tree() {
    let table = ciut_table().expect("Ciut is LL(1)");
    let st = Some(&table.symbol_table);
    let tests = vec![
        ("int x;\n", "\
Program
    ├── Declaration-list
    │   ├── Declaration
    │   │   ├── Declaration-initial
    │   │   │   ├── Type-specifier
    │   │   │   │   └── (KEYWORD, int)
    │   │   │   └── (ID, x)
    │   │   └── Declaration-prime
    │   │       └── Var-declaration-prime
    │   │           └── (SYMBOL, ;)
    │   └── Declaration-list
    │       └── epsilon
    └── $"),
        ("int x\n", "\
Program
    ├── Declaration-list
    │   ├── Declaration
    │   │   ├── Declaration-initial
    │   │   │   ├── Type-specifier
    │   │   │   │   └── (KEYWORD, int)
    │   │   │   └── (ID, x)
    │   │   └── Declaration-prime
    │   │       └── epsilon
    │   └── Declaration-list
    │       └── epsilon
    └── $"),
        ("void f(void) { return; }", "\
Program
    ├── Declaration-list
    │   ├── Declaration
    │   │   ├── Declaration-initial
    │   │   │   ├── Type-specifier
    │   │   │   │   └── (KEYWORD, void)
    │   │   │   └── (ID, f)
    │   │   └── Declaration-prime
    │   │       └── Fun-declaration-prime
    │   │           ├── (SYMBOL, ()
    │   │           ├── Params
    │   │           │   └── (KEYWORD, void)
    │   │           ├── (SYMBOL, ))
    │   │           └── Compound-stmt
    │   │               ├── (SYMBOL, {)
    │   │               ├── Declaration-list
    │   │               │   └── epsilon
    │   │               ├── Statement-list
    │   │               │   ├── Statement
    │   │               │   │   └── Return-stmt
    │   │               │   │       ├── (KEYWORD, return)
    │   │               │   │       └── Return-stmt-prime
    │   │               │   │           └── (SYMBOL, ;)
    │   │               │   └── Statement-list
    │   │               │       └── epsilon
    │   │               └── (SYMBOL, })
    │   └── Declaration-list
    │       └── epsilon
    └── $"),
        ("", "\
Program
    ├── Declaration-list
    │   └── epsilon
    └── $"),
    ];
    for (test_id, (text, expected)) in tests.into_iter().enumerate() {
        let output = compile(table, text);
        assert_eq!(tree_to_str(&output.tree, st), expected, "test {test_id} failed");
    }
}

#[test]
fn report_syntax_errors() {
    assert_eq!(syntax_errors_to_str(&[]), "There is no syntax error.");
    let errors = vec![SyntaxError::missing(2, "Term"), SyntaxError::illegal(3, ")")];
    assert_eq!(syntax_errors_to_str(&errors), "#2 : syntax error, missing Term\n#3 : syntax error, illegal )");
}

#[test]
fn report_scan_results() {
    let table = ciut_table().expect("Ciut is LL(1)");
    let output = compile(table, "int 5x; int y@;\n/* never closed comment\n");
    assert_eq!(lexical_errors_to_str(&output.lexical_errors),
               "1.\t(5x, Invalid number) (y@, Invalid input)\n2.\t(/*  never ..., Unclosed comment)\n");
    assert_eq!(tokens_to_str(&output.tokens), "1.\t(KEYWORD, int) (SYMBOL, ;) (KEYWORD, int) (SYMBOL, ;)\n");
    assert_eq!(lexical_errors_to_str(&[]), "There is no lexical error.\n");

    let output = compile(table, "int a;\nvoid main(void) {\n  a = b;\n}\n");
    assert_eq!(tokens_to_str(&output.tokens), "\
1.\t(KEYWORD, int) (ID, a) (SYMBOL, ;)
2.\t(KEYWORD, void) (ID, main) (SYMBOL, () (KEYWORD, void) (SYMBOL, )) (SYMBOL, {)
3.\t(ID, a) (SYMBOL, =) (ID, b) (SYMBOL, ;)
4.\t(SYMBOL, })
");
    assert_eq!(symbol_table_to_str(&output.identifiers), "\
1.\tbreak
2.\telse
3.\tif
4.\tint
5.\trepeat
6.\treturn
7.\tuntil
8.\tvoid
9.\ta
10.\tmain
11.\tb
");
}

#[test]
fn report_json() {
    let table = ciut_table().expect("Ciut is LL(1)");
    let st = Some(&table.symbol_table);
    let output = compile(table, "int x\n");
    let json = tree_to_json(&output.tree, st).expect("serializable tree");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(value["name"], "Program");
    assert_eq!(value["children"][1]["name"], "$");
    assert!(value["children"][1].get("token").is_none());
    let decl_initial = &value["children"][0]["children"][0]["children"][0];
    assert_eq!(decl_initial["name"], "Declaration-initial");
    assert_eq!(decl_initial["children"][1]["token"], serde_json::json!({ "class": "ID", "lexeme": "x" }));
    assert_eq!(value["children"][0]["children"][0]["children"][1]["children"][0]["name"], "epsilon");

    let json = diagnostics_to_json(&output.syntax_errors, &[LexicalError::new(1, "5x", LexErrorKind::InvalidNumber)])
        .expect("serializable diagnostics");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(value, serde_json::json!({
        "syntax_errors": [{ "line": 1, "kind": "missing", "symbol": "Declaration-prime" }],
        "lexical_errors": [{ "line": 1, "text": "5x", "kind": "Invalid number" }]
    }));
}

#[test]
fn report_json_layout() {
    let table = ciut_table().expect("Ciut is LL(1)");
    let st = Some(&table.symbol_table);
    let tests = vec![
        "",
        "int x\n",
        "int a[3];\nvoid main(void) {\n  if (a[0] < 2) a[1] = 1; else return;\n}\n",
        "void main(void) {\n    x = 3 +;\n}\n",
    ];
    for (test_id, text) in tests.into_iter().enumerate() {
        let output = compile(table, text);
        let json = tree_to_json(&output.tree, st).expect("serializable tree");
        let expected = serde_json::to_string(&output.tree.to_serde(st)).expect("serializable tree");
        assert_eq!(json, expected, "test {test_id} failed");
    }
}

#[test]
fn report_json_deep() {
    let table = ciut_table().expect("Ciut is LL(1)");
    let st = Some(&table.symbol_table);
    let text = format!("void f(void) {{ x = {}1{}; }}", "(".repeat(3000), ")".repeat(3000));
    let output = compile(table, &text);
    assert!(output.syntax_errors.is_empty());
    assert!(output.lexical_errors.is_empty());
    let json = tree_to_json(&output.tree, st).expect("serializable tree");
    assert_eq!(json.matches("\"name\":").count(), output.tree.len());
    assert!(json.starts_with("{\"name\":\"Program\",\"children\":[{\"name\":\"Declaration-list\""));
    assert!(json.ends_with(",{\"name\":\"$\"}]}"));
}
