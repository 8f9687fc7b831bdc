// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Grammar of the Ciut language and the front-end that scans and parses a source text.


use std::sync::OnceLock;
use ciut_core::lexer::{LexicalError, ParserToken, Scanner};
use ciut_core::log::{BufLog, LogReader};
use ciut_core::parser::{ParseTree, Parser, ParsingTable, SyntaxError};
use crate::grammar::{ProdRuleSet, EPSILON};
use crate::BuildError;

// ---------------------------------------------------------------------------------------------

pub const CIUT_TERMINALS: [&str; 24] = [
    ";", "(", ")", "{", "}", "[", "]", ",", "=", "<", "==", "+", "-", "*",
    "if", "else", "repeat", "until", "return", "break", "int", "void", "ID", "NUM",
];

/// Production rules of Ciut. The first one is the start symbol.
pub static CIUT_RULES: [(&str, &[&[&str]]); 44] = [
    ("Program",                    &[&["Declaration-list"]]),
    ("Declaration-list",           &[&["Declaration", "Declaration-list"], &[EPSILON]]),
    ("Declaration",                &[&["Declaration-initial", "Declaration-prime"]]),
    ("Declaration-initial",        &[&["Type-specifier", "ID"]]),
    ("Declaration-prime",          &[&["Fun-declaration-prime"], &["Var-declaration-prime"]]),
    ("Var-declaration-prime",      &[&[";"], &["[", "NUM", "]", ";"]]),
    ("Fun-declaration-prime",      &[&["(", "Params", ")", "Compound-stmt"]]),
    ("Type-specifier",             &[&["int"], &["void"]]),
    ("Params",                     &[&["int", "ID", "Param-prime", "Param-list"], &["void"]]),
    ("Param-list",                 &[&[",", "Param", "Param-list"], &[EPSILON]]),
    ("Param",                      &[&["Declaration-initial", "Param-prime"]]),
    ("Param-prime",                &[&["[", "]"], &[EPSILON]]),
    ("Compound-stmt",              &[&["{", "Declaration-list", "Statement-list", "}"]]),
    ("Statement-list",             &[&["Statement", "Statement-list"], &[EPSILON]]),
    ("Statement",                  &[&["Expression-stmt"], &["Compound-stmt"], &["Selection-stmt"], &["Iteration-stmt"], &["Return-stmt"]]),
    ("Expression-stmt",            &[&["Expression", ";"], &["break", ";"], &[";"]]),
    ("Selection-stmt",             &[&["if", "(", "Expression", ")", "Statement", "else", "Statement"]]),
    ("Iteration-stmt",             &[&["repeat", "Statement", "until", "(", "Expression", ")"]]),
    ("Return-stmt",                &[&["return", "Return-stmt-prime"]]),
    ("Return-stmt-prime",          &[&[";"], &["Expression", ";"]]),
    ("Expression",                 &[&["Simple-expression-zegond"], &["ID", "B"]]),
    ("B",                          &[&["=", "Expression"], &["[", "Expression", "]", "H"], &["Simple-expression-prime"]]),
    ("H",                          &[&["=", "Expression"], &["G", "D", "C"]]),
    ("Simple-expression-zegond",   &[&["Additive-expression-zegond", "C"]]),
    ("Simple-expression-prime",    &[&["Additive-expression-prime", "C"]]),
    ("C",                          &[&["Relop", "Additive-expression"], &[EPSILON]]),
    ("Relop",                      &[&["<"], &["=="]]),
    ("Additive-expression",        &[&["Term", "D"]]),
    ("Additive-expression-prime",  &[&["Term-prime", "D"]]),
    ("Additive-expression-zegond", &[&["Term-zegond", "D"]]),
    ("D",                          &[&["Addop", "Term", "D"], &[EPSILON]]),
    ("Addop",                      &[&["+"], &["-"]]),
    ("Term",                       &[&["Factor", "G"]]),
    ("Term-prime",                 &[&["Factor-prime", "G"]]),
    ("Term-zegond",                &[&["Factor-zegond", "G"]]),
    ("G",                          &[&["*", "Factor", "G"], &[EPSILON]]),
    ("Factor",                     &[&["(", "Expression", ")"], &["ID", "Var-call-prime"], &["NUM"]]),
    ("Var-call-prime",             &[&["(", "Args", ")"], &["Var-prime"]]),
    ("Var-prime",                  &[&["[", "Expression", "]"], &[EPSILON]]),
    ("Factor-prime",               &[&["(", "Args", ")"], &[EPSILON]]),
    ("Factor-zegond",              &[&["(", "Expression", ")"], &["NUM"]]),
    ("Args",                       &[&["Arg-list"], &[EPSILON]]),
    ("Arg-list",                   &[&["Expression", "Arg-list-prime"]]),
    ("Arg-list-prime",             &[&[",", "Expression", "Arg-list-prime"], &[EPSILON]]),
];

/// Builds the rule set of the Ciut grammar.
pub fn ciut_rules() -> Result<ProdRuleSet, BuildError> {
    ProdRuleSet::from_rules(&CIUT_TERMINALS, &CIUT_RULES)
}

/// Builds the parsing table of the Ciut grammar and returns it with the builder's log.
pub fn build_ciut_table() -> Result<(ParsingTable, BufLog), BuildError> {
    let mut prs = ciut_rules()?;
    let table = prs.make_parsing_table()?;
    Ok((table, prs.give_log()))
}

static CIUT_TABLE: OnceLock<Result<ParsingTable, BuildError>> = OnceLock::new();

/// Returns the parsing table of the Ciut grammar, which is built on the first call and shared
/// by all the parsers afterward.
pub fn ciut_table() -> Result<&'static ParsingTable, BuildError> {
    CIUT_TABLE
        .get_or_init(|| build_ciut_table().map(|(table, _)| table))
        .as_ref()
        .map_err(|e| e.clone())
}

// ---------------------------------------------------------------------------------------------

/// Everything produced by scanning and parsing a source text.
#[derive(Clone, PartialEq, Debug)]
pub struct CompileOutput {
    pub tree: ParseTree,
    pub syntax_errors: Vec<SyntaxError>,
    pub lexical_errors: Vec<LexicalError>,
    /// tokens of the whole text, with their line
    pub tokens: Vec<ParserToken>,
    /// identifiers in order of first appearance
    pub identifiers: Vec<String>,
    /// number of tokens read by the parser, including the end of stream
    pub num_tokens: usize,
    pub log: BufLog,
}

/// Scans and parses `text` in one pass: the parser pulls the tokens from the scanner as it needs them.
/// The input left after the parser stops is scanned too, so the tokens, the lexical errors, and the
/// identifiers cover the whole text.
pub fn compile(table: &ParsingTable, text: &str) -> CompileOutput {
    let mut scanner = Scanner::new(text);
    let mut parser = Parser::new(table);
    let outcome = parser.parse_stream(scanner.tokens());
    while scanner.next_token().is_some() {}
    let record = scanner.finish();
    CompileOutput {
        tree: outcome.tree,
        syntax_errors: outcome.errors,
        lexical_errors: record.errors,
        tokens: record.tokens,
        identifiers: record.identifiers,
        num_tokens: outcome.num_tokens,
        log: parser.give_log(),
    }
}
