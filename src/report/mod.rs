// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Text and JSON renderings of the compilation results.

pub(crate) mod tests;

use std::collections::BTreeMap;
use serde::Serialize;
use ciut_core::lexer::{LexicalError, Line, ParserToken, KEYWORDS};
use ciut_core::parser::{ParseTree, Symbol, SyntaxError};
use ciut_core::sym_table::SymbolTable;
use crate::CollectJoin;

/// Draws the parse tree, one node per line:
///
/// ```text
/// Program
///     ├── Declaration-list
///     │   ├── Declaration
///     │   │   ├── Declaration-initial
/// ```
pub fn tree_to_str(tree: &ParseTree, symbol_table: Option<&SymbolTable>) -> String {
    let label = |index: usize| {
        let node = tree.get(index);
        if node.symbol == Symbol::End { "$".to_string() } else { node.to_str(symbol_table) }
    };
    if tree.is_empty() {
        return String::new();
    }
    let root = tree.root();
    let mut lines = vec![label(root)];
    // the root counts as a last child
    let mut stack = tree.children(root).iter().rev()
        .enumerate()
        .map(|(i, &c)| (c, "    ".to_string(), i == 0))
        .to_vec();
    while let Some((index, prefix, is_last)) = stack.pop() {
        lines.push(format!("{prefix}{}{}", if is_last { "└── " } else { "├── " }, label(index)));
        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        stack.extend(tree.children(index).iter().rev()
            .enumerate()
            .map(|(i, &c)| (c, child_prefix.clone(), i == 0)));
    }
    lines.join("\n")
}

pub fn syntax_errors_to_str(errors: &[SyntaxError]) -> String {
    if errors.is_empty() {
        "There is no syntax error.".to_string()
    } else {
        errors.iter().join("\n")
    }
}

fn group_by_line<'a, T, I>(items: I) -> BTreeMap<Line, Vec<String>>
    where I: Iterator<Item = (Line, &'a T)>,
          T: ToString + 'a,
{
    let mut groups = BTreeMap::<Line, Vec<String>>::new();
    for (line, item) in items {
        groups.entry(line).or_default().push(item.to_string());
    }
    groups
}

fn groups_to_str(groups: BTreeMap<Line, Vec<String>>) -> String {
    groups.into_iter().map(|(line, items)| format!("{line}.\t{}\n", items.join(" "))).collect()
}

/// Lists the lexical errors, grouped by line: `3.\t(5x, Invalid number) (y@, Invalid input)`.
pub fn lexical_errors_to_str(errors: &[LexicalError]) -> String {
    if errors.is_empty() {
        "There is no lexical error.\n".to_string()
    } else {
        groups_to_str(group_by_line(errors.iter().map(|e| (e.line, e))))
    }
}

/// Lists the tokens, grouped by line: `1.\t(KEYWORD, int) (ID, x) (SYMBOL, ;)`.
pub fn tokens_to_str(tokens: &[ParserToken]) -> String {
    groups_to_str(group_by_line(tokens.iter().map(|(t, line)| (*line, t))))
}

/// Lists the keywords, then the identifiers in order of first appearance.
pub fn symbol_table_to_str(identifiers: &[String]) -> String {
    KEYWORDS.iter().map(|k| k.to_string())
        .chain(identifiers.iter().cloned())
        .enumerate()
        .map(|(i, name)| format!("{}.\t{name}\n", i + 1))
        .collect()
}

// ---------------------------------------------------------------------------------------------

enum JsonStep {
    Open(usize),
    Comma,
    Close,
}

/// Writes the parse tree in compact JSON, with the same nested layout as [`SerNode`](ciut_core::parser::SerNode):
/// `{"name":"Program","children":[{"name":"Declaration-list",...},{"name":"$"}]}`.
///
/// The tree is walked with an explicit stack, so the depth of the tree isn't limited by the call stack.
pub fn tree_to_json(tree: &ParseTree, symbol_table: Option<&SymbolTable>) -> Result<String, serde_json::Error> {
    if tree.is_empty() {
        return Ok("null".to_string());
    }
    let mut json = String::new();
    let mut stack = vec![JsonStep::Open(tree.root())];
    while let Some(step) = stack.pop() {
        match step {
            JsonStep::Open(index) => {
                let node = tree.get(index);
                json.push_str("{\"name\":");
                json.push_str(&serde_json::to_string(&node.ser_name(symbol_table))?);
                if let Some(token) = node.ser_token() {
                    json.push_str(",\"token\":");
                    json.push_str(&serde_json::to_string(&token)?);
                }
                let children = tree.children(index);
                if children.is_empty() {
                    json.push('}');
                } else {
                    json.push_str(",\"children\":[");
                    stack.push(JsonStep::Close);
                    for (i, &child) in children.iter().enumerate().rev() {
                        stack.push(JsonStep::Open(child));
                        if i > 0 {
                            stack.push(JsonStep::Comma);
                        }
                    }
                }
            }
            JsonStep::Comma => json.push(','),
            JsonStep::Close => json.push_str("]}"),
        }
    }
    Ok(json)
}

#[derive(Serialize)]
struct Diagnostics<'a> {
    syntax_errors: &'a [SyntaxError],
    lexical_errors: &'a [LexicalError],
}

pub fn diagnostics_to_json(syntax_errors: &[SyntaxError], lexical_errors: &[LexicalError]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Diagnostics { syntax_errors, lexical_errors })
}
