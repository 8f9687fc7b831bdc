// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use serde::Serialize;
use crate::alt::Alternative;
use crate::lexer::{Line, ParserToken, Token};
use crate::log::{BufLog, LogReader, Logger};
use crate::sym_table::SymbolTable;
use crate::vectree::VecTree;
use crate::{AltId, CollectJoin, TokenId, VarId};

mod tests;

// ---------------------------------------------------------------------------------------------

#[derive(Clone, Copy, Default, PartialEq, PartialOrd, Eq, Ord, Debug, Hash)]
pub enum Symbol {
    T(TokenId),         // terminal
    NT(VarId),          // non-terminal
    #[default] Empty,   // empty symbol
    End                 // end of stream
}

impl Symbol {
    pub fn is_end(&self) -> bool {
        matches!(self, Symbol::End)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Symbol::Empty)
    }

    pub fn is_t(&self) -> bool {
        matches!(self, Symbol::T(_))
    }

    pub fn is_nt(&self) -> bool {
        matches!(self, Symbol::NT(_))
    }

    /// Converts the symbol to string, using the symbol table if available.
    pub fn to_str(&self, symbol_table: Option<&SymbolTable>) -> String {
        symbol_table.map(|t| t.get_name(self)).unwrap_or(self.to_string())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Empty => write!(f, "ε"),
            Symbol::T(id) => write!(f, ":{id}"),
            Symbol::NT(id) => write!(f, "{id}"),
            Symbol::End => write!(f, "$"),
        }
    }
}

// ---------------------------------------------------------------------------------------------

/// LL(1) parsing table and the sets the parser needs for its error recovery.
///
/// The table has one row per nonterminal and one column per terminal, plus a last column
/// for the end of stream. Each cell holds the ID of the alternative to predict, or
/// [`error_entry()`](ParsingTable::error_entry) if there is none.
///
/// Once built, the table is immutable and can be shared by any number of parsers.
#[derive(Clone, PartialEq, Debug)]
pub struct ParsingTable {
    pub num_nt: usize,
    /// number of columns: terminals + end of stream
    pub num_t: usize,
    pub alts: Vec<(VarId, Alternative)>,
    pub table: Vec<AltId>,
    /// NT -> FIRST(NT), including `Symbol::Empty` if NT is nullable
    pub first: Vec<HashSet<Symbol>>,
    /// NT -> FOLLOW(NT)
    pub follow: Vec<HashSet<Symbol>>,
    pub symbol_table: SymbolTable,
    pub start: VarId,
}

impl ParsingTable {
    /// Table entry meaning "no alternative".
    pub fn error_entry(&self) -> AltId {
        self.alts.len() as AltId
    }

    /// Column of a terminal or of the end of stream.
    pub fn column(&self, sym: Symbol) -> Option<usize> {
        match sym {
            Symbol::T(t) if (t as usize) < self.num_t - 1 => Some(t as usize),
            Symbol::End => Some(self.num_t - 1),
            _ => None,
        }
    }

    /// Returns the alternative predicted for nonterminal `var` when the lookahead is `sym`.
    pub fn get_alt(&self, var: VarId, sym: Symbol) -> Option<AltId> {
        let col = self.column(sym)?;
        let alt_id = self.table[var as usize * self.num_t + col];
        if alt_id < self.error_entry() { Some(alt_id) } else { None }
    }

    pub fn get_alternative(&self, alt_id: AltId) -> &Alternative {
        &self.alts[alt_id as usize].1
    }

    pub fn is_in_first(&self, var: VarId, sym: Symbol) -> bool {
        !sym.is_empty() && self.first[var as usize].contains(&sym)
    }

    pub fn is_in_follow(&self, var: VarId, sym: Symbol) -> bool {
        !sym.is_empty() && self.follow[var as usize].contains(&sym)
    }

    /// Maps a token to its grammar terminal. A token whose category isn't a terminal of the
    /// grammar gives `Symbol::Empty`, which no table entry, FIRST, or FOLLOW set contains.
    pub fn lookahead(&self, token: &Token) -> Symbol {
        if token.is_end() {
            Symbol::End
        } else {
            self.symbol_table.find_terminal(token.category()).map(Symbol::T).unwrap_or(Symbol::Empty)
        }
    }
}

// ---------------------------------------------------------------------------------------------

/// Node of the parse tree: a grammar symbol, and the token it matched if it's a terminal.
#[derive(Clone, PartialEq, Debug)]
pub struct ParseNode {
    pub symbol: Symbol,
    pub token: Option<Token>,
}

impl ParseNode {
    pub fn new(symbol: Symbol) -> Self {
        ParseNode { symbol, token: None }
    }

    /// Leaf of an empty derivation
    pub fn epsilon() -> Self {
        ParseNode { symbol: Symbol::Empty, token: None }
    }

    pub fn is_epsilon(&self) -> bool {
        self.symbol.is_empty()
    }

    /// Returns the node's label: `epsilon`, `(CLASS, lexeme)` if it matched a token, or the symbol name.
    pub fn to_str(&self, symbol_table: Option<&SymbolTable>) -> String {
        match (&self.symbol, &self.token) {
            (Symbol::Empty, _) => "epsilon".to_string(),
            (_, Some(token)) => token.to_string(),
            (symbol, None) => symbol.to_str(symbol_table),
        }
    }

    /// Name of the node in the serialized tree.
    pub fn ser_name(&self, symbol_table: Option<&SymbolTable>) -> String {
        match self.symbol {
            Symbol::Empty => "epsilon".to_string(),
            Symbol::End => "$".to_string(),
            s => s.to_str(symbol_table),
        }
    }

    /// Matched token in the serialized tree. The end marker has none.
    pub fn ser_token(&self) -> Option<SerToken> {
        self.token.as_ref().filter(|t| !t.is_end())
            .map(|t| SerToken { class: t.class().to_string(), lexeme: t.lexeme().to_string() })
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct SerToken {
    pub class: String,
    pub lexeme: String,
}

/// Serializable, nested representation of a parse tree node.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct SerNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<SerToken>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SerNode>,
}

/// Concrete parse tree. The root is the start symbol and the last child of the root is the end marker.
#[derive(Clone, PartialEq, Debug)]
pub struct ParseTree {
    tree: VecTree<ParseNode>,
}

impl ParseTree {
    pub fn root(&self) -> usize {
        self.tree.get_root().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn get(&self, index: usize) -> &ParseNode {
        self.tree.get(index)
    }

    pub fn children(&self, index: usize) -> &[usize] {
        self.tree.children(index)
    }

    /// Iterates over the node indices in pre-order, depth-first.
    pub fn iter_pre(&self) -> impl Iterator<Item = usize> + '_ {
        self.tree.iter_pre()
    }

    /// Returns the matched tokens in the order they appear in the tree, which is the input order.
    /// The end marker isn't included.
    pub fn leaves(&self) -> Vec<&Token> {
        self.iter_pre()
            .filter_map(|i| self.get(i).token.as_ref())
            .filter(|t| !t.is_end())
            .collect()
    }

    pub fn num_epsilons(&self) -> usize {
        self.iter_pre().filter(|i| self.get(*i).is_epsilon()).count()
    }

    /// Builds the nested, serializable version of the tree.
    ///
    /// Serializing and dropping a `SerNode` recurse on each level, so very deep trees should be written
    /// with an iterative writer instead.
    pub fn to_serde(&self, symbol_table: Option<&SymbolTable>) -> SerNode {
        let mut nodes: Vec<Option<SerNode>> = vec![None; self.len()];
        // post-order: children are always complete before their parent
        let order = self.iter_pre().collect::<Vec<_>>();
        for &index in order.iter().rev() {
            let node = self.get(index);
            let children = self.children(index).iter().filter_map(|c| nodes[*c].take()).collect();
            nodes[index] = Some(SerNode { name: node.ser_name(symbol_table), token: node.ser_token(), children });
        }
        nodes[self.root()].take().unwrap_or(SerNode { name: String::new(), token: None, children: vec![] })
    }
}

// ---------------------------------------------------------------------------------------------

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", content = "symbol", rename_all = "lowercase")]
pub enum SyntaxErrorKind {
    /// The expected terminal or nonterminal couldn't be matched.
    Missing(String),
    /// The token was discarded during the recovery.
    Illegal(String),
}

/// Syntax error, reported on the line of the last token read from the stream.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct SyntaxError {
    pub line: Line,
    #[serde(flatten)]
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub fn missing<T: Into<String>>(line: Line, name: T) -> Self {
        SyntaxError { line, kind: SyntaxErrorKind::Missing(name.into()) }
    }

    pub fn illegal<T: Into<String>>(line: Line, name: T) -> Self {
        SyntaxError { line, kind: SyntaxErrorKind::Illegal(name.into()) }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            SyntaxErrorKind::Missing(s) => write!(f, "#{} : syntax error, missing {s}", self.line),
            SyntaxErrorKind::Illegal(s) => write!(f, "#{} : syntax error, illegal {s}", self.line),
        }
    }
}

/// Result of a parse: there's always a tree, even when there are errors.
#[derive(Clone, PartialEq, Debug)]
pub struct ParseOutcome {
    pub tree: ParseTree,
    pub errors: Vec<SyntaxError>,
    /// number of tokens read from the stream, including the end of stream
    pub num_tokens: usize,
}

impl ParseOutcome {
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }
}

// ---------------------------------------------------------------------------------------------

/// Current lookahead of the token stream. The stream is never rewound.
struct Cursor<'a, I> {
    table: &'a ParsingTable,
    stream: I,
    token: Token,
    sym: Symbol,
    line: Line,
    num_tokens: usize,
}

impl<'a, I: Iterator<Item=ParserToken>> Cursor<'a, I> {
    fn new(table: &'a ParsingTable, stream: I) -> Self {
        let mut cursor = Cursor { table, stream, token: Token::End, sym: Symbol::End, line: 1, num_tokens: 0 };
        cursor.advance();
        cursor
    }

    fn advance(&mut self) {
        if self.num_tokens > 0 && self.token.is_end() {
            return;
        }
        self.num_tokens += 1;
        match self.stream.next() {
            Some((token, line)) => {
                self.sym = self.table.lookahead(&token);
                self.token = token;
                self.line = line;
            }
            None => {
                // the line of the last token is kept for the diagnostics
                self.sym = Symbol::End;
                self.token = Token::End;
            }
        }
    }
}

// ---------------------------------------------------------------------------------------------

/// Table-driven LL(1) parser that builds a concrete parse tree.
///
/// The parser never stops on a syntax error: it reports it and recovers in panic mode, either by
/// skipping the expected symbol or by discarding input tokens until the parsing can resume.
#[derive(Debug)]
pub struct Parser<'a> {
    table: &'a ParsingTable,
    log: BufLog,
}

impl<'a> Parser<'a> {
    pub fn new(table: &'a ParsingTable) -> Self {
        Parser { table, log: BufLog::new() }
    }

    pub fn get_symbol_table(&self) -> Option<&SymbolTable> {
        Some(&self.table.symbol_table)
    }

    /// Parses the entire `stream` and returns the parse tree with the syntax errors.
    ///
    /// The symbol stack and the node stack are always pushed and popped together; the node
    /// at the top of the node stack is the tree node of the symbol at the top of the symbol stack.
    pub fn parse_stream<I>(&mut self, stream: I) -> ParseOutcome
        where I: Iterator<Item=ParserToken>,
    {
        const VERBOSE: bool = false;
        let table = self.table;
        let sym_table = Some(&table.symbol_table);
        let start = Symbol::NT(table.start);
        let mut tree = VecTree::<ParseNode>::new();
        let root = tree.add_root(ParseNode::new(start));
        let end_node = tree.add(None, ParseNode::new(Symbol::End));
        let mut stack = vec![Symbol::End, start];
        let mut stack_node = vec![end_node, root];
        let mut errors = Vec::<SyntaxError>::new();
        let mut cursor = Cursor::new(table, stream);
        while let (Some(stack_sym), Some(node)) = (stack.pop(), stack_node.pop()) {
            if VERBOSE {
                println!("{:-<40}", "");
                println!("input ({}, line {}): {}   stack: [{}]   current: {}",
                         cursor.num_tokens, cursor.line, cursor.token,
                         stack.iter().map(|s| s.to_str(sym_table)).join(" "),
                         stack_sym.to_str(sym_table));
            }
            match stack_sym {
                Symbol::Empty => {
                    tree.add(Some(node), ParseNode::epsilon());
                }
                Symbol::T(_) | Symbol::End => {
                    if stack_sym == cursor.sym {
                        if VERBOSE { println!("- MATCH {}", cursor.token); }
                        tree.get_mut(node).token = Some(cursor.token.clone());
                        cursor.advance();
                    } else {
                        let error = SyntaxError::missing(cursor.line, stack_sym.to_str(sym_table));
                        if VERBOSE { println!("- {error}"); }
                        self.log.add_error(error.to_string());
                        errors.push(error);
                    }
                }
                Symbol::NT(var) => {
                    if let Some(alt_id) = table.get_alt(var, cursor.sym) {
                        let alt = table.get_alternative(alt_id);
                        if VERBOSE { println!("- table[{var}, {}] = {alt_id}: {}", cursor.sym.to_str(sym_table), alt.to_rule_str(var, sym_table)); }
                        if alt.is_sym_empty() {
                            tree.add(Some(node), ParseNode::epsilon());
                        } else {
                            let children = tree.add_iter(Some(node), alt.iter().map(|s| ParseNode::new(*s)));
                            stack.extend(alt.iter().rev());
                            stack_node.extend(children.into_iter().rev());
                        }
                        continue;
                    }
                    // synchronization
                    if !cursor.sym.is_end() && !table.is_in_follow(var, cursor.sym) {
                        while !cursor.sym.is_end() && !table.is_in_first(var, cursor.sym) && !table.is_in_follow(var, cursor.sym) {
                            let error = SyntaxError::illegal(cursor.line, cursor.token.category());
                            if VERBOSE { println!("- {error}"); }
                            self.log.add_error(error.to_string());
                            errors.push(error);
                            cursor.advance();
                        }
                        if table.is_in_first(var, cursor.sym) {
                            self.log.add_note(format!("resynchronized on '{}' while parsing '{}', line {}",
                                                      cursor.token.category(), stack_sym.to_str(sym_table), cursor.line));
                            stack.push(stack_sym);
                            stack_node.push(node);
                            continue;
                        }
                    }
                    let error = SyntaxError::missing(cursor.line, stack_sym.to_str(sym_table));
                    if VERBOSE { println!("- {error}"); }
                    self.log.add_error(error.to_string());
                    errors.push(error);
                    tree.add(Some(node), ParseNode::epsilon());
                }
            }
        }
        tree.attach(root, end_node);
        self.log.add_note(format!("parsing completed: {} token(s) read, {} syntax error(s)", cursor.num_tokens, errors.len()));
        ParseOutcome { tree: ParseTree { tree }, errors, num_tokens: cursor.num_tokens }
    }
}

impl LogReader for Parser<'_> {
    fn get_log(&self) -> &BufLog {
        &self.log
    }

    fn give_log(self) -> BufLog {
        self.log
    }
}
