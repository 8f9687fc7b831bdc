// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::collections::HashMap;
use crate::parser::Symbol;
use crate::{TokenId, VarId};

/// Stores the names of the terminal and nonterminal symbols of a grammar.
///
/// The name of a terminal is the lookahead category it matches: the literal text of a keyword
/// or a punctuation symbol (`"int"`, `";"`, `"=="`), or the class of variable tokens (`"ID"`, `"NUM"`).
///
/// ```ignore
/// t[0] = ";".to_string();
/// t[22] = "ID".to_string();
/// nt[0] = "Program".to_string();
/// ```
///
/// Names are unique within each category, so they can be looked up in both directions.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct SymbolTable {
    t: Vec<String>,                     // terminal names
    nt: Vec<String>,                    // nonterminal names
    t_ids: HashMap<String, TokenId>,    // terminal name to token ID
    nt_ids: HashMap<String, VarId>,     // nonterminal name to var ID
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    // -------------------------------------------------------------------------

    /// Adds a terminal and returns its ID, or the ID of the existing terminal with the same name.
    pub fn add_terminal<T: Into<String>>(&mut self, name: T) -> TokenId {
        let name = name.into();
        if let Some(token) = self.t_ids.get(&name) {
            return *token;
        }
        let token = self.t.len();
        assert!(token < TokenId::MAX as usize);
        self.t_ids.insert(name.clone(), token as TokenId);
        self.t.push(name);
        token as TokenId
    }

    pub fn get_terminals(&self) -> impl Iterator<Item = &String> {
        self.t.iter()
    }

    pub fn get_num_t(&self) -> usize {
        self.t.len()
    }

    pub fn get_t_name(&self, token: TokenId) -> String {
        if token as usize >= self.t.len() {
            format!("??T({token})")
        } else {
            self.t[token as usize].clone()
        }
    }

    pub fn find_terminal(&self, name: &str) -> Option<TokenId> {
        self.t_ids.get(name).cloned()
    }

    // -------------------------------------------------------------------------

    /// Adds a nonterminal and returns its ID, or the ID of the existing nonterminal with the same name.
    pub fn add_nonterminal<T: Into<String>>(&mut self, name: T) -> VarId {
        let name = name.into();
        if let Some(var) = self.nt_ids.get(&name) {
            return *var;
        }
        let var = self.nt.len();
        assert!(var < VarId::MAX as usize);
        self.nt_ids.insert(name.clone(), var as VarId);
        self.nt.push(name);
        var as VarId
    }

    pub fn get_num_nt(&self) -> usize {
        self.nt.len()
    }

    pub fn get_nt_name(&self, var: VarId) -> String {
        if var as usize >= self.nt.len() { return format!("??NT({var})") }
        self.nt[var as usize].clone()
    }

    pub fn find_nonterminal(&self, name: &str) -> Option<VarId> {
        self.nt_ids.get(name).cloned()
    }

    // -------------------------------------------------------------------------

    /// Gets the symbol's name: the nonterminal or terminal name, or "ε", "$".
    pub fn get_name(&self, symbol: &Symbol) -> String {
        match symbol {
            Symbol::Empty | Symbol::End => symbol.to_string(),
            Symbol::T(token) => self.get_t_name(*token),
            Symbol::NT(var) => self.get_nt_name(*var),
        }
    }

    /// Finds the symbol corresponding to the name, looking first in the terminals.
    pub fn find_symbol(&self, name: &str) -> Option<Symbol> {
        self.find_terminal(name).map(Symbol::T)
            .or_else(|| self.find_nonterminal(name).map(Symbol::NT))
    }
}
