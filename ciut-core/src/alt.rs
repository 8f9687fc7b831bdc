// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::collections::{HashMap, HashSet};
use std::ops::{Deref, DerefMut};
use crate::parser::Symbol;
use crate::sym_table::SymbolTable;
use crate::{CollectJoin, VarId};

// ---------------------------------------------------------------------------------------------

pub fn alt_to_str(f: &[Symbol], symbol_table: Option<&SymbolTable>) -> String {
    if f.is_empty() {
        "<empty>".to_string()
    } else {
        f.iter().map(|s| s.to_str(symbol_table)).join(" ")
    }
}

pub fn alt_to_rule_str(nt: VarId, f: &[Symbol], symbol_table: Option<&SymbolTable>) -> String {
    format!("{} -> {}", Symbol::NT(nt).to_str(symbol_table), alt_to_str(f, symbol_table))
}

/// Stores a production alternative (or alternative body): `Declaration Declaration-list` or `ε` in
/// `Declaration-list -> Declaration Declaration-list | ε`.
///
/// The [`Alternative`] type behaves like a `Vec<Symbol>` (`Deref` / `DerefMut`). An empty production
/// is the single symbol [`Symbol::Empty`]; an alternative is never an empty vector once it's in a rule set.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Alternative {
    pub v: Vec<Symbol>,
}

impl Alternative {
    pub fn new(v: Vec<Symbol>) -> Self {
        Alternative { v }
    }

    pub fn to_str(&self, symbol_table: Option<&SymbolTable>) -> String {
        alt_to_str(&self.v, symbol_table)
    }

    pub fn to_rule_str(&self, nt: VarId, symbol_table: Option<&SymbolTable>) -> String {
        alt_to_rule_str(nt, &self.v, symbol_table)
    }

    pub fn is_sym_empty(&self) -> bool {
        self.v.len() == 1 && self.v[0] == Symbol::Empty
    }

    /// Calculates FIRST of the alternative from the FIRST sets of its symbols: the terminals
    /// of each symbol up to and including the first one that isn't nullable, plus `Symbol::Empty`
    /// if all of them are nullable.
    ///
    /// `first` must have an entry for each symbol of the alternative.
    pub fn calc_alt_first(&self, first: &HashMap<Symbol, HashSet<Symbol>>) -> HashSet<Symbol> {
        let mut new = HashSet::<Symbol>::new();
        let mut trail = true;
        for sym_i in &self.v {
            let first_i = &first[sym_i];
            new.extend(first_i.iter().filter(|s| *s != &Symbol::Empty));
            if !first_i.contains(&Symbol::Empty) {
                trail = false;
                break;
            }
        }
        if trail {
            new.insert(Symbol::Empty);
        }
        new
    }
}

impl Deref for Alternative {
    type Target = Vec<Symbol>;

    fn deref(&self) -> &Self::Target {
        &self.v
    }
}

impl DerefMut for Alternative {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.v
    }
}

// ---------------------------------------------------------------------------------------------
