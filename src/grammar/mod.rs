// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.


use std::collections::{HashMap, HashSet};
use ciut_core::alt::Alternative;
use ciut_core::log::{BufLog, LogReader, Logger};
use ciut_core::parser::{ParsingTable, Symbol};
use ciut_core::sym_table::SymbolTable;
use crate::{AltId, BuildError, CollectJoin, TokenId, VarId};

/// Name of the empty-production marker in the rule tables given to [`ProdRuleSet::from_rules`].
pub const EPSILON: &str = "EPSILON";

pub type ProdRule = Vec<Alternative>;

pub fn prule_to_str(prule: &ProdRule, symbol_table: Option<&SymbolTable>) -> String {
    prule.iter().map(|alt| alt.to_str(symbol_table)).join(" | ")
}

pub fn prule_to_rule_str(nt: VarId, prule: &ProdRule, symbol_table: Option<&SymbolTable>) -> String {
    format!("{} -> {}", Symbol::NT(nt).to_str(symbol_table), prule_to_str(prule, symbol_table))
}

/// Set of production rules of an LL(1) grammar, one rule per nonterminal, where each rule
/// is a list of alternatives.
///
/// ```text
/// Declaration-list -> Declaration Declaration-list | ε
/// ```
///
/// The rule set computes the FIRST and FOLLOW sets of the grammar, then the LL(1) parsing table.
#[derive(Clone, Debug)]
pub struct ProdRuleSet {
    prules: Vec<ProdRule>,
    num_nt: usize,
    num_t: usize,
    symbol_table: SymbolTable,
    start: Option<VarId>,
    log: BufLog,
}

impl ProdRuleSet {
    pub fn new() -> Self {
        ProdRuleSet { prules: Vec::new(), num_nt: 0, num_t: 0, symbol_table: SymbolTable::new(), start: None, log: BufLog::new() }
    }

    /// Builds a rule set from the names of the terminals and the rules. The first rule
    /// is the start symbol.
    ///
    /// Each rule is given as the name of its nonterminal and the list of its alternatives,
    /// an alternative being a list of terminal and nonterminal names. [`EPSILON`] (or an empty list)
    /// stands for the empty production.
    pub fn from_rules(terminals: &[&str], rules: &[(&str, &[&[&str]])]) -> Result<Self, BuildError> {
        if rules.is_empty() {
            return Err(BuildError::EmptyGrammar);
        }
        let mut prs = ProdRuleSet::new();
        for &name in terminals {
            if prs.symbol_table.find_terminal(name).is_some() {
                return Err(BuildError::DuplicateSymbol(name.to_string()));
            }
            prs.symbol_table.add_terminal(name);
        }
        for &(name, _) in rules {
            if prs.symbol_table.find_symbol(name).is_some() {
                return Err(BuildError::DuplicateSymbol(name.to_string()));
            }
            prs.symbol_table.add_nonterminal(name);
        }
        for &(name, alts) in rules {
            if alts.is_empty() {
                return Err(BuildError::NoAlternative(name.to_string()));
            }
            let mut prule = ProdRule::new();
            for alt in alts {
                let mut symbols = Vec::<Symbol>::new();
                for &sym_name in alt.iter().filter(|&&s| s != EPSILON) {
                    let sym = prs.symbol_table.find_symbol(sym_name)
                        .ok_or_else(|| BuildError::UnknownSymbol { rule: name.to_string(), symbol: sym_name.to_string() })?;
                    symbols.push(sym);
                }
                if symbols.is_empty() {
                    symbols.push(Symbol::Empty);
                }
                prule.push(Alternative::new(symbols));
            }
            prs.prules.push(prule);
        }
        prs.num_t = prs.symbol_table.get_num_t();
        prs.num_nt = prs.symbol_table.get_num_nt();
        prs.start = Some(0);
        Ok(prs)
    }

    /// Returns the starting nonterminal.
    pub fn get_start(&self) -> Option<VarId> {
        self.start
    }

    /// Sets the starting nonterminal.
    pub fn set_start(&mut self, start: VarId) {
        self.start = Some(start);
    }

    pub fn get_num_nt(&self) -> usize {
        self.num_nt
    }

    pub fn get_num_t(&self) -> usize {
        self.num_t
    }

    pub fn get_symbol_table(&self) -> Option<&SymbolTable> {
        Some(&self.symbol_table)
    }

    pub fn get_prules_iter(&self) -> impl Iterator<Item=(VarId, &ProdRule)> {
        self.prules.iter().enumerate().map(|(id, p)| (id as VarId, p))
    }

    pub fn get_alts(&self) -> impl Iterator<Item=(VarId, &Alternative)> {
        self.prules.iter().enumerate()
            .flat_map(|(v, p)| p.iter().map(move |alt| (v as VarId, alt)))
    }

    /// Returns one line per rule: `A -> α | β`.
    pub fn to_str(&self) -> Vec<String> {
        self.get_prules_iter().map(|(v, p)| prule_to_rule_str(v, p, self.get_symbol_table())).collect()
    }

    /// Gets all the symbols that can be reached from the start symbol.
    fn reachable_symbols(&self, start: VarId) -> HashSet<Symbol> {
        let mut symbols = HashSet::<Symbol>::new();
        let mut stack = vec![Symbol::NT(start)];
        while let Some(sym) = stack.pop() {
            if symbols.insert(sym) {
                if let Symbol::NT(v) = sym {
                    stack.extend(self.prules[v as usize].iter().flat_map(|alt| alt.iter()));
                }
            }
        }
        symbols
    }

    /// Calculates FIRST for every symbol of the grammar. `Symbol::Empty` in the FIRST set of a
    /// nonterminal means the nonterminal is nullable.
    pub fn calc_first(&mut self) -> HashMap<Symbol, HashSet<Symbol>> {
        const VERBOSE: bool = false;
        let Some(start) = self.start else {
            self.log.add_error("calc_first: start NT symbol not defined");
            return HashMap::new();
        };
        if self.num_nt == 0 {
            self.log.add_error("calc_first: no nonterminal in grammar");
            return HashMap::new();
        }
        let symbols = self.reachable_symbols(start);
        let unused_nt = (0..self.num_nt as VarId)
            .filter(|v| !symbols.contains(&Symbol::NT(*v)))
            .map(|v| Symbol::NT(v).to_str(self.get_symbol_table()))
            .to_vec();
        if !unused_nt.is_empty() {
            self.log.add_warning(format!("calc_first: unused nonterminals: {}", unused_nt.join(", ")));
        }
        let unused_t = (0..self.num_t as TokenId)
            .filter(|t| !symbols.contains(&Symbol::T(*t)))
            .map(|t| format!("'{}'", Symbol::T(t).to_str(self.get_symbol_table())))
            .to_vec();
        if !unused_t.is_empty() {
            self.log.add_warning(format!("calc_first: unused terminals: {}", unused_t.join(", ")));
        }

        let mut first = HashMap::<Symbol, HashSet<Symbol>>::new();
        first.insert(Symbol::Empty, HashSet::from([Symbol::Empty]));
        for t in 0..self.num_t as TokenId {
            first.insert(Symbol::T(t), HashSet::from([Symbol::T(t)]));
        }
        for v in 0..self.num_nt as VarId {
            first.insert(Symbol::NT(v), HashSet::new());
        }
        let mut change = true;
        while change {
            change = false;
            for (var, prule) in self.prules.iter().enumerate() {
                let symbol = Symbol::NT(var as VarId);
                if VERBOSE { println!("- {}", prule_to_rule_str(var as VarId, prule, self.get_symbol_table())); }
                let num_items = first[&symbol].len();
                for alt in prule {
                    let new = alt.calc_alt_first(&first);
                    if let Some(set) = first.get_mut(&symbol) {
                        set.extend(new);
                    }
                }
                if VERBOSE && first[&symbol].len() > num_items {
                    println!("    first[{}] -> {}", symbol.to_str(self.get_symbol_table()),
                             first[&symbol].iter().map(|s| s.to_str(self.get_symbol_table())).join(", "));
                }
                change |= first[&symbol].len() > num_items;
            }
            if VERBOSE && change { println!("---------------------------- again"); }
        }
        if self.num_t == 0 {
            self.log.add_error("calc_first: no terminal in grammar");
        }
        first
    }

    /// Calculates FOLLOW for every nonterminal of the grammar, using the result of [`calc_first`](ProdRuleSet::calc_first).
    /// `Symbol::End` in the FOLLOW set means the end of stream can follow the nonterminal.
    pub fn calc_follow(&self, first: &HashMap<Symbol, HashSet<Symbol>>) -> HashMap<Symbol, HashSet<Symbol>> {
        const VERBOSE: bool = false;
        let Some(start) = self.start else {
            return HashMap::new();
        };
        if first.is_empty() {
            return HashMap::new();
        }
        let mut follow = (0..self.num_nt as VarId)
            .map(|v| (Symbol::NT(v), HashSet::<Symbol>::new()))
            .collect::<HashMap<_, _>>();
        if let Some(set) = follow.get_mut(&Symbol::NT(start)) {
            set.insert(Symbol::End);
        }
        let mut change = true;
        while change {
            change = false;
            for (var, prule) in self.prules.iter().enumerate() {
                let symbol = Symbol::NT(var as VarId);
                for alt in prule {
                    if VERBOSE { println!("- {}", alt.to_rule_str(var as VarId, self.get_symbol_table())); }
                    // trail: what can follow the current symbol, scanning the alternative backward
                    let mut trail = follow[&symbol].clone();
                    for sym_i in alt.iter().rev() {
                        match sym_i {
                            Symbol::NT(_) => {
                                let Some(follow_i) = follow.get_mut(sym_i) else { continue };
                                let num_items = follow_i.len();
                                follow_i.extend(&trail);
                                if VERBOSE && follow_i.len() > num_items {
                                    println!("    follow[{}] -> {}", sym_i.to_str(self.get_symbol_table()),
                                             follow_i.iter().map(|s| s.to_str(self.get_symbol_table())).join(", "));
                                }
                                change |= follow_i.len() > num_items;
                                if first[sym_i].contains(&Symbol::Empty) {
                                    trail.extend(first[sym_i].iter().filter(|s| *s != &Symbol::Empty));
                                } else {
                                    trail.clear();
                                    trail.extend(&first[sym_i]);
                                }
                            }
                            Symbol::Empty => {}
                            _ => {
                                trail.clear();
                                trail.insert(*sym_i);
                            }
                        }
                    }
                }
            }
            if VERBOSE && change { println!("---------------------------- again"); }
        }
        follow
    }

    /// Calculates the LL(1) parsing table. A cell that would predict more than one alternative
    /// is a conflict: all the conflicts are logged as errors and the table is rejected.
    pub fn calc_table(&mut self, first: &HashMap<Symbol, HashSet<Symbol>>, follow: &HashMap<Symbol, HashSet<Symbol>>) -> Result<ParsingTable, BuildError> {
        fn add_table(table: &mut [Vec<AltId>], num_t: usize, nt_id: VarId, t_id: usize, a_id: AltId) {
            let cell = &mut table[nt_id as usize * num_t + t_id];
            // the same alternative can be reached through FIRST and FOLLOW
            if !cell.contains(&a_id) {
                cell.push(a_id);
            }
        }
        const VERBOSE: bool = false;
        let Some(start) = self.start else {
            self.log.add_error("calc_table: start NT symbol not defined");
            return Err(BuildError::NoStart);
        };
        if self.num_nt == 0 || first.is_empty() {
            return Err(BuildError::EmptyGrammar);
        }
        let alts = self.get_alts().map(|(v, a)| (v, a.clone())).to_vec();
        let error_entry = alts.len() as AltId;
        let num_nt = self.num_nt;
        let num_t = self.num_t + 1;
        let end = num_t - 1; // index of end symbol
        let mut table: Vec<Vec<AltId>> = vec![vec![]; num_nt * num_t];
        for (a_id, (nt_id, alt)) in alts.iter().enumerate() {
            let a_id = a_id as AltId;
            let alt_first = alt.calc_alt_first(first);
            if VERBOSE { println!("- {a_id}: {}  => {}", alt.to_rule_str(*nt_id, self.get_symbol_table()),
                                  alt_first.iter().map(|s| s.to_str(self.get_symbol_table())).join(" ")); }
            for s in alt_first {
                match s {
                    Symbol::Empty => {
                        for s in &follow[&Symbol::NT(*nt_id)] {
                            match s {
                                Symbol::T(t_id) => add_table(&mut table, num_t, *nt_id, *t_id as usize, a_id),
                                Symbol::End     => add_table(&mut table, num_t, *nt_id, end, a_id),
                                _ => {}
                            }
                        }
                    }
                    Symbol::T(t_id) => add_table(&mut table, num_t, *nt_id, t_id as usize, a_id),
                    Symbol::NT(_) | Symbol::End => {}
                }
            }
        }
        let mut conflicts = Vec::<String>::new();
        let mut final_table = Vec::<AltId>::with_capacity(num_nt * num_t);
        for nt_id in 0..num_nt {
            for t_id in 0..num_t {
                let cell = &mut table[nt_id * num_t + t_id];
                final_table.push(match cell.len() {
                    0 => error_entry,
                    1 => cell[0],
                    _ => {
                        cell.sort();
                        let msg = format!("conflict for NT '{}', T '{}': {}",
                                          Symbol::NT(nt_id as VarId).to_str(self.get_symbol_table()),
                                          if t_id < end { Symbol::T(t_id as TokenId).to_str(self.get_symbol_table()) } else { "$".to_string() },
                                          cell.iter().map(|a_id| format!("<{}>", alts[*a_id as usize].1.to_str(self.get_symbol_table()))).join(" or "));
                        self.log.add_error(format!("calc_table: {msg}"));
                        conflicts.push(msg);
                        cell[0]
                    }
                });
            }
        }
        self.check_nullable_overlap(first, follow);
        if !conflicts.is_empty() {
            return Err(BuildError::Conflict(conflicts));
        }
        let nt_set = |sets: &HashMap<Symbol, HashSet<Symbol>>| (0..num_nt as VarId)
            .map(|v| sets.get(&Symbol::NT(v)).cloned().unwrap_or_default())
            .to_vec();
        Ok(ParsingTable {
            num_nt,
            num_t,
            alts,
            table: final_table,
            first: nt_set(first),
            follow: nt_set(follow),
            symbol_table: self.symbol_table.clone(),
            start,
        })
    }

    /// Flags the nullable nonterminals whose FIRST and FOLLOW sets share terminals. The recovery
    /// gives priority to FIRST for those terminals, which is worth reviewing.
    fn check_nullable_overlap(&mut self, first: &HashMap<Symbol, HashSet<Symbol>>, follow: &HashMap<Symbol, HashSet<Symbol>>) {
        for v in 0..self.num_nt as VarId {
            let sym = Symbol::NT(v);
            let (Some(first_v), Some(follow_v)) = (first.get(&sym), follow.get(&sym)) else { continue };
            if first_v.contains(&Symbol::Empty) {
                let mut overlap = first_v.intersection(follow_v).cloned().to_vec();
                if !overlap.is_empty() {
                    overlap.sort();
                    self.log.add_warning(format!("calc_table: nullable NT '{}' has terminals in both FIRST and FOLLOW: {}",
                                                 sym.to_str(self.get_symbol_table()),
                                                 overlap.iter().map(|s| format!("'{}'", s.to_str(self.get_symbol_table()))).join(", ")));
                }
            }
        }
    }

    /// Calculates FIRST, FOLLOW, and the LL(1) parsing table.
    pub fn make_parsing_table(&mut self) -> Result<ParsingTable, BuildError> {
        self.log.add_note("calculating parsing table...");
        if self.start.is_none() {
            self.log.add_error("make_parsing_table: start NT symbol not defined");
            return Err(BuildError::NoStart);
        }
        if self.num_nt == 0 {
            self.log.add_error("make_parsing_table: no nonterminal in grammar");
            return Err(BuildError::EmptyGrammar);
        }
        if self.num_t == 0 {
            self.log.add_error("make_parsing_table: no terminal in grammar");
            return Err(BuildError::NoTerminal);
        }
        let first = self.calc_first();
        let follow = self.calc_follow(&first);
        self.calc_table(&first, &follow)
    }
}

impl Default for ProdRuleSet {
    fn default() -> Self {
        ProdRuleSet::new()
    }
}

impl LogReader for ProdRuleSet {
    fn get_log(&self) -> &BufLog {
        &self.log
    }

    fn give_log(self) -> BufLog {
        self.log
    }
}

/// Returns the content of the parsing table, one line per nonterminal: the lookahead
/// symbols and the alternative they predict.
pub fn table_to_str(table: &ParsingTable) -> Vec<String> {
    let st = Some(&table.symbol_table);
    let error_entry = table.error_entry();
    (0..table.num_nt).map(|nt_id| {
        let entries = (0..table.num_t)
            .filter_map(|t_id| {
                let alt_id = table.table[nt_id * table.num_t + t_id];
                if alt_id < error_entry {
                    let t = if t_id < table.num_t - 1 { Symbol::T(t_id as TokenId) } else { Symbol::End };
                    Some(format!("{} => {}", t.to_str(st), table.get_alternative(alt_id).to_str(st)))
                } else {
                    None
                }
            })
            .join(", ");
        format!("{}: {entries}", Symbol::NT(nt_id as VarId).to_str(st))
    }).collect()
}
