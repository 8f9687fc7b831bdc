// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! LL(1) parser for the Ciut language.
//!
//! The grammar is compiled into a parsing table once ([`ciut::ciut_table`]); the table drives
//! the parser of [`ciut_core`], which pulls tokens from the scanner and builds a concrete parse tree
//! while collecting the syntax errors. The [`report`] module renders the results.

use thiserror::Error;

pub mod grammar;
pub mod ciut;
pub mod report;

pub use ciut_core::{AltId, CollectJoin, TokenId, VarId};

// ---------------------------------------------------------------------------------------------

/// Error that prevents the creation of a parsing table. The details are in the rule set's log.
#[derive(Error, Clone, PartialEq, Debug)]
pub enum BuildError {
    #[error("the grammar has no production rule")]
    EmptyGrammar,
    #[error("the grammar has no terminal")]
    NoTerminal,
    #[error("start nonterminal not defined")]
    NoStart,
    #[error("unknown symbol '{symbol}' in a production of '{rule}'")]
    UnknownSymbol { rule: String, symbol: String },
    #[error("symbol '{0}' is defined more than once")]
    DuplicateSymbol(String),
    #[error("nonterminal '{0}' has no alternative")]
    NoAlternative(String),
    #[error("the grammar is not LL(1), {} conflict(s): {}", .0.len(), .0.join("; "))]
    Conflict(Vec<String>),
}
