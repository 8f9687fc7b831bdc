// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::fmt::{Display, Formatter};
use serde::Serialize;


// ---------------------------------------------------------------------------------------------

/// Reserved words, in the order they're listed in the symbol table.
pub const KEYWORDS: [&str; 8] = ["break", "else", "if", "int", "repeat", "return", "until", "void"];
/// Two-character symbols, which take precedence over the single ones.
const MULTI_SYMBOLS: [&str; 6] = ["==", "<=", ">=", "!=", "&&", "||"];
const SINGLE_SYMBOLS: [char; 17] = [';', ':', '(', ')', '{', '}', '[', ']', '+', '-', '*', '/', '=', '<', '>', '!', ','];
/// Symbols that are only valid when doubled, but that are still emitted alone.
const NOT_VALID_ALONE: [char; 2] = ['&', '|'];
const INVALID_CHARS: [char; 6] = ['@', '#', '$', '%', '^', '~'];
const WHITESPACES: [char; 6] = [' ', '\t', '\r', '\x0b', '\x0c', '\n'];
/// Characters that may directly follow an identifier.
const ALLOWED_AFTER_ID: [char; 18] = ['(', ')', '{', '}', '[', ']', ';', ',', ':', '+', '-', '*', '/', '=', '<', '>', '&', '|'];
/// Number of characters of an unclosed comment that are shown in the error.
const COMMENT_SNIPPET_LEN: usize = 7;

/// Line number, starting at 1
pub type Line = usize;

/// Token produced by the [Scanner]. `End` is the end-of-input sentinel.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub enum Token {
    Id(String),
    Num(String),
    Keyword(String),
    Symbol(String),
    End,
}

impl Token {
    /// Token class: "ID", "NUM", "KEYWORD", "SYMBOL", or "$".
    pub fn class(&self) -> &'static str {
        match self {
            Token::Id(_) => "ID",
            Token::Num(_) => "NUM",
            Token::Keyword(_) => "KEYWORD",
            Token::Symbol(_) => "SYMBOL",
            Token::End => "$",
        }
    }

    pub fn lexeme(&self) -> &str {
        match self {
            Token::Id(s) | Token::Num(s) | Token::Keyword(s) | Token::Symbol(s) => s,
            Token::End => "$",
        }
    }

    /// Lookahead category used by the parser: the class for identifiers and numbers,
    /// the lexeme for keywords and symbols, which are their own terminals.
    pub fn category(&self) -> &str {
        match self {
            Token::Id(_) => "ID",
            Token::Num(_) => "NUM",
            Token::Keyword(s) | Token::Symbol(s) => s,
            Token::End => "$",
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Token::End)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::End => write!(f, "$"),
            _ => write!(f, "({}, {})", self.class(), self.lexeme()),
        }
    }
}

/// Token and the line where it starts.
pub type ParserToken = (Token, Line);

// ---------------------------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum LexErrorKind {
    #[serde(rename = "Invalid input")]
    InvalidInput,
    #[serde(rename = "Invalid number")]
    InvalidNumber,
    #[serde(rename = "Unclosed comment")]
    UnclosedComment,
    #[serde(rename = "Unmatched comment")]
    UnmatchedComment,
}

impl Display for LexErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            LexErrorKind::InvalidInput => "Invalid input",
            LexErrorKind::InvalidNumber => "Invalid number",
            LexErrorKind::UnclosedComment => "Unclosed comment",
            LexErrorKind::UnmatchedComment => "Unmatched comment",
        })
    }
}

/// Lexical error: the offending text and the line where it starts.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct LexicalError {
    pub line: Line,
    pub text: String,
    pub kind: LexErrorKind,
}

impl LexicalError {
    pub fn new<T: Into<String>>(line: Line, text: T, kind: LexErrorKind) -> Self {
        LexicalError { line, text: text.into(), kind }
    }
}

impl Display for LexicalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.text, self.kind)
    }
}

// ---------------------------------------------------------------------------------------------

/// Everything the scanner has recorded while producing tokens.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct ScanRecord {
    /// Emitted tokens, in order
    pub tokens: Vec<ParserToken>,
    pub errors: Vec<LexicalError>,
    /// Identifiers, in order of first appearance
    pub identifiers: Vec<String>,
}

/// Token source: scans the text on demand, one token at a time.
///
/// Lexical errors don't interrupt the scanning; they're recorded and the scanner moves on
/// to the next token. The emitted tokens and the identifiers are recorded too.
#[derive(Clone, Debug)]
pub struct Scanner {
    input: Vec<char>,
    pos: usize,
    line: Line,
    record: ScanRecord,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        Scanner { input: text.chars().collect(), pos: 0, line: 1, record: ScanRecord::default() }
    }

    pub fn get_line(&self) -> Line {
        self.line
    }

    pub fn get_tokens(&self) -> &[ParserToken] {
        &self.record.tokens
    }

    pub fn get_errors(&self) -> &[LexicalError] {
        &self.record.errors
    }

    pub fn get_identifiers(&self) -> &[String] {
        &self.record.identifiers
    }

    pub fn finish(self) -> ScanRecord {
        self.record
    }

    /// Iterator that pulls the tokens from the scanner. It ends at the end of the input.
    pub fn tokens(&mut self) -> ScanIter<'_> {
        ScanIter { scanner: self }
    }

    /// Scans the next token, or returns `None` at the end of the input.
    pub fn next_token(&mut self) -> Option<ParserToken> {
        loop {
            self.skip_blanks_and_comments();
            let line = self.line;
            let c = self.peek(0)?;
            if c == '/' && self.peek(1) == Some('/') {
                self.advance();
                self.advance();
                self.add_error(line, "/", LexErrorKind::InvalidInput);
                self.add_error(line, "/", LexErrorKind::InvalidInput);
                continue;
            }
            if c.is_ascii_digit() {
                let num = self.take_while(|c| c.is_ascii_digit());
                match self.peek(0) {
                    Some(next) if next.is_ascii_alphabetic() => {
                        self.advance();
                        self.add_error(line, format!("{num}{next}"), LexErrorKind::InvalidNumber);
                        continue;
                    }
                    _ => return Some(self.emit(Token::Num(num), line)),
                }
            }
            if c.is_ascii_alphabetic() {
                let word = self.take_while(|c| c.is_ascii_alphanumeric());
                match self.peek(0) {
                    Some(next) if !WHITESPACES.contains(&next) && !ALLOWED_AFTER_ID.contains(&next) => {
                        self.advance();
                        self.add_error(line, format!("{word}{next}"), LexErrorKind::InvalidInput);
                        continue;
                    }
                    _ => {}
                }
                let token = if KEYWORDS.contains(&word.as_str()) { Token::Keyword(word) } else { Token::Id(word) };
                return Some(self.emit(token, line));
            }
            if let Some(symbol) = MULTI_SYMBOLS.iter().find(|s| self.starts_with(s)) {
                self.pos += symbol.len();
                return Some(self.emit(Token::Symbol(symbol.to_string()), line));
            }
            if SINGLE_SYMBOLS.contains(&c) || NOT_VALID_ALONE.contains(&c) {
                if c == '!' && self.follows_semicolon(line) {
                    self.advance();
                    self.add_error(line, "!", LexErrorKind::InvalidInput);
                    continue;
                }
                if c != ';' && self.peek(1).is_some_and(is_invalid_char) {
                    self.advance();
                    let mut text = c.to_string();
                    text.push_str(&self.take_while(is_invalid_char));
                    self.add_error(line, text, LexErrorKind::InvalidInput);
                    continue;
                }
                self.advance();
                return Some(self.emit(Token::Symbol(c.to_string()), line));
            }
            self.advance();
            self.add_error(line, c.to_string(), LexErrorKind::InvalidInput);
        }
    }

    // -------------------------------------------------------------------------

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek(i) == Some(c))
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, f: F) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek(0) {
            if !f(c) {
                break;
            }
            s.push(c);
            self.advance();
        }
        s
    }

    /// Is the last emitted token a `;` on the same line?
    fn follows_semicolon(&self, line: Line) -> bool {
        matches!(self.record.tokens.last(), Some((Token::Symbol(s), l)) if *l == line && s == ";")
    }

    fn skip_blanks_and_comments(&mut self) {
        while let Some(c) = self.peek(0) {
            if WHITESPACES.contains(&c) {
                self.advance();
            } else if c == '/' && self.peek(1) == Some('*') {
                let start_line = self.line;
                self.pos += 2;
                let mut body = String::new();
                loop {
                    match self.advance() {
                        None => {
                            let mut snippet = body.chars().take(COMMENT_SNIPPET_LEN).collect::<String>();
                            if body.chars().count() > COMMENT_SNIPPET_LEN {
                                snippet.push_str("...");
                            }
                            self.add_error(start_line, format!("/* {snippet}"), LexErrorKind::UnclosedComment);
                            return;
                        }
                        Some('*') if self.peek(0) == Some('/') => {
                            self.advance();
                            break;
                        }
                        Some(c) => body.push(c),
                    }
                }
            } else if c == '*' && self.peek(1) == Some('/') {
                self.pos += 2;
                self.add_error(self.line, "*/", LexErrorKind::UnmatchedComment);
            } else {
                break;
            }
        }
    }

    fn emit(&mut self, token: Token, line: Line) -> ParserToken {
        if let Token::Id(name) = &token {
            if !self.record.identifiers.contains(name) {
                self.record.identifiers.push(name.clone());
            }
        }
        self.record.tokens.push((token.clone(), line));
        (token, line)
    }

    fn add_error<T: Into<String>>(&mut self, line: Line, text: T, kind: LexErrorKind) {
        self.record.errors.push(LexicalError::new(line, text, kind));
    }
}

fn is_invalid_char(c: char) -> bool {
    INVALID_CHARS.contains(&c) || NOT_VALID_ALONE.contains(&c)
}

// ---------------------------------------------------------------------------------------------

/// Pull iterator over the tokens of a [Scanner].
pub struct ScanIter<'a> {
    scanner: &'a mut Scanner,
}

impl Iterator for ScanIter<'_> {
    type Item = ParserToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.scanner.next_token()
    }
}
