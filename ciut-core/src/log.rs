// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::fmt::{Debug, Display, Formatter};
use serde::Serialize;

/// Common log functionalities for a message consumer/status verifier
pub trait LogStatus: Debug {
    fn num_notes(&self) -> usize;
    fn num_warnings(&self) -> usize;
    fn num_errors(&self) -> usize;
    #[inline]
    fn has_no_errors(&self) -> bool {
        self.num_errors() == 0
    }
    #[inline]
    fn has_no_warnings(&self) -> bool {
        self.num_warnings() == 0
    }

    fn get_messages(&self) -> impl Iterator<Item = &LogMsg>;

    fn get_messages_str(&self) -> String {
        self.get_messages().map(|m| format!("- {m}")).collect::<Vec<_>>().join("\n")
    }

    fn get_notes(&self) -> impl Iterator<Item = &String> {
        self.get_messages().filter_map(|m| if let LogMsg::Note(s) = m { Some(s) } else { None })
    }

    fn get_warnings(&self) -> impl Iterator<Item = &String> {
        self.get_messages().filter_map(|m| if let LogMsg::Warning(s) = m { Some(s) } else { None })
    }

    fn get_errors(&self) -> impl Iterator<Item = &String> {
        self.get_messages().filter_map(|m| if let LogMsg::Error(s) = m { Some(s) } else { None })
    }
}

/// Common log functionalities for a message producer
pub trait Logger: Debug {
    fn add_note<T: Into<String>>(&mut self, msg: T);
    fn add_warning<T: Into<String>>(&mut self, msg: T);
    fn add_error<T: Into<String>>(&mut self, msg: T);
}

// ---------------------------------------------------------------------------------------------

/// Log message. Only [BufLog] stores them; [PrintLog] writes them out immediately.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "lowercase")]
pub enum LogMsg { Note(String), Warning(String), Error(String) }

impl Display for LogMsg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogMsg::Note(s) =>    write!(f, "Note   : {s}"),
            LogMsg::Warning(s) => write!(f, "Warning: {s}"),
            LogMsg::Error(s) =>   write!(f, "ERROR  : {s}"),
        }
    }
}

// ---------------------------------------------------------------------------------------------

/// Log system that stores the messages
#[derive(Clone, PartialEq, Debug)]
pub struct BufLog {
    messages: Vec<LogMsg>,
    num_notes: usize,
    num_warnings: usize,
    num_errors: usize
}

impl BufLog {
    pub fn new() -> Self {
        BufLog { messages: Vec::new(), num_notes: 0, num_warnings: 0, num_errors: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Clears all messages: notes, warnings, and errors.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.num_notes = 0;
        self.num_warnings = 0;
        self.num_errors = 0;
    }

    /// Extends the messages with another log's messages.
    pub fn extend(&mut self, other: BufLog) {
        self.num_notes += other.num_notes;
        self.num_warnings += other.num_warnings;
        self.num_errors += other.num_errors;
        self.messages.extend(other.messages)
    }

    /// Sends all the stored messages to another logger, in their original order.
    pub fn forward_to<L: Logger>(&self, logger: &mut L) {
        for m in &self.messages {
            match m {
                LogMsg::Note(s) => logger.add_note(s.as_str()),
                LogMsg::Warning(s) => logger.add_warning(s.as_str()),
                LogMsg::Error(s) => logger.add_error(s.as_str()),
            }
        }
    }
}

impl LogStatus for BufLog {
    fn num_notes(&self) -> usize {
        self.num_notes
    }

    fn num_warnings(&self) -> usize {
        self.num_warnings
    }

    fn num_errors(&self) -> usize {
        self.num_errors
    }

    fn get_messages(&self) -> impl Iterator<Item = &LogMsg> {
        self.messages.iter()
    }
}

impl Logger for BufLog {
    fn add_note<T: Into<String>>(&mut self, msg: T) {
        self.messages.push(LogMsg::Note(msg.into()));
        self.num_notes += 1;
    }

    fn add_warning<T: Into<String>>(&mut self, msg: T) {
        self.messages.push(LogMsg::Warning(msg.into()));
        self.num_warnings += 1;
    }

    fn add_error<T: Into<String>>(&mut self, msg: T) {
        self.messages.push(LogMsg::Error(msg.into()));
        self.num_errors += 1;
    }
}

impl Default for BufLog {
    fn default() -> Self {
        BufLog::new()
    }
}

impl Display for BufLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_messages_str())
    }
}

// ---------------------------------------------------------------------------------------------

/// Basic log system that prints out messages to stderr without storing them
#[derive(Clone, Debug, Default)]
pub struct PrintLog {
    num_notes: usize,
    num_warnings: usize,
    num_errors: usize
}

impl PrintLog {
    pub fn new() -> PrintLog {
        PrintLog { num_notes: 0, num_warnings: 0, num_errors: 0 }
    }

    pub fn num_messages(&self) -> usize {
        self.num_notes + self.num_warnings + self.num_errors
    }
}

impl Logger for PrintLog {
    fn add_note<T: Into<String>>(&mut self, msg: T) {
        self.num_notes += 1;
        eprintln!("NOTE:    {}", msg.into());
    }

    fn add_warning<T: Into<String>>(&mut self, msg: T) {
        self.num_warnings += 1;
        eprintln!("WARNING: {}", msg.into());
    }

    fn add_error<T: Into<String>>(&mut self, msg: T) {
        self.num_errors += 1;
        eprintln!("ERROR:   {}", msg.into());
    }
}

// ---------------------------------------------------------------------------------------------
// blanket implementation: LogReader -> LogStatus

/// Gives access to the log of an object that owns a [BufLog], like a rule set or a parser.
pub trait LogReader {
    fn get_log(&self) -> &BufLog;

    fn give_log(self) -> BufLog;
}

impl<T: LogReader + Debug> LogStatus for T {
    fn num_notes(&self) -> usize {
        self.get_log().num_notes()
    }

    fn num_warnings(&self) -> usize {
        self.get_log().num_warnings()
    }

    fn num_errors(&self) -> usize {
        self.get_log().num_errors()
    }

    fn get_messages(&self) -> impl Iterator<Item=&LogMsg> {
        self.get_log().get_messages()
    }
}

// ---------------------------------------------------------------------------------------------
