//! Portfolio terminal: a tiny shell over the portfolio content

pub mod commands;
pub mod session;

pub use commands::{help_text, vocabulary, CommandTable};
pub use session::{EntryKind, HistoryEntry, TerminalKey, TerminalSession, DOUBLE_TAB_WINDOW};
