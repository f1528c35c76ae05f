//! Interactive terminal state machine
//!
//! Driven one key at a time. Holds the scrollback, the submitted-command
//! history with its recall cursor, the live input line and the transient
//! completion state.

use std::time::{Duration, Instant};

use super::commands::{self, CommandTable};
use crate::time_source::SharedTimeSource;

/// Two Tab presses closer than this count as a double press.
pub const DOUBLE_TAB_WINDOW: Duration = Duration::from_millis(500);

pub const HOME_DIRECTORY: &str = "~";

pub const ECHO_USAGE: &str = "Usage: echo [text]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Command,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub kind: EntryKind,
    pub text: String,
    /// Working directory when the line was produced
    pub directory: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKey {
    Enter,
    Tab,
    Up,
    Down,
    Escape,
    Backspace,
    Char(char),
}

#[derive(Debug)]
pub struct TerminalSession {
    history: Vec<HistoryEntry>,
    command_history: Vec<String>,
    /// Steps back from the newest command; `None` when not recalling
    history_index: Option<usize>,
    input: String,
    directory: String,
    suggestions: Vec<String>,
    show_suggestions: bool,
    tab_presses: u32,
    last_tab: Option<Instant>,
    fullscreen: bool,

    vocabulary: Vec<String>,
    table: CommandTable,
    clock: SharedTimeSource,
    double_tab_window: Duration,
}

impl TerminalSession {
    pub fn new(table: CommandTable, clock: SharedTimeSource) -> Self {
        Self {
            history: Vec::new(),
            command_history: Vec::new(),
            history_index: None,
            input: String::new(),
            directory: HOME_DIRECTORY.to_string(),
            suggestions: Vec::new(),
            show_suggestions: false,
            tab_presses: 0,
            last_tab: None,
            fullscreen: false,
            vocabulary: commands::vocabulary(),
            table,
            clock,
            double_tab_window: DOUBLE_TAB_WINDOW,
        }
    }

    /// Replace the completion vocabulary.
    pub fn with_vocabulary<I, S>(mut self, vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vocabulary = vocabulary.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_double_tab_window(mut self, window: Duration) -> Self {
        self.double_tab_window = window;
        self
    }

    /// New output blocks, e.g. after the portfolio snapshot changed.
    pub fn set_table(&mut self, table: CommandTable) {
        self.table = table;
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn command_history(&self) -> &[String] {
        &self.command_history
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history_index
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn suggestions_visible(&self) -> bool {
        self.show_suggestions
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn handle_key(&mut self, key: TerminalKey) {
        match key {
            TerminalKey::Enter => self.submit(),
            TerminalKey::Tab => self.complete(),
            TerminalKey::Up => self.history_up(),
            TerminalKey::Down => self.history_down(),
            TerminalKey::Escape => self.dismiss_suggestions(),
            TerminalKey::Backspace => {
                let mut input = self.input.clone();
                input.pop();
                self.set_input(input);
            }
            TerminalKey::Char(c) => {
                let mut input = self.input.clone();
                input.push(c);
                self.set_input(input);
            }
        }
    }

    /// Typed input: suggestions are recomputed but stay hidden.
    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
        self.tab_presses = 0;

        let trimmed = self.input.trim();
        self.suggestions = if trimmed.is_empty() {
            Vec::new()
        } else {
            self.matches(trimmed)
        };
        self.show_suggestions = false;
    }

    fn submit(&mut self) {
        self.tab_presses = 0;
        let line = self.input.trim().to_string();
        if !line.is_empty() {
            self.execute(&line);
            self.command_history.push(line);
            self.input.clear();
            self.history_index = None;
        }
        self.clear_suggestions();
    }

    /// Run one command line and append its output.
    pub fn execute(&mut self, command: &str) {
        let lowered = command.trim().to_lowercase();
        if lowered.is_empty() {
            return;
        }
        self.push(EntryKind::Command, command);

        if lowered == "clear" || lowered == "cls" {
            self.history.clear();
            return;
        }

        if lowered.starts_with("echo") {
            let rest: String = command.chars().skip(5).collect();
            let output = if rest.trim().is_empty() { ECHO_USAGE.to_string() } else { rest };
            self.push(EntryKind::Output, output);
            return;
        }

        let output = match self.table.get(&lowered) {
            Some(block) => block.to_string(),
            None => format!(
                "Command not found: {}. Type 'help' for available commands.",
                lowered
            ),
        };
        self.push(EntryKind::Output, output);
    }

    fn complete(&mut self) {
        let now = self.clock.now();
        let rapid = self
            .last_tab
            .map(|last| self.clock.elapsed_since(last) < self.double_tab_window)
            .unwrap_or(false);
        self.tab_presses = if rapid { self.tab_presses + 1 } else { 1 };
        self.last_tab = Some(now);

        let typed = self.input.trim().to_string();
        if typed.is_empty() {
            return;
        }

        let matches = self.matches(&typed);
        match matches.len() {
            0 => {}
            1 => {
                self.input = format!("{} ", matches[0]);
                self.clear_suggestions();
            }
            _ => {
                let prefix = common_prefix(&matches);
                if prefix != typed {
                    self.input = prefix;
                    self.clear_suggestions();
                } else if self.tab_presses >= 2 {
                    // nothing left to narrow: list the candidates like a shell
                    self.push(EntryKind::Command, typed);
                    self.push(EntryKind::Output, matches.join("  "));
                    self.suggestions = matches;
                    self.show_suggestions = true;
                    self.input.clear();
                }
            }
        }
    }

    fn history_up(&mut self) {
        self.tab_presses = 0;
        let len = self.command_history.len();
        if len == 0 {
            return;
        }
        let index = match self.history_index {
            None => 0,
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
        };
        self.history_index = Some(index);
        self.input = self.command_history[len - 1 - index].clone();
        self.clear_suggestions();
    }

    fn history_down(&mut self) {
        self.tab_presses = 0;
        let len = self.command_history.len();
        match self.history_index {
            Some(i) if i > 0 => {
                self.history_index = Some(i - 1);
                self.input = self.command_history[len - i].clone();
                self.clear_suggestions();
            }
            Some(_) => {
                self.history_index = None;
                self.input.clear();
            }
            None => {}
        }
    }

    fn dismiss_suggestions(&mut self) {
        self.clear_suggestions();
        self.tab_presses = 0;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    /// Back to the freshly created state. Vocabulary, table and clock stay.
    pub fn restart(&mut self) {
        self.history.clear();
        self.command_history.clear();
        self.history_index = None;
        self.input.clear();
        self.directory = HOME_DIRECTORY.to_string();
        self.clear_suggestions();
        self.tab_presses = 0;
        self.last_tab = None;
        self.fullscreen = false;
    }

    fn matches(&self, typed: &str) -> Vec<String> {
        let typed = typed.to_lowercase();
        self.vocabulary
            .iter()
            .filter(|cmd| cmd.to_lowercase().starts_with(&typed))
            .cloned()
            .collect()
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.show_suggestions = false;
    }

    fn push(&mut self, kind: EntryKind, text: impl Into<String>) {
        self.history.push(HistoryEntry {
            kind,
            text: text.into(),
            directory: self.directory.clone(),
        });
    }
}

/// Longest string every candidate starts with.
pub fn common_prefix(words: &[String]) -> String {
    let Some(first) = words.first() else {
        return String::new();
    };
    let mut prefix: &str = first;
    for word in &words[1..] {
        while !word.starts_with(prefix) {
            let mut chars = prefix.chars();
            chars.next_back();
            prefix = chars.as_str();
        }
    }
    prefix.to_string()
}
