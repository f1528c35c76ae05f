//! TUI and interactive components
//!
//! Features:
//! - One tab per portfolio section plus the interactive terminal
//! - Status bar with data provenance, loading spinner and last error
//! - Light/dark palette, persisted through the theme store
//! - Terminal fullscreen and restart controls

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};
use std::io;
use std::time::Duration;
use tokio::sync::watch;
use unicode_width::UnicodeWidthStr;

use crate::content::PortfolioContent;
use crate::reconcile::PortfolioSnapshot;
use crate::terminal::{CommandTable, EntryKind, TerminalKey, TerminalSession};
use crate::theme::{Theme, ThemeStore};
use crate::time_source::SharedTimeSource;

// ═══════════════════════════════════════════════════════════════
// STATE
// ═══════════════════════════════════════════════════════════════

/// Tab selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    About,
    Projects,
    Experience,
    Contact,
    Terminal,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::About, Tab::Projects, Tab::Experience, Tab::Contact, Tab::Terminal]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::About => "About",
            Tab::Projects => "Projects",
            Tab::Experience => "Experience",
            Tab::Contact => "Contact",
            Tab::Terminal => "Terminal",
        }
    }

    fn index(&self) -> usize {
        Tab::all().iter().position(|t| t == self).unwrap_or(0)
    }

    fn offset(&self, step: isize) -> Tab {
        let tabs = Tab::all();
        let len = tabs.len() as isize;
        tabs[((self.index() as isize + step).rem_euclid(len)) as usize]
    }
}

/// Colors for one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                fg: Color::White,
                bg: Color::Reset,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                error: Color::Red,
            },
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::Gray,
                error: Color::Red,
            },
        }
    }
}

/// What the caller should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Main TUI state
pub struct TuiState {
    pub tab: Tab,
    pub snapshot: PortfolioSnapshot,
    pub session: TerminalSession,
    pub theme: Theme,
    theme_options: Vec<Theme>,
    theme_store: Option<ThemeStore>,
    tick: usize,
    notice: Option<String>,
}

impl TuiState {
    pub fn new(snapshot: PortfolioSnapshot, theme: Theme, clock: SharedTimeSource) -> Self {
        let mut state = Self {
            tab: Tab::Home,
            snapshot: PortfolioSnapshot::loading(),
            session: TerminalSession::new(CommandTable::default(), clock),
            theme,
            theme_options: vec![Theme::Light, Theme::Dark],
            theme_store: None,
            tick: 0,
            notice: None,
        };
        state.apply_snapshot(snapshot);
        state
    }

    pub fn with_theme_store(mut self, store: ThemeStore) -> Self {
        self.theme_store = Some(store);
        self
    }

    /// Take a newly published snapshot and rebuild the terminal's outputs.
    pub fn apply_snapshot(&mut self, snapshot: PortfolioSnapshot) {
        if let Some(content) = snapshot.content() {
            self.session.set_table(CommandTable::from_content(content));
            if !content.navigation.theme.options.is_empty() {
                self.theme_options = content.navigation.theme.options.clone();
            }
        }
        self.snapshot = snapshot;
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn toggle_theme(&mut self) {
        let next = match &self.theme_store {
            Some(store) => match store.toggle(self.theme, &self.theme_options) {
                Ok(next) => next,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to save theme preference");
                    self.notice = Some(format!("Theme not saved: {}", e));
                    self.theme.next_in(&self.theme_options)
                }
            },
            None => self.theme.next_in(&self.theme_options),
        };
        tracing::debug!(theme = next.name(), "theme toggled");
        self.theme = next;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global controls
        match key.code {
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Char('t') if ctrl => {
                self.toggle_theme();
                return Action::Continue;
            }
            KeyCode::Char('f') if ctrl && self.tab == Tab::Terminal => {
                self.session.toggle_fullscreen();
                return Action::Continue;
            }
            KeyCode::Char('r') if ctrl && self.tab == Tab::Terminal => {
                self.session.restart();
                return Action::Continue;
            }
            _ => {}
        }

        if self.tab == Tab::Terminal {
            // Tab completes inside the terminal, so switching uses the arrows
            match key.code {
                KeyCode::Left if self.session.input().is_empty() => self.tab = self.tab.offset(-1),
                KeyCode::Right if self.session.input().is_empty() => self.tab = self.tab.offset(1),
                _ => {
                    if let Some(k) = terminal_key(&key) {
                        self.session.handle_key(k);
                    }
                }
            }
            return Action::Continue;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
            KeyCode::Tab | KeyCode::Right => {
                self.tab = self.tab.offset(1);
                Action::Continue
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.tab = self.tab.offset(-1);
                Action::Continue
            }
            KeyCode::Char(c) if ('1'..='6').contains(&c) => {
                let idx = c as usize - '1' as usize;
                self.tab = Tab::all()[idx];
                Action::Continue
            }
            _ => Action::Continue,
        }
    }
}

/// Map a crossterm key to the terminal's key vocabulary.
pub fn terminal_key(key: &KeyEvent) -> Option<TerminalKey> {
    if key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }
    Some(match key.code {
        KeyCode::Enter => TerminalKey::Enter,
        KeyCode::Tab => TerminalKey::Tab,
        KeyCode::Up => TerminalKey::Up,
        KeyCode::Down => TerminalKey::Down,
        KeyCode::Esc => TerminalKey::Escape,
        KeyCode::Backspace => TerminalKey::Backspace,
        KeyCode::Char(c) => TerminalKey::Char(c),
        _ => return None,
    })
}

// ═══════════════════════════════════════════════════════════════
// MAIN TUI
// ═══════════════════════════════════════════════════════════════

/// Run the main TUI until the user quits.
pub async fn run_tui(state: TuiState, snapshots: watch::Receiver<PortfolioSnapshot>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_tui_loop(&mut terminal, state, snapshots).await;
    restore_terminal(terminal)?;
    result
}

async fn run_tui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut state: TuiState,
    mut snapshots: watch::Receiver<PortfolioSnapshot>,
) -> Result<()> {
    loop {
        state.tick = state.tick.wrapping_add(1);

        // Pick up new snapshots; a closed channel just means no more updates
        if snapshots.has_changed().unwrap_or(false) {
            let snapshot = snapshots.borrow_and_update().clone();
            tracing::debug!(source = snapshot.source_label(), "snapshot updated");
            state.apply_snapshot(snapshot);
        }

        terminal.draw(|f| render_tui(f, &state))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if state.handle_key(key) == Action::Quit {
                    break;
                }
            }
        } else {
            tokio::task::yield_now().await;
        }
    }

    Ok(())
}

pub fn render_tui(f: &mut Frame, state: &TuiState) {
    let palette = Palette::for_theme(state.theme);
    let area = f.size();
    f.render_widget(Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)), area);

    if state.tab == Tab::Terminal && state.session.is_fullscreen() {
        render_terminal(f, state, area, &palette);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header + tabs
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status
        ])
        .split(area);

    let title = match state.snapshot.content() {
        Some(c) => format!("{} | {}", c.navigation.logo.text, c.profile.name),
        None => "folio".to_string(),
    };
    let tabs = Tabs::new(Tab::all().iter().map(|t| t.name()))
        .select(state.tab.index())
        .style(Style::default().fg(palette.fg))
        .highlight_style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(tabs, chunks[0]);

    match (state.tab, state.snapshot.content()) {
        (Tab::Terminal, _) => render_terminal(f, state, chunks[1], &palette),
        (tab, Some(content)) => {
            let para = Paragraph::new(section_lines(tab, content).join("\n"))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(tab.name()));
            f.render_widget(para, chunks[1]);
        }
        (tab, None) => {
            let para = Paragraph::new(format!("{} Loading portfolio...", spinner_char(state.tick)))
                .style(Style::default().fg(palette.muted))
                .block(Block::default().borders(Borders::ALL).title(tab.name()));
            f.render_widget(para, chunks[1]);
        }
    }

    let status = Paragraph::new(status_line(state)).style(status_style(state, &palette));
    f.render_widget(status, chunks[2]);
}

pub fn status_line(state: &TuiState) -> String {
    let mut line = format!(
        " {} source: {} | theme: {} {}",
        if state.snapshot.is_loading() { spinner_char(state.tick) } else { ' ' },
        state.snapshot.source_label(),
        state.theme.icon(),
        state.theme.name(),
    );
    if let Some(err) = &state.snapshot.error {
        line.push_str(&format!(" | error: {}", err));
    }
    if let Some(notice) = &state.notice {
        line.push_str(&format!(" | {}", notice));
    }
    let hints = if state.tab == Tab::Terminal {
        " | ^F:fullscreen ^R:restart ^T:theme ^C:quit"
    } else {
        " | Tab/1-6:switch ^T:theme q:quit"
    };
    line.push_str(hints);
    line
}

fn status_style(state: &TuiState, palette: &Palette) -> Style {
    if state.snapshot.error.is_some() {
        Style::default().fg(palette.error)
    } else if state.snapshot.is_using_api() {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.muted)
    }
}

fn render_terminal(f: &mut Frame, state: &TuiState, area: Rect, palette: &Palette) {
    let session = &state.session;
    let prompt = format!("visitor@folio:{}$ ", session.directory());

    let mut lines: Vec<Line> = Vec::new();
    for entry in session.history() {
        match entry.kind {
            EntryKind::Command => lines.push(Line::from(vec![
                Span::styled(format!("visitor@folio:{}$ ", entry.directory), Style::default().fg(palette.accent)),
                Span::raw(entry.text.clone()),
            ])),
            EntryKind::Output => {
                for text in entry.text.lines() {
                    lines.push(Line::raw(text.to_string()));
                }
            }
        }
    }
    lines.push(Line::from(vec![
        Span::styled(prompt.clone(), Style::default().fg(palette.accent)),
        Span::raw(session.input().to_string()),
    ]));
    if session.suggestions_visible() {
        lines.push(Line::styled(session.suggestions().join("  "), Style::default().fg(palette.muted)));
    }

    // Keep the prompt on screen
    let inner_height = area.height.saturating_sub(2) as usize;
    let prompt_row = lines.len() - if session.suggestions_visible() { 2 } else { 1 };
    let scroll = (prompt_row + 1).saturating_sub(inner_height);

    let title = if session.is_fullscreen() { "Terminal (fullscreen)" } else { "Terminal" };
    let para = Paragraph::new(lines)
        .scroll((scroll as u16, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(para, area);

    let cursor_x = area.x + 1 + (prompt.width() + session.input().width()) as u16;
    let cursor_y = area.y + 1 + (prompt_row - scroll) as u16;
    if cursor_x < area.right().saturating_sub(1) && cursor_y < area.bottom().saturating_sub(1) {
        f.set_cursor(cursor_x, cursor_y);
    }
}

/// Text shown on a section tab.
pub fn section_lines(tab: Tab, content: &PortfolioContent) -> Vec<String> {
    match tab {
        Tab::Home => {
            let hero = &content.hero;
            let mut lines = vec![
                hero.greeting.clone(),
                hero.name.clone(),
                hero.title.clone(),
                String::new(),
                hero.tagline.clone(),
                String::new(),
            ];
            lines.extend(hero.code_snippets.iter().map(|s| format!("  {}", s)));
            lines.push(String::new());
            lines.push(content.skills.join(" · "));
            lines
        }
        Tab::About => {
            let about = &content.about;
            let mut lines = vec![about.description.clone(), String::new()];
            lines.push(format!(
                "{} years · {} projects",
                about.experience.years, about.experience.projects
            ));
            if let Some(work) = &about.experience.latest_work {
                lines.push(format!("Currently: {} at {}", work.role, work.org.name));
            }
            for group in &about.skills_by_category {
                lines.push(String::new());
                lines.push(format!("{}:", group.category));
                let names: Vec<&str> = group.skills.iter().map(|s| s.name.as_str()).collect();
                lines.push(format!("  {}", names.join(", ")));
            }
            lines.push(String::new());
            lines.extend(about.fun_facts.iter().map(|f| format!("{} {}", f.emoji, f.text)));
            lines
        }
        Tab::Projects => {
            let section = &content.projects;
            let mut lines = vec![section.subtitle.clone()];
            for p in &section.projects {
                lines.push(String::new());
                lines.push(format!("{} {} [{}] {}", p.icon, p.title, p.status, p.category));
                lines.push(format!("  {}", p.description));
                if !p.tech.is_empty() {
                    lines.push(format!("  {}", p.tech.join(", ")));
                }
                if !p.link.is_empty() {
                    lines.push(format!("  {}", p.link));
                }
            }
            lines
        }
        Tab::Experience => {
            let section = &content.experience;
            let mut lines = vec![section.subtitle.clone()];
            for w in &section.works {
                let to = w.duration.to.as_deref().unwrap_or("Present");
                lines.push(String::new());
                lines.push(format!("{} {} | {}", w.icon, w.role, w.org.name));
                lines.push(format!("  {} - {} · {}", w.duration.from, to, w.location));
                if !w.description.is_empty() {
                    lines.push(format!("  {}", w.description));
                }
            }
            lines
        }
        Tab::Contact => {
            let contact = &content.contact;
            let info = &contact.contact_info;
            let mut lines = vec![contact.subtitle.clone(), String::new()];
            lines.push(format!("Email: {}", info.email));
            if !info.location.is_empty() {
                lines.push(format!("Location: {}", info.location));
            }
            if !info.availability.is_empty() {
                lines.push(info.availability.clone());
            }
            lines.push(String::new());
            lines.extend(contact.social_links.iter().map(|l| format!("{}: {}", l.platform, l.url)));
            lines.push(String::new());
            lines.push(content.footer.copyright.text.clone());
            lines
        }
        Tab::Terminal => Vec::new(),
    }
}

fn spinner_char(tick: usize) -> char {
    const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
    SPINNER[tick % SPINNER.len()]
}

// ═══════════════════════════════════════════════════════════════
// TERMINAL SETUP
// ═══════════════════════════════════════════════════════════════

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
