//! folio - terminal portfolio viewer
//!
//! USAGE:
//!   folio                          # interactive TUI
//!   folio snapshot [--wait <secs>] # print the reconciled snapshot as JSON
//!   folio exec <command line>      # run one terminal command
//!   folio doctor                   # check config, backup, API endpoints
//!   folio config set <key> <value> # non-interactive config

use anyhow::{Context, Result};
use std::time::Duration;

use folio::backup::{BackupLoader, BackupSource};
use folio::client::{self, ApiClient, RemoteSource};
use folio::config;
use folio::logging;
use folio::reconcile::{PortfolioSnapshot, Reconciler, RetryPolicy};
use folio::terminal::{CommandTable, EntryKind, TerminalSession};
use folio::theme::ThemeStore;
use folio::time_source::RealTimeSource;
use folio::ui;

// ═══════════════════════════════════════════════════════════════
// CLI
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, PartialEq)]
enum Command {
    Interactive,
    Snapshot { wait: Option<Duration> },
    Exec { line: String },
    Doctor,
    ConfigSet { key: String, value: String },
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    if args.is_empty() {
        return Ok(Command::Interactive);
    }

    if args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(Command::Help);
    }

    match args[0].as_str() {
        "doctor" => Ok(Command::Doctor),
        "snapshot" => {
            let mut wait = None;
            let mut i = 1;
            while i < args.len() {
                match args[i].as_str() {
                    "--wait" | "-w" => {
                        i += 1;
                        let secs: f64 = args
                            .get(i)
                            .context("--wait needs a number of seconds")?
                            .parse()
                            .context("--wait needs a number of seconds")?;
                        if secs.is_nan() {
                            anyhow::bail!("--wait needs a number of seconds");
                        }
                        let wait_for = Duration::try_from_secs_f64(secs.max(0.0))
                            .map_err(|_| anyhow::anyhow!("--wait is out of range: {}", secs))?;
                        wait = Some(wait_for);
                    }
                    other => anyhow::bail!("Unknown snapshot flag: {}", other),
                }
                i += 1;
            }
            Ok(Command::Snapshot { wait })
        }
        "exec" => {
            let line = args[1..].join(" ");
            if line.trim().is_empty() {
                anyhow::bail!("Usage: folio exec <command line>");
            }
            Ok(Command::Exec { line })
        }
        "config" if args.get(1).map(|s| s.as_str()) == Some("set") => Ok(Command::ConfigSet {
            key: args.get(2).cloned().unwrap_or_default(),
            value: args.get(3).cloned().unwrap_or_default(),
        }),
        other => anyhow::bail!("Unknown command: {}. Try --help", other),
    }
}

fn print_help() {
    println!(r#"folio - terminal portfolio viewer

USAGE:
    folio                            # interactive TUI
    folio snapshot [--wait <secs>]   # print the reconciled snapshot as JSON
    folio exec <command line>        # run one terminal command, e.g. `folio exec whoami`
    folio doctor                     # check config, backup document, API endpoints
    folio config set <key> <value>   # keys: site, api, key, backup, theme

FLAGS:
    -w, --wait <secs>       Print whatever is loaded after this long
    -h, --help              Show this help

CONFIG:
    ~/.config/folio/config.json     Site/API location, API key, retry tuning
    ~/.local/state/folio/theme.json Saved theme
    ~/.local/state/folio/folio.log  Log file

ENVIRONMENT:
    FOLIO_SITE_URL          Override site origin
    FOLIO_API_URL           Override API base URL
    FOLIO_API_KEY           Override API key
    FOLIO_LOG               Log filter (default: info)

CONTROLS (interactive mode):
    Tab / 1-6   Switch tabs (arrows on the Terminal tab)
    Ctrl-F      Terminal fullscreen
    Ctrl-R      Restart terminal
    Ctrl-T      Toggle theme
    Ctrl-C      Quit
"#);
}

// ═══════════════════════════════════════════════════════════════
// MAIN
// ═══════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    if command != Command::Help {
        init_logging();
    }

    match command {
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Doctor => run_doctor().await,
        Command::Snapshot { wait } => run_snapshot(wait).await,
        Command::Exec { line } => run_exec(&line).await,
        Command::ConfigSet { key, value } => run_config_set(&key, &value),
        Command::Interactive => run_interactive().await,
    }
}

fn init_logging() {
    let result = config::ensure_dirs()
        .and_then(|_| logging::default_log_path())
        .and_then(|path| logging::init(&path));
    if let Err(e) = result {
        eprintln!("warning: logging disabled: {:#}", e);
    }
}

// ═══════════════════════════════════════════════════════════════
// COMMANDS
// ═══════════════════════════════════════════════════════════════

async fn run_doctor() -> Result<()> {
    println!("folio doctor\n");

    let cfg = config::Config::load()?;
    let path = config::config_path()?;
    println!("[{}] Config: {}", mark(path.exists()), path.display());
    println!("[{}] Site: {}", mark(cfg.site_url.is_some()), display_or_unset(&cfg.site_origin()));
    println!("[{}] API: {}", mark(!cfg.api_base().is_empty()), display_or_unset(&cfg.api_base()));
    println!(
        "[{}] API key: {}",
        mark(cfg.api_key.is_some()),
        if cfg.api_key.is_some() { "configured" } else { "missing" }
    );

    let backup = BackupLoader::from_config(&cfg)?;
    match backup.load().await {
        Ok(_) => println!("[✓] Backup: {:?}", backup.location()),
        Err(e) => println!("[✗] Backup: {:?}: {}", backup.location(), e),
    }

    let api = ApiClient::from_config(&cfg)?;
    let bundle = api.fetch_all().await;
    let failures = bundle.failures();
    for path in client::ENDPOINTS {
        match failures.iter().find(|(failed, _)| *failed == path) {
            Some((_, e)) => println!("[✗] {}{}: {}", api.base_url(), path, e),
            None => println!("[✓] {}{}", api.base_url(), path),
        }
    }

    Ok(())
}

async fn run_snapshot(wait: Option<Duration>) -> Result<()> {
    let cfg = config::Config::load()?;
    let handle = Reconciler::from_config(&cfg)?.spawn();
    let snapshots = handle.subscribe();

    let snapshot = match wait {
        Some(wait) => match tokio::time::timeout(wait, handle.settle()).await {
            Ok(snapshot) => snapshot,
            Err(_) => snapshots.borrow().clone(),
        },
        None => handle.settle().await,
    };

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

async fn run_exec(line: &str) -> Result<()> {
    let cfg = config::Config::load()?;
    // One API attempt is enough for a one-shot command
    let policy = RetryPolicy {
        max_retries: 0,
        ..RetryPolicy::from_config(&cfg)
    };
    let snapshot = Reconciler::from_config(&cfg)?.with_policy(policy).spawn().settle().await;

    for output in exec_outputs(&snapshot, line) {
        println!("{}", output);
    }
    Ok(())
}

fn exec_outputs(snapshot: &PortfolioSnapshot, line: &str) -> Vec<String> {
    let table = snapshot.content().map(CommandTable::from_content).unwrap_or_default();
    let mut session = TerminalSession::new(table, RealTimeSource::shared());
    session.execute(line);
    session
        .history()
        .iter()
        .filter(|e| e.kind == EntryKind::Output)
        .map(|e| e.text.clone())
        .collect()
}

fn run_config_set(key: &str, value: &str) -> Result<()> {
    let mut cfg = config::Config::load_file()?;
    cfg.set(key, value)?;
    cfg.save()?;
    println!("{} saved to {}", key, config::config_path()?.display());
    Ok(())
}

async fn run_interactive() -> Result<()> {
    let cfg = config::Config::load()?;
    let handle = Reconciler::from_config(&cfg)?.spawn();

    let store = ThemeStore::open_default()?;
    let theme = store.load(cfg.initial_theme);
    let state = ui::TuiState::new(handle.current(), theme, RealTimeSource::shared())
        .with_theme_store(store);

    let result = ui::run_tui(state, handle.subscribe()).await;
    handle.shutdown();
    result
}

fn mark(ok: bool) -> &'static str {
    if ok { "✓" } else { "✗" }
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() { "(unset)" } else { value }
}
