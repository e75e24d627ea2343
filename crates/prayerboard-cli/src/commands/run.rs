//! Live board loop.
//!
//! Two timers share one task: the 1 s alert tick and the 100 ms marquee
//! scroll. Operator commands arrive on stdin one per line:
//!
//! ```text
//! d           dismiss the active alert
//! t <kind>    force a test alert (reminder10, reminder5, azan, iqamah, hold)
//! r           reload the prayer table and configuration from disk
//! q           quit
//! ```

use chrono::Local;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use prayerboard_core::storage::load_schedule;
use prayerboard_core::{AlertEngine, AlertKind, BoardSnapshot, Config, Event, Marquee, ScheduleStore};

/// Adopt a reloaded configuration. Returns whether the alert settings
/// changed.
fn apply_config(engine: &mut AlertEngine, config: &mut Config, fresh: Config) -> bool {
    let changed = engine.alerts_config() != &fresh.alerts;
    if changed {
        engine.set_alerts_config(fresh.alerts.clone());
    }
    *config = fresh;
    changed
}

/// Characters of the marquee shown on the status line.
const MARQUEE_WIDTH: usize = 48;

#[derive(Args)]
pub struct RunArgs {
    /// Prayer times CSV to use instead of the saved table
    #[arg(long)]
    schedule: Option<PathBuf>,
    /// Print events and per-second board snapshots as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoardCommand {
    Dismiss,
    Test(AlertKind),
    Reload,
    Quit,
}

fn parse_command(line: &str) -> Result<BoardCommand, String> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let arg = words.next();
    match (command, arg) {
        ("d" | "dismiss", None) => Ok(BoardCommand::Dismiss),
        ("t" | "test", Some(kind)) => kind.parse().map(BoardCommand::Test),
        ("r" | "reload", None) => Ok(BoardCommand::Reload),
        ("q" | "quit", None) => Ok(BoardCommand::Quit),
        _ => Err(format!("unrecognised command: {}", line.trim())),
    }
}

/// Point the marquee at whatever the event calls for. Alert text while an
/// alert is showing, the flash message once it ends.
fn update_marquee(event: &Event, marquee: &mut Marquee, flash_message: &str) {
    if let Some(message) = event.alert_message() {
        marquee.set_text(message);
    } else if event.ends_alert() {
        marquee.set_text(flash_message);
    }
}

fn status_line(board: &BoardSnapshot, marquee: &Marquee) -> String {
    let current = board
        .current_prayer
        .map_or_else(|| "-".to_string(), |p| p.to_string());
    let scroll: String = marquee.text().chars().take(MARQUEE_WIDTH).collect();
    let countdown = board
        .alert
        .as_ref()
        .map(|a| format!(" [{}s]", a.remaining_secs))
        .unwrap_or_default();
    format!("{} {:<8}{} | {}", board.clock_text, current, countdown, scroll)
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let path = match args.schedule {
        Some(path) => path,
        None => super::schedule_file(&config)?,
    };
    let store = ScheduleStore::new(load_schedule(&path)?);
    if store.is_empty() {
        warn!(path = %path.display(), "no prayer times loaded, showing placeholder");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(board_loop(config, store, path, args.json))
}

async fn board_loop(
    mut config: Config,
    store: ScheduleStore,
    path: PathBuf,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = AlertEngine::new(config.alerts.clone());
    let mut marquee = Marquee::new(config.flash_message.clone());

    let mut second = interval(Duration::from_secs(1));
    second.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut scroll = interval(Duration::from_millis(100));
    scroll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!(mosque = %config.mosque_name, rows = store.len(), "board started");

    loop {
        let mut snapshot = None;
        let event = tokio::select! {
            _ = second.tick() => {
                let now = Local::now().naive_local();
                let event = engine.tick(&store, now);
                if json {
                    let board = BoardSnapshot::build(&config, &store.entry_for(now.date()), engine.session(), now);
                    snapshot = Some(Event::BoardSnapshot(board));
                }
                event
            }
            _ = scroll.tick() => {
                marquee.rotate();
                None
            }
            line = lines.next_line(), if stdin_open => {
                let now = Local::now().naive_local();
                match line {
                    Ok(None) => {
                        stdin_open = false;
                        None
                    }
                    Err(e) => {
                        warn!("stdin unreadable, ignoring further commands: {e}");
                        stdin_open = false;
                        None
                    }
                    Ok(Some(line)) if line.trim().is_empty() => None,
                    Ok(Some(line)) => match parse_command(&line) {
                        Ok(BoardCommand::Dismiss) => engine.dismiss(now),
                        Ok(BoardCommand::Test(kind)) => Some(engine.test(kind, now)),
                        Ok(BoardCommand::Reload) => {
                            match load_schedule(&path) {
                                Ok(rows) => {
                                    info!(rows = rows.len(), "prayer times reloaded");
                                    store.replace_all(rows);
                                }
                                Err(e) => warn!("reload failed, keeping current table: {e}"),
                            }
                            match Config::load() {
                                Ok(fresh) => {
                                    if apply_config(&mut engine, &mut config, fresh) {
                                        info!(hold_enabled = engine.policy().hold_enabled, "alert settings reloaded");
                                    }
                                }
                                Err(e) => warn!("reload failed, keeping current configuration: {e}"),
                            }
                            None
                        }
                        Ok(BoardCommand::Quit) => break,
                        Err(message) => {
                            warn!("{message}");
                            None
                        }
                    },
                }
            }
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
        };

        if let Some(event) = &event {
            update_marquee(event, &mut marquee, &config.flash_message);
            if json {
                emit_json(event)?;
            } else {
                println!();
                println!("{}", describe(event));
            }
        }
        if let Some(snapshot) = &snapshot {
            emit_json(snapshot)?;
        }
        if !json {
            let now = Local::now().naive_local();
            let board = BoardSnapshot::build(&config, &store.entry_for(now.date()), engine.session(), now);
            print!("\r{}", status_line(&board, &marquee));
            std::io::stdout().flush()?;
        }
    }

    if !json {
        println!();
    }
    info!("board stopped");
    Ok(())
}

fn emit_json(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

fn describe(event: &Event) -> String {
    match event {
        Event::AlertRaised { message, duration_secs, .. } => {
            format!(">> {message} ({duration_secs}s)")
        }
        Event::AlertPreempted { replaced_key, message, .. } => {
            format!(">> {message} (replaces {replaced_key})")
        }
        Event::AlertExpired { key, .. } => format!("-- {key} ended"),
        Event::AlertDismissed { key, .. } => format!("-- {key} dismissed"),
        Event::DailyReset { cleared, .. } => format!("-- new day, {cleared} alerts re-armed"),
        Event::BoardSnapshot(board) => board.clock_text.clone(),
    }
}
