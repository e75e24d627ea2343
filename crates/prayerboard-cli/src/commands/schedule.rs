use chrono::Local;
use clap::Subcommand;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use prayerboard_core::schedule::read_schedule;
use prayerboard_core::storage::{load_schedule, save_schedule};
use prayerboard_core::{AlertSession, BoardSnapshot, Config};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Replace the saved prayer table with a CSV file
    Import {
        /// CSV with the ten Tarikh Miladi .. Isyak columns
        file: PathBuf,
    },
    /// Write the saved prayer table to a CSV file
    Export {
        file: PathBuf,
    },
    /// Show the board for a day
    Show {
        /// Day to show (DD/MM/YYYY), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        ScheduleAction::Import { file } => {
            let reader = BufReader::new(File::open(&file)?);
            let rows = read_schedule(reader, &file.display().to_string())?;
            let target = super::schedule_file(&config)?;
            save_schedule(&target, &rows)?;
            println!("imported {} rows into {}", rows.len(), target.display());
        }
        ScheduleAction::Export { file } => {
            let rows = load_schedule(&super::schedule_file(&config)?)?;
            save_schedule(&file, &rows)?;
            println!("exported {} rows to {}", rows.len(), file.display());
        }
        ScheduleAction::Show { date, json } => {
            let now = Local::now().naive_local();
            let day = match date {
                Some(raw) => super::parse_date_arg(&raw)?,
                None => now.date(),
            };
            let store = super::load_store(&config, None)?;
            let entry = store.entry_for(day);
            let board = BoardSnapshot::build(&config, &entry, &AlertSession::new(), day.and_time(now.time()));

            if json {
                println!("{}", serde_json::to_string_pretty(&board)?);
            } else {
                print_board(&board);
            }
        }
    }
    Ok(())
}

fn print_board(board: &BoardSnapshot) {
    if !board.mosque_name.is_empty() {
        println!("{}", board.mosque_name);
    }
    println!("{}", board.date_text);
    println!("{}", board.hijri_text);
    if board.degraded {
        println!("(no prayer times for this day)");
    }
    println!();
    for row in &board.rows {
        let marker = if row.current { ">" } else { " " };
        println!("{marker} {:<8} {}", row.prayer.to_string(), row.time_text);
    }
}
