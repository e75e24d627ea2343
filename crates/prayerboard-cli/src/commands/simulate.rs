use chrono::{Duration, NaiveDateTime};
use clap::Args;
use std::path::PathBuf;

use prayerboard_core::{AlertEngine, Config, Event, ScheduleStore};

#[derive(Args)]
pub struct SimulateArgs {
    /// Day to replay (DD/MM/YYYY)
    #[arg(long)]
    date: String,
    /// First instant (HH:MM:SS)
    #[arg(long, default_value = "00:00:00")]
    from: String,
    /// Last instant, inclusive (HH:MM:SS)
    #[arg(long, default_value = "23:59:59")]
    to: String,
    /// Prayer times CSV to use instead of the saved table
    #[arg(long)]
    schedule: Option<PathBuf>,
}

/// Tick once per second over `[from, to]`.
pub(crate) fn replay(
    engine: &mut AlertEngine,
    store: &ScheduleStore,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Vec<Event> {
    let mut events = Vec::new();
    let mut now = from;
    while now <= to {
        events.extend(engine.tick(store, now));
        now += Duration::seconds(1);
    }
    events
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let date = super::parse_date_arg(&args.date)?;
    let from = date.and_time(super::parse_clock_arg(&args.from)?);
    let to = date.and_time(super::parse_clock_arg(&args.to)?);
    if to < from {
        return Err(format!("--to {} is before --from {}", args.to, args.from).into());
    }

    let config = Config::load()?;
    let store = super::load_store(&config, args.schedule.as_deref())?;
    let mut engine = AlertEngine::new(config.alerts);

    for event in replay(&mut engine, &store, from, to) {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
