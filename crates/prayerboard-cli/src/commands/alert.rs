use chrono::Local;
use clap::Subcommand;

use prayerboard_core::{AlertEngine, AlertKind, Config, Prayer};

#[derive(Subcommand)]
pub enum AlertAction {
    /// Force an alert through a fresh engine and print the event
    Test {
        /// reminder10, reminder5, azan, iqamah or hold
        kind: AlertKind,
    },
    /// List each prayer's alert windows and durations
    Windows,
}

pub fn run(action: AlertAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut engine = AlertEngine::new(config.alerts);

    match action {
        AlertAction::Test { kind } => {
            let event = engine.test(kind, Local::now().naive_local());
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        AlertAction::Windows => {
            let alerts = engine.alerts_config();
            for prayer in Prayer::ALL {
                for window in engine.policy().windows(prayer) {
                    println!(
                        "{:<8} {:<10} {:>6}s .. {:>6}s  shows {}s",
                        prayer.to_string(),
                        window.kind.to_string(),
                        window.lo,
                        window.hi,
                        alerts.duration_secs(prayer, window.kind),
                    );
                }
            }
        }
    }
    Ok(())
}
