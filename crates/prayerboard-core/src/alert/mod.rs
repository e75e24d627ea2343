mod engine;
mod kind;
mod policy;
mod session;

pub use engine::AlertEngine;
pub use kind::{alert_key, AlertKind, AlertTier};
pub use policy::{
    diff_seconds, AlertPolicy, AlertWindow, Candidate, Decision, AZAN_WINDOW, HOLD_WINDOW,
    IQAMAH_WINDOW, REMINDER10_WINDOW, REMINDER5_WINDOW,
};
pub use session::{ActiveAlert, AlertSession};
