use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use spendlog_core::{time::FixedClock, Clock};

/// Pins "today" for scripted runs, e.g. `SPENDLOG_TODAY=2024-02-20`.
pub const TODAY_ENV: &str = "SPENDLOG_TODAY";

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// System clock, or a fixed noon-UTC clock when `SPENDLOG_TODAY` holds a date.
pub fn clock_from_env() -> Box<dyn Clock> {
    let pinned = std::env::var(TODAY_ENV)
        .ok()
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok());
    match pinned {
        Some(date) => Box::new(FixedClock(DateTime::from_naive_utc_and_offset(
            date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()),
            Utc,
        ))),
        None => Box::new(SystemClock),
    }
}
