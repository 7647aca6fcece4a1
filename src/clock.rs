//! Time source for changelog timestamps.

use chrono::{DateTime, Utc};

/// Date format of the changelog trailer line (RFC 2822 with a zero-padded day).
pub const CHANGELOG_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Supplies the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Format a timestamp for a changelog trailer line.
pub fn format_changelog_date(date: &DateTime<Utc>) -> String {
    date.format(CHANGELOG_DATE_FORMAT).to_string()
}
