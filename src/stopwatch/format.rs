//! Elapsed-time display projection

use std::fmt;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Elapsed time split for display. Each field renders zero-padded to two
/// digits; hours are not capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub hundredths: u64,
}

impl TimeParts {
    pub fn hours_str(&self) -> String {
        format!("{:02}", self.hours)
    }

    pub fn minutes_str(&self) -> String {
        format!("{:02}", self.minutes)
    }

    pub fn seconds_str(&self) -> String {
        format!("{:02}", self.seconds)
    }

    pub fn hundredths_str(&self) -> String {
        format!("{:02}", self.hundredths)
    }
}

impl fmt::Display for TimeParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.hundredths
        )
    }
}

pub fn format_elapsed(ms: u64) -> TimeParts {
    TimeParts {
        hours: ms / MS_PER_HOUR,
        minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (ms % MS_PER_MINUTE) / MS_PER_SECOND,
        hundredths: (ms % MS_PER_SECOND) / 10,
    }
}
