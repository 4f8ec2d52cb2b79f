// Time window [from, to] in epoch milliseconds. Also the shape of a detected gap.

use std::fmt;

use chrono::{DateTime, Local};

use crate::error::StatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    from: i64,
    to: i64,
}

impl Range {
    /// Fails with `InvalidArgument` when `from > to`.
    pub fn new(from: i64, to: i64) -> Result<Self, StatError> {
        if from > to {
            return Err(StatError::InvalidArgument(format!(
                "range.from ({from}) must not be after range.to ({to})"
            )));
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> i64 {
        self.from
    }

    pub fn to(&self) -> i64 {
        self.to
    }

    /// Width of the window in milliseconds.
    pub fn span(&self) -> i64 {
        self.to - self.from
    }

    /// Human-readable form with local wall-clock times, for log lines.
    pub fn pretty(&self) -> String {
        format!(
            "Range{{from={}, to={}, span={}}}",
            format_millis(self.from),
            format_millis(self.to),
            self.span()
        )
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Range{{from={}, to={}}}", self.from, self.to)
    }
}

fn format_millis(ms: i64) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S%.3f")
            .to_string(),
        None => ms.to_string(),
    }
}
