//! Traffic history and credit aggregation
//!
//! Backends deliver raw per-day byte counters; this module reshapes them
//! into the seven-day history shown on the account overview. Reshaping is a
//! pure transformation over already-fetched data.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Weekday labels, indexed by days-from-Sunday
pub const WEEKDAYS: [&str; 7] = [
    "Sonntag",
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
];

/// One MiB in bytes, the display unit divisor
pub const MIB: f64 = 1_048_576.0;

/// A raw per-day traffic counter as delivered by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTrafficEntry {
    /// Day the counters refer to
    pub date: NaiveDate,
    /// Inbound bytes
    pub input: u64,
    /// Outbound bytes
    pub output: u64,
    /// Remaining credit in bytes at the end of the day
    pub credit: u64,
}

/// One aggregated day of the traffic history, in MiB
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficDay {
    /// Weekday label (see [`WEEKDAYS`])
    pub weekday: &'static str,
    /// Inbound MiB, rounded to 2 decimal places
    pub input: f64,
    /// Outbound MiB, rounded to 2 decimal places
    pub output: f64,
    /// Credit MiB, rounded to 2 decimal places
    pub credit: f64,
}

impl TrafficDay {
    fn zero(date: NaiveDate) -> Self {
        Self {
            weekday: weekday_label(date),
            input: 0.0,
            output: 0.0,
            credit: 0.0,
        }
    }
}

/// The aggregated traffic view: seven trailing days plus the current credit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficRecord {
    /// History covering the trailing 7 days ending today inclusive
    pub history: Vec<TrafficDay>,
    /// Current credit in MiB (not rounded)
    pub credit: f64,
}

impl TrafficRecord {
    /// A fully zeroed record for the window ending at `today`
    pub fn zero(today: NaiveDate) -> Self {
        let history = window(today).map(TrafficDay::zero).collect();
        Self {
            history,
            credit: 0.0,
        }
    }
}

/// Label for the weekday of `date`
pub fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAYS[date.weekday().num_days_from_sunday() as usize]
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn window(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (-6..=0).map(move |offset| today + Duration::days(offset))
}

/// Aggregate raw backend entries into the trailing-7-day history
///
/// Days without a matching entry yield a zero-filled [`TrafficDay`]; an
/// empty entry list yields [`TrafficRecord::zero`]. The current credit is
/// taken from the last raw entry and converted from bytes to MiB.
pub fn aggregate(entries: &[RawTrafficEntry], today: NaiveDate) -> TrafficRecord {
    let Some(last) = entries.last() else {
        return TrafficRecord::zero(today);
    };

    let history = window(today)
        .map(|date| match entries.iter().find(|e| e.date == date) {
            Some(entry) => TrafficDay {
                weekday: weekday_label(date),
                input: round2(entry.input as f64 / MIB),
                output: round2(entry.output as f64 / MIB),
                credit: round2(entry.credit as f64 / MIB),
            },
            None => TrafficDay::zero(date),
        })
        .collect();

    TrafficRecord {
        history,
        credit: last.credit as f64 / MIB,
    }
}
