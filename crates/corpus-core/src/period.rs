//! Fiscal period, reporting unit, frame and year range definitions.
//!
//! This module defines [`FiscalPeriod`] and [`Unit`] for classifying raw facts,
//! [`Frame`] for the calendar-period labels attached to facts, and [`YearRange`]
//! for the fiscal years a corpus covers.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CorpusError, Result};

/// First fiscal year extracted by default.
pub const DEFAULT_START_YEAR: i32 = 2009;

/// Fiscal period a fact was reported for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiscalPeriod {
    /// Full fiscal year.
    #[default]
    Annual,
    /// One fiscal quarter (1-4).
    Quarterly(u8),
}

impl FiscalPeriod {
    /// Parses the registry's period code (`FY`, `Q1`..`Q4`).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "FY" => Some(Self::Annual),
            "Q1" => Some(Self::Quarterly(1)),
            "Q2" => Some(Self::Quarterly(2)),
            "Q3" => Some(Self::Quarterly(3)),
            "Q4" => Some(Self::Quarterly(4)),
            _ => None,
        }
    }
}

/// Unit of measure a concept is reported in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Monetary amount (`USD`).
    #[default]
    Currency,
    /// Amount per share (`USD/shares`).
    PerShare,
    /// Number of shares (`shares`).
    ShareCount,
}

impl Unit {
    /// Returns the key the fact graph files this unit under.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Currency => "USD",
            Self::PerShare => "USD/shares",
            Self::ShareCount => "shares",
        }
    }

    /// Parses a unit key from the fact graph.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "USD" => Some(Self::Currency),
            "USD/shares" => Some(Self::PerShare),
            "shares" => Some(Self::ShareCount),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Calendar-period label attached to a reported fact.
///
/// Only two shapes matter for yearly extraction: a full calendar-year flow
/// (`CY2014`) and a year-end instant snapshot (`CY2013Q4I`). Every other label,
/// such as quarterly flows, is kept as [`Frame::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Flow over calendar year `n` (`CYn`).
    CalendarYear(i32),
    /// Instant snapshot at the end of calendar year `n` (`CYnQ4I`).
    YearEndInstant(i32),
    /// Any other frame label.
    Other(String),
}

impl Frame {
    /// Parses a frame label.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let Some(rest) = label.strip_prefix("CY") else {
            return Self::Other(label.to_string());
        };
        let (digits, instant) = match rest.strip_suffix("Q4I") {
            Some(digits) => (digits, true),
            None => (rest, false),
        };
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Self::Other(label.to_string());
        }
        match digits.parse::<i32>() {
            Ok(year) if instant => Self::YearEndInstant(year),
            Ok(year) => Self::CalendarYear(year),
            Err(_) => Self::Other(label.to_string()),
        }
    }

    /// Returns the fiscal year this frame is attributed to.
    ///
    /// A year-end snapshot of year `n` is attributed to fiscal year `n + 1`.
    #[must_use]
    pub const fn fiscal_year(&self) -> Option<i32> {
        match self {
            Self::CalendarYear(year) => Some(*year),
            Self::YearEndInstant(year) => Some(*year + 1),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CalendarYear(year) => write!(f, "CY{year}"),
            Self::YearEndInstant(year) => write!(f, "CY{year}Q4I"),
            Self::Other(label) => f.write_str(label),
        }
    }
}

/// Half-open range of fiscal years, `start..end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Creates a range covering `start` up to but excluding `end`.
    ///
    /// # Errors
    /// Returns [`CorpusError::Config`] if the range is empty.
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start >= end {
            return Err(CorpusError::Config(format!(
                "Year range {start}..{end} is empty"
            )));
        }
        Ok(Self { start, end })
    }

    /// Range from [`DEFAULT_START_YEAR`] up to the current year, exclusive.
    #[must_use]
    pub fn through_last_year() -> Self {
        let current = Local::now().year();
        Self {
            start: DEFAULT_START_YEAR,
            end: current.max(DEFAULT_START_YEAR + 1),
        }
    }

    /// First year in the range.
    #[must_use]
    pub const fn start(&self) -> i32 {
        self.start
    }

    /// First year after the range.
    #[must_use]
    pub const fn end(&self) -> i32 {
        self.end
    }

    /// Number of years in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.abs_diff(self.start) as usize
    }

    /// Always false; empty ranges cannot be constructed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates the years in ascending order.
    #[must_use]
    pub const fn years(&self) -> std::ops::Range<i32> {
        self.start..self.end
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::through_last_year()
    }
}
