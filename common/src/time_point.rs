//! Parsing of the target instant a snapshot is taken at.
//!
//! Four literal shapes are recognized, and the whole input must match one of them:
//! - `YYYY-MM-DD`, read as local midnight of that date
//! - `YYYY-MM-DDTHH:MM:SSZ`, read as UTC
//! - 10 digits, a UNIX epoch in seconds
//! - 13 digits, a UNIX epoch in milliseconds

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::InputError;

pub const USAGE_HINT: &str = "Invalid date format, please use date format YYYY-MM-DD, YYYY-MM-DDTHH:mm:ssZ, or an epoch time using UNIX standard";

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid regex"));
static DATE_TIME_UTC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}Z$").expect("valid regex")
});
static EPOCH_SECONDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));
static EPOCH_MILLIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{13}$").expect("valid regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeFormat {
    Date,
    DateTimeUtc,
    EpochSeconds,
    EpochMillis,
}

impl TimeFormat {
    pub fn detect(input: &str) -> Option<Self> {
        if DATE.is_match(input) {
            Some(Self::Date)
        } else if DATE_TIME_UTC.is_match(input) {
            Some(Self::DateTimeUtc)
        } else if EPOCH_SECONDS.is_match(input) {
            Some(Self::EpochSeconds)
        } else if EPOCH_MILLIS.is_match(input) {
            Some(Self::EpochMillis)
        } else {
            None
        }
    }
}

impl Display for TimeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Date => "a date (YYYY-MM-DD)",
            Self::DateTimeUtc => "a UTC timestamp (YYYY-MM-DDTHH:mm:ssZ)",
            Self::EpochSeconds => "an epoch in seconds",
            Self::EpochMillis => "an epoch in milliseconds",
        };
        f.write_str(name)
    }
}

/// An instant in whole seconds since the UNIX epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TimePoint(u64);

impl TimePoint {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn parse(input: &str) -> Result<Self, InputError> {
        let input = input.trim();
        let format = TimeFormat::detect(input)
            .ok_or_else(|| InputError::UnrecognizedFormat(input.to_string()))?;

        let invalid = || InputError::InvalidValue {
            input: input.to_string(),
            format,
        };

        let secs = match format {
            TimeFormat::Date => {
                let midnight = NaiveDate::parse_from_str(input, "%Y-%m-%d")
                    .map_err(|_| invalid())?
                    .and_hms_opt(0, 0, 0)
                    .ok_or_else(invalid)?;
                match Local.from_local_datetime(&midnight) {
                    LocalResult::Single(dt) => dt.timestamp(),
                    // on a DST fold the earlier of the two instants is midnight
                    LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
                    LocalResult::None => {
                        return Err(InputError::NonexistentLocalTime(input.to_string()))
                    }
                }
            }
            TimeFormat::DateTimeUtc => NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%SZ")
                .map_err(|_| invalid())?
                .and_utc()
                .timestamp(),
            TimeFormat::EpochSeconds => return input.parse().map(Self).map_err(|_| invalid()),
            TimeFormat::EpochMillis => {
                return input
                    .parse::<u64>()
                    .map(|millis| Self(millis / 1000))
                    .map_err(|_| invalid())
            }
        };

        u64::try_from(secs)
            .map(Self)
            .map_err(|_| InputError::BeforeEpoch(input.to_string()))
    }

    /// Human readable rendering in the local timezone.
    pub fn to_local_string(&self) -> String {
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %Z").to_string())
            .unwrap_or_else(|| self.0.to_string())
    }
}

impl FromStr for TimePoint {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
