//! Human-readable age parsing ("6 months", "2 weeks")

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid age format '{0}', expected e.g. \"30 days\"")]
    InvalidFormat(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(#[from] std::num::ParseIntError),

    #[error("Invalid unit '{0}', allowed units: hours, days, weeks, months, years")]
    InvalidUnit(String),

    #[error("Age is too large: {0}")]
    TooLarge(String),
}

const HOUR: u64 = 60 * 60;
const DAY: u64 = 24 * HOUR;

/// Maximum age of posts to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaxAge {
    amount: u64,
    unit: AgeUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum AgeUnit {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl AgeUnit {
    /// Months count as 30 days and years as 365
    fn seconds(self) -> u64 {
        match self {
            AgeUnit::Hour => HOUR,
            AgeUnit::Day => DAY,
            AgeUnit::Week => 7 * DAY,
            AgeUnit::Month => 30 * DAY,
            AgeUnit::Year => 365 * DAY,
        }
    }

    fn name(self) -> &'static str {
        match self {
            AgeUnit::Hour => "hour",
            AgeUnit::Day => "day",
            AgeUnit::Week => "week",
            AgeUnit::Month => "month",
            AgeUnit::Year => "year",
        }
    }
}

impl MaxAge {
    /// Instant before which posts are considered expired
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        // amount * unit is bounded at parse time, so this always fits
        let age = chrono::Duration::seconds((self.amount * self.unit.seconds()) as i64);
        now - age
    }
}

impl FromStr for MaxAge {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [amount, unit] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(s.trim().to_string()));
        };

        let amount: u64 = amount.parse()?;
        let unit = match unit.to_lowercase().as_str() {
            "hour" | "hours" => AgeUnit::Hour,
            "day" | "days" => AgeUnit::Day,
            "week" | "weeks" => AgeUnit::Week,
            "month" | "months" => AgeUnit::Month,
            "year" | "years" => AgeUnit::Year,
            _ => return Err(ParseError::InvalidUnit(unit.to_string())),
        };

        // keep the cutoff representable as a chrono duration and date
        let limit = 10_000 * AgeUnit::Year.seconds();
        match amount.checked_mul(unit.seconds()) {
            Some(secs) if secs <= limit => Ok(MaxAge { amount, unit }),
            _ => Err(ParseError::TooLarge(s.trim().to_string())),
        }
    }
}

impl fmt::Display for MaxAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.amount == 1 { "" } else { "s" };
        write!(f, "{} {}{}", self.amount, self.unit.name(), plural)
    }
}

impl Serialize for MaxAge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MaxAge {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct MaxAgeVisitor;

        impl<'de> serde::de::Visitor<'de> for MaxAgeVisitor {
            type Value = MaxAge;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an age as string (e.g., \"30 days\", \"6 months\")")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse::<MaxAge>().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(MaxAgeVisitor)
    }
}
