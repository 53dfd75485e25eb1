//! The date and time components a partial date is made of.
//!
//! Components are a closed set, so everything that iterates "one per
//! component" (form elements, schema columns, settings flags) walks
//! [`Component::ALL`] or [`Component::NUMERIC`] instead of string keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PartialDateError;

/// One named sub-part of a date/time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Timezone,
}

/// Whether a component belongs to the date or the time half of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Date,
    Time,
}

impl Component {
    /// All components in canonical order.
    pub const ALL: [Component; 7] = [
        Component::Year,
        Component::Month,
        Component::Day,
        Component::Hour,
        Component::Minute,
        Component::Second,
        Component::Timezone,
    ];

    /// Components holding integers. These are the ones that take estimates.
    pub const NUMERIC: [Component; 6] = [
        Component::Year,
        Component::Month,
        Component::Day,
        Component::Hour,
        Component::Minute,
        Component::Second,
    ];

    /// Hour, minute and second.
    pub const TIME_OF_DAY: [Component; 3] = [Component::Hour, Component::Minute, Component::Second];

    /// Machine name, also used as the storage column name.
    pub fn name(self) -> &'static str {
        match self {
            Component::Year => "year",
            Component::Month => "month",
            Component::Day => "day",
            Component::Hour => "hour",
            Component::Minute => "minute",
            Component::Second => "second",
            Component::Timezone => "timezone",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Component::Year => "Year",
            Component::Month => "Month",
            Component::Day => "Day",
            Component::Hour => "Hour",
            Component::Minute => "Minute",
            Component::Second => "Second",
            Component::Timezone => "Timezone",
        }
    }

    pub fn kind(self) -> ComponentKind {
        match self {
            Component::Year | Component::Month | Component::Day => ComponentKind::Date,
            _ => ComponentKind::Time,
        }
    }

    pub fn is_numeric(self) -> bool {
        self != Component::Timezone
    }

    pub fn is_time_of_day(self) -> bool {
        matches!(self, Component::Hour | Component::Minute | Component::Second)
    }

    /// Inclusive valid range. `None` for the unbounded year and for timezone.
    pub fn bounds(self) -> Option<(i64, i64)> {
        match self {
            Component::Month => Some((1, 12)),
            Component::Day => Some((1, 31)),
            Component::Hour => Some((0, 23)),
            Component::Minute | Component::Second => Some((0, 59)),
            Component::Year | Component::Timezone => None,
        }
    }

    /// Check a numeric value against the component's range.
    pub fn check(self, value: i64) -> Result<i64, PartialDateError> {
        if !self.is_numeric() {
            return Err(PartialDateError::NotNumeric { component: self });
        }
        match self.bounds() {
            Some((min, max)) if value < min || value > max => Err(PartialDateError::OutOfRange {
                component: self,
                value,
                min,
                max,
            }),
            _ => Ok(value),
        }
    }

    /// Clamp a value into the component's range.
    pub fn clamp(self, value: i64) -> i64 {
        match self.bounds() {
            Some((min, max)) => value.clamp(min, max),
            None => value,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Component {
    type Err = PartialDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| PartialDateError::UnknownComponent { name: s.to_string() })
    }
}

/// Proleptic Gregorian leap year test.
pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month`. Without a year February allows 29.
pub fn days_in_month(year: Option<i64>, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => match year {
            Some(y) if !is_leap_year(y) => 28,
            _ => 29,
        },
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for c in Component::ALL {
            assert_eq!(Component::from_name(c.name()), Some(c));
            assert_eq!(c.name().parse::<Component>().unwrap(), c);
        }
        assert!(Component::from_name("week").is_none());
        assert!("week".parse::<Component>().is_err());
    }

    #[test]
    fn serde_uses_machine_names() {
        let json = serde_json::to_string(&Component::Timezone).unwrap();
        assert_eq!(json, "\"timezone\"");
        let parsed: Component = serde_json::from_str("\"minute\"").unwrap();
        assert_eq!(parsed, Component::Minute);
    }

    #[test]
    fn zero_is_valid_for_time_components() {
        assert_eq!(Component::Minute.check(0).unwrap(), 0);
        assert_eq!(Component::Hour.check(0).unwrap(), 0);
        assert!(Component::Month.check(0).is_err());
        assert!(Component::Day.check(32).is_err());
        assert!(Component::Timezone.check(1).is_err());
    }

    #[test]
    fn year_is_unbounded() {
        assert_eq!(Component::Year.check(-60_000).unwrap(), -60_000);
        assert_eq!(Component::Year.check(i64::MAX).unwrap(), i64::MAX);
    }

    #[test]
    fn kinds() {
        assert_eq!(Component::Day.kind(), ComponentKind::Date);
        assert_eq!(Component::Second.kind(), ComponentKind::Time);
        assert_eq!(Component::Timezone.kind(), ComponentKind::Time);
        assert!(!Component::Timezone.is_time_of_day());
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(Some(1900), 2), 28);
        assert_eq!(days_in_month(Some(2000), 2), 29);
        assert_eq!(days_in_month(None, 2), 29);
        assert_eq!(days_in_month(Some(2021), 4), 30);
        assert!(is_leap_year(-4));
    }
}
