//! Estimate ranges: qualitative labels for unknown component values.
//!
//! Each numeric component owns an ordered list of `start|end|label` entries.
//! Order matters, the first matching range wins when a value is resolved to
//! a label. A range whose start is greater than its end wraps past the
//! component maximum (hour `18|6` covers 18:00 through 06:00).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::component::Component;
use crate::error::{ConfigurationError, ConfigurationErrorReason, PartialDateError, Result};

/// A configured `(start, end, label)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EstimateRange {
    pub start: i64,
    pub end: i64,
    pub label: String,
}

impl EstimateRange {
    pub fn new(start: i64, end: i64, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    /// True when the range wraps past the component maximum.
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, value: i64) -> bool {
        if self.wraps() {
            value >= self.start || value <= self.end
        } else {
            value >= self.start && value <= self.end
        }
    }

    /// The `start|end` key used by settings forms.
    pub fn key(&self) -> String {
        format!("{}|{}", self.start, self.end)
    }
}

impl fmt::Display for EstimateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.start, self.end, self.label)
    }
}

/// Parse configuration text for one component, one `start|end|label` per line.
///
/// Blank lines are skipped. Year bounds parse as `i64`, every other
/// component as `i16` to match its storage column.
pub fn parse_estimate_lines(component: Component, text: &str) -> std::result::Result<Vec<EstimateRange>, ConfigurationError> {
    let mut ranges = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let fail = |reason| ConfigurationError {
            component,
            line_number: idx + 1,
            line: line.to_string(),
            reason,
        };
        if !component.is_numeric() {
            return Err(fail(ConfigurationErrorReason::NotEstimable));
        }

        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(fail(ConfigurationErrorReason::FieldCount(parts.len())));
        }
        let start = parse_bound(component, parts[0])
            .ok_or_else(|| fail(ConfigurationErrorReason::InvalidBound(parts[0].to_string())))?;
        let end = parse_bound(component, parts[1])
            .ok_or_else(|| fail(ConfigurationErrorReason::InvalidBound(parts[1].to_string())))?;
        if parts[2].is_empty() {
            return Err(fail(ConfigurationErrorReason::EmptyLabel));
        }

        trace!(%component, start, end, label = parts[2], "parsed estimate");
        ranges.push(EstimateRange::new(start, end, parts[2]));
    }
    Ok(ranges)
}

fn parse_bound(component: Component, token: &str) -> Option<i64> {
    match component {
        Component::Year => token.parse::<i64>().ok(),
        _ => token.parse::<i16>().ok().map(i64::from),
    }
}

/// Per-component estimate lists for one field instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EstimateTable {
    ranges: BTreeMap<Component, Vec<EstimateRange>>,
}

impl EstimateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table a newly created field starts with.
    pub fn defaults() -> Self {
        let mut table = Self::new();
        table.ranges.insert(
            Component::Year,
            vec![
                EstimateRange::new(-60000, 1600, "Pre-colonial"),
                EstimateRange::new(1500, 1599, "16th century"),
                EstimateRange::new(1600, 1699, "17th century"),
                EstimateRange::new(1700, 1799, "18th century"),
                EstimateRange::new(1800, 1899, "19th century"),
                EstimateRange::new(1900, 1999, "20th century"),
                EstimateRange::new(2000, 2099, "21st century"),
            ],
        );
        table.ranges.insert(
            Component::Month,
            vec![
                EstimateRange::new(11, 1, "Winter"),
                EstimateRange::new(2, 4, "Spring"),
                EstimateRange::new(5, 7, "Summer"),
                EstimateRange::new(8, 10, "Autumn"),
            ],
        );
        table.ranges.insert(
            Component::Day,
            vec![
                EstimateRange::new(0, 12, "The start of the month"),
                EstimateRange::new(10, 20, "The middle of the month"),
                EstimateRange::new(18, 31, "The end of the month"),
            ],
        );
        table.ranges.insert(
            Component::Hour,
            vec![
                EstimateRange::new(6, 18, "Day time"),
                EstimateRange::new(6, 12, "Morning"),
                EstimateRange::new(12, 13, "Noon"),
                EstimateRange::new(12, 18, "Afternoon"),
                EstimateRange::new(18, 22, "Evening"),
                EstimateRange::new(0, 1, "Midnight"),
                EstimateRange::new(18, 6, "Night"),
            ],
        );
        table.ranges.insert(Component::Minute, Vec::new());
        table.ranges.insert(Component::Second, Vec::new());
        table
    }

    /// Ranges for a component in declaration order.
    pub fn ranges(&self, component: Component) -> &[EstimateRange] {
        self.ranges.get(&component).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_ranges(&mut self, component: Component, ranges: Vec<EstimateRange>) -> Result<()> {
        if !component.is_numeric() {
            return Err(PartialDateError::NotNumeric { component });
        }
        self.ranges.insert(component, ranges);
        Ok(())
    }

    /// Parse and install the configuration text for one component.
    ///
    /// On failure the existing ranges for that component are left untouched.
    pub fn set_from_text(&mut self, component: Component, text: &str) -> std::result::Result<(), ConfigurationError> {
        let ranges = parse_estimate_lines(component, text)?;
        debug!(%component, count = ranges.len(), "estimate ranges updated");
        self.ranges.insert(component, ranges);
        Ok(())
    }

    /// Render a component's ranges back into configuration text.
    pub fn to_text(&self, component: Component) -> String {
        self.ranges(component)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First range containing `value`.
    pub fn resolve(&self, component: Component, value: i64) -> Option<&EstimateRange> {
        self.ranges(component).iter().find(|r| r.contains(value))
    }

    /// Look up a range by its `start|end` key.
    pub fn find_by_key(&self, component: Component, key: &str) -> Option<&EstimateRange> {
        self.ranges(component).iter().find(|r| r.key() == key)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.values().all(Vec::is_empty)
    }
}
