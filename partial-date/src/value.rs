//! The partial date value: optional components, a best-guess timestamp and
//! free-text fallbacks.
//!
//! Every component is an `Option`, so "unknown" and "zero" never collide.
//! Fields are private and only change through setters that check ranges and
//! column lengths, which keeps a value valid at all times.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use crate::component::{days_in_month, Component};
use crate::error::{PartialDateError, Result};
use crate::estimate::EstimateRange;
use crate::policy::TextField;

/// Submitted component values keyed by component, e.g. `{year: 1888, month: "11"}`.
///
/// Shares its shape with [`crate::ComponentSelection`], but holds the values
/// themselves rather than checkbox state.
pub type ComponentValues = BTreeMap<Component, Value>;

/// Maximum length of a timezone identifier.
pub const TIMEZONE_MAX_LEN: usize = 50;

const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_YEAR: f64 = 365.2425;

/// A date/time value where any component may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialDateValue {
    year: Option<i64>,
    month: Option<u8>,
    day: Option<u8>,
    hour: Option<u8>,
    minute: Option<u8>,
    second: Option<u8>,
    timezone: Option<String>,
    timestamp: Option<f64>,
    txt_short: Option<String>,
    txt_long: Option<String>,
    #[serde(default)]
    check_approximate: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    estimates: BTreeMap<Component, EstimateRange>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    data: Map<String, Value>,
}

impl PartialDateValue {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Components ---

    pub fn year(&self) -> Option<i64> {
        self.year
    }

    pub fn month(&self) -> Option<u8> {
        self.month
    }

    pub fn day(&self) -> Option<u8> {
        self.day
    }

    pub fn hour(&self) -> Option<u8> {
        self.hour
    }

    pub fn minute(&self) -> Option<u8> {
        self.minute
    }

    pub fn second(&self) -> Option<u8> {
        self.second
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    /// Numeric component value. Always `None` for timezone.
    pub fn numeric(&self, component: Component) -> Option<i64> {
        match component {
            Component::Year => self.year,
            Component::Month => self.month.map(i64::from),
            Component::Day => self.day.map(i64::from),
            Component::Hour => self.hour.map(i64::from),
            Component::Minute => self.minute.map(i64::from),
            Component::Second => self.second.map(i64::from),
            Component::Timezone => None,
        }
    }

    pub fn has_component(&self, component: Component) -> bool {
        match component {
            Component::Timezone => self.timezone.is_some(),
            c => self.numeric(c).is_some(),
        }
    }

    pub fn set_year(&mut self, year: Option<i64>) -> Result<()> {
        self.set_numeric(Component::Year, year)
    }

    /// Set or clear a numeric component, rejecting out-of-range values.
    pub fn set_numeric(&mut self, component: Component, value: Option<i64>) -> Result<()> {
        let checked = value.map(|v| component.check(v)).transpose()?;
        // bounds() guarantees everything but the year fits in a u8
        let small = checked.and_then(|v| u8::try_from(v).ok());
        match component {
            Component::Year => self.year = checked,
            Component::Month => self.month = small,
            Component::Day => self.day = small,
            Component::Hour => self.hour = small,
            Component::Minute => self.minute = small,
            Component::Second => self.second = small,
            Component::Timezone => return Err(PartialDateError::NotNumeric { component }),
        }
        Ok(())
    }

    /// Set or clear the timezone. An empty identifier clears it.
    pub fn set_timezone(&mut self, timezone: Option<String>) -> Result<()> {
        let timezone = timezone.filter(|tz| !tz.is_empty());
        if let Some(tz) = &timezone {
            check_len("timezone", tz, TIMEZONE_MAX_LEN)?;
        }
        self.timezone = timezone;
        Ok(())
    }

    /// Set a component from a loosely typed form value.
    ///
    /// Numbers and numeric strings are accepted for numeric components,
    /// strings for timezone. `null` clears the component.
    pub fn set_component(&mut self, component: Component, value: &Value) -> Result<()> {
        let invalid = || PartialDateError::InvalidComponentValue {
            component,
            value: value.clone(),
        };
        if value.is_null() {
            return match component {
                Component::Timezone => self.set_timezone(None),
                c => self.set_numeric(c, None),
            };
        }
        match component {
            Component::Timezone => {
                let tz = value.as_str().ok_or_else(invalid)?;
                self.set_timezone(Some(tz.to_string()))
            }
            c => {
                let number = match value {
                    Value::Number(n) => n.as_i64(),
                    Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                }
                .ok_or_else(invalid)?;
                self.set_numeric(c, Some(number))
            }
        }
    }

    // --- Timestamp and flags ---

    pub fn timestamp(&self) -> Option<f64> {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: Option<f64>) -> Result<()> {
        if let Some(ts) = timestamp {
            if !ts.is_finite() {
                return Err(PartialDateError::InvalidTimestamp(ts));
            }
        }
        self.timestamp = timestamp;
        Ok(())
    }

    pub fn check_approximate(&self) -> bool {
        self.check_approximate
    }

    pub fn set_check_approximate(&mut self, approximate: bool) {
        self.check_approximate = approximate;
    }

    // --- Text ---

    pub fn txt_short(&self) -> Option<&str> {
        self.txt_short.as_deref()
    }

    pub fn txt_long(&self) -> Option<&str> {
        self.txt_long.as_deref()
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::TxtShort => self.txt_short(),
            TextField::TxtLong => self.txt_long(),
        }
    }

    pub fn set_txt_short(&mut self, text: Option<String>) -> Result<()> {
        self.set_text(TextField::TxtShort, text)
    }

    pub fn set_txt_long(&mut self, text: Option<String>) -> Result<()> {
        self.set_text(TextField::TxtLong, text)
    }

    pub fn set_text(&mut self, field: TextField, text: Option<String>) -> Result<()> {
        if let Some(t) = &text {
            check_len(field.name(), t, field.max_len())?;
        }
        match field {
            TextField::TxtShort => self.txt_short = text,
            TextField::TxtLong => self.txt_long = text,
        }
        Ok(())
    }

    // --- Estimates ---

    pub fn estimate(&self, component: Component) -> Option<&EstimateRange> {
        self.estimates.get(&component)
    }

    pub fn estimates(&self) -> &BTreeMap<Component, EstimateRange> {
        &self.estimates
    }

    /// Record an estimate for a component.
    ///
    /// When the component has no exact value it is filled with the range
    /// start, clamped into the component's range, and the value is marked
    /// approximate.
    pub fn apply_estimate(&mut self, component: Component, range: EstimateRange) -> Result<()> {
        if !component.is_numeric() {
            return Err(PartialDateError::NotNumeric { component });
        }
        if self.numeric(component).is_none() {
            self.set_numeric(component, Some(component.clamp(range.start)))?;
            self.check_approximate = true;
        }
        trace!(%component, range = %range, "estimate applied");
        self.estimates.insert(component, range);
        Ok(())
    }

    pub fn clear_estimate(&mut self, component: Component) -> Option<EstimateRange> {
        self.estimates.remove(&component)
    }

    // --- Extra blob data ---

    /// Blob entries that are not modelled as fields.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    // --- Predicates ---

    /// Empty means no timestamp and no non-empty text.
    ///
    /// Components without a computed timestamp do not make a value non-empty.
    pub fn is_empty(&self) -> bool {
        self.timestamp.is_none()
            && self.txt_short.as_deref().map_or(true, str::is_empty)
            && self.txt_long.as_deref().map_or(true, str::is_empty)
    }

    /// True when the user supplied anything: a numeric component, an
    /// estimate or text.
    pub fn has_input(&self) -> bool {
        Component::NUMERIC.iter().any(|&c| self.numeric(c).is_some())
            || !self.estimates.is_empty()
            || self.txt_short.as_deref().is_some_and(|t| !t.is_empty())
            || self.txt_long.as_deref().is_some_and(|t| !t.is_empty())
    }

    // --- Timestamp estimation ---

    /// Earliest UTC instant consistent with the known components.
    ///
    /// Needs at least a year. Missing month/day become 1, missing time fields
    /// 0, and a day past the end of the month is pulled back to its last day.
    /// Years outside chrono's range use a mean Gregorian year.
    pub fn best_guess_timestamp(&self) -> Option<f64> {
        let year = self.year?;
        let month = self.month.unwrap_or(1);
        let day = self.day.unwrap_or(1).min(days_in_month(Some(year), month));
        let hour = u32::from(self.hour.unwrap_or(0));
        let minute = u32::from(self.minute.unwrap_or(0));
        let second = u32::from(self.second.unwrap_or(0));

        let exact = i32::try_from(year)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, u32::from(month), u32::from(day)))
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .map(|dt| dt.and_utc().timestamp() as f64);
        if exact.is_some() {
            return exact;
        }

        let days_before_month: u32 = (1..month).map(|m| u32::from(days_in_month(Some(year), m))).sum();
        let day_offset = f64::from(days_before_month + u32::from(day) - 1);
        let seconds_of_day = f64::from(hour * 3600 + minute * 60 + second);
        // in f64, the year span is the whole i64 range
        let years = year as f64 - 1970.0;
        Some(years * DAYS_PER_YEAR * SECONDS_PER_DAY + day_offset * SECONDS_PER_DAY + seconds_of_day)
    }

    /// True when the best guess had to fill in a missing component below the
    /// year, or an estimate stands in for a component.
    pub fn is_guessed(&self) -> bool {
        Component::NUMERIC.iter().any(|&c| self.numeric(c).is_none()) || !self.estimates.is_empty()
    }

    /// Recompute and store the best-guess timestamp.
    ///
    /// A guessed timestamp marks the value approximate. An exact one leaves
    /// the flag as the user set it.
    pub fn refresh_timestamp(&mut self) -> Option<f64> {
        self.timestamp = self.best_guess_timestamp();
        if self.timestamp.is_some() && self.is_guessed() {
            self.check_approximate = true;
        }
        self.timestamp
    }

    pub(crate) fn take_blob_fields(&mut self, mut data: Map<String, Value>) -> Result<()> {
        if let Some(flag) = data.remove(BLOB_CHECK_APPROXIMATE) {
            self.check_approximate = flag.as_bool().unwrap_or(false);
        }
        if let Some(estimates) = data.remove(BLOB_ESTIMATES) {
            self.estimates = serde_json::from_value(estimates)?;
        }
        self.data = data;
        Ok(())
    }

    pub(crate) fn blob_fields(&self) -> Result<Map<String, Value>> {
        let mut data = self.data.clone();
        data.insert(BLOB_CHECK_APPROXIMATE.to_string(), Value::Bool(self.check_approximate));
        if !self.estimates.is_empty() {
            data.insert(BLOB_ESTIMATES.to_string(), serde_json::to_value(&self.estimates)?);
        }
        Ok(data)
    }
}

/// Blob key holding the approximate flag.
pub const BLOB_CHECK_APPROXIMATE: &str = "check_approximate";
/// Blob key holding the selected estimates.
pub const BLOB_ESTIMATES: &str = "estimates";

fn check_len(field: &'static str, text: &str, max: usize) -> Result<()> {
    let len = text.chars().count();
    if len > max {
        return Err(PartialDateError::TextTooLong { field, len, max });
    }
    Ok(())
}
