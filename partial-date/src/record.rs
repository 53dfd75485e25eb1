//! The flat storage row and its conversion to and from [`PartialDateValue`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use crate::component::Component;
use crate::error::Result;
use crate::value::PartialDateValue;

/// One persisted partial date, one field per storage column.
///
/// Every column may be null when loaded. Column names are the storage
/// contract, see [`crate::schema::field_schema`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub timestamp: Option<f64>,
    pub txt_short: Option<String>,
    pub txt_long: Option<String>,
    pub year: Option<i64>,
    pub month: Option<i16>,
    pub day: Option<i16>,
    pub hour: Option<i16>,
    pub minute: Option<i16>,
    pub second: Option<i16>,
    pub timezone: Option<String>,
    /// Serialized settings blob (JSON object).
    pub data: Option<String>,
}

impl PersistedRecord {
    /// A small-int column by component. Year and timezone are not small ints.
    fn small(&self, component: Component) -> Option<i16> {
        match component {
            Component::Month => self.month,
            Component::Day => self.day,
            Component::Hour => self.hour,
            Component::Minute => self.minute,
            Component::Second => self.second,
            Component::Year | Component::Timezone => None,
        }
    }

    fn small_mut(&mut self, component: Component) -> Option<&mut Option<i16>> {
        match component {
            Component::Month => Some(&mut self.month),
            Component::Day => Some(&mut self.day),
            Component::Hour => Some(&mut self.hour),
            Component::Minute => Some(&mut self.minute),
            Component::Second => Some(&mut self.second),
            Component::Year | Component::Timezone => None,
        }
    }
}

impl PartialDateValue {
    /// Build a value from a loaded row.
    ///
    /// Out-of-range columns and a malformed blob are errors; a missing blob
    /// is treated as empty.
    pub fn from_record(record: &PersistedRecord) -> Result<Self> {
        let mut value = PartialDateValue::new();
        value.set_timestamp(record.timestamp)?;
        value.set_txt_short(record.txt_short.clone())?;
        value.set_txt_long(record.txt_long.clone())?;
        value.set_year(record.year)?;
        for c in [
            Component::Month,
            Component::Day,
            Component::Hour,
            Component::Minute,
            Component::Second,
        ] {
            value.set_numeric(c, record.small(c).map(i64::from))?;
        }
        value.set_timezone(record.timezone.clone())?;

        let data = match record.data.as_deref() {
            Some(blob) if !blob.is_empty() => serde_json::from_str::<Map<String, Value>>(blob)?,
            _ => Map::new(),
        };
        value.take_blob_fields(data)?;
        trace!(year = ?value.year(), "partial date loaded from record");
        Ok(value)
    }

    /// Produce the row to persist, including the serialized blob.
    pub fn to_record(&self) -> Result<PersistedRecord> {
        let mut record = PersistedRecord {
            timestamp: self.timestamp(),
            txt_short: self.txt_short().map(str::to_string),
            txt_long: self.txt_long().map(str::to_string),
            year: self.year(),
            timezone: self.timezone().map(str::to_string),
            data: Some(serde_json::to_string(&self.blob_fields()?)?),
            ..Default::default()
        };
        for c in [
            Component::Month,
            Component::Day,
            Component::Hour,
            Component::Minute,
            Component::Second,
        ] {
            if let Some(slot) = record.small_mut(c) {
                // component ranges all fit in an i16
                *slot = self.numeric(c).and_then(|v| i16::try_from(v).ok());
            }
        }
        Ok(record)
    }
}
