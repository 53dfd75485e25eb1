//! Minimum components policy and per-component validation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::component::{days_in_month, Component};
use crate::error::join_messages;
use crate::value::PartialDateValue;

/// One of the two free-text display fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    TxtShort,
    TxtLong,
}

impl TextField {
    pub fn name(self) -> &'static str {
        match self {
            TextField::TxtShort => "txt_short",
            TextField::TxtLong => "txt_long",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TextField::TxtShort => "Short date text",
            TextField::TxtLong => "Long date text",
        }
    }

    /// Storage column length.
    pub fn max_len(self) -> usize {
        match self {
            TextField::TxtShort => 100,
            TextField::TxtLong => 255,
        }
    }
}

/// A single reason a value is incomplete or inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    MissingComponent(Component),

    #[error("an estimate for {} is required", .0.label())]
    MissingEstimate(Component),

    #[error("{} is required", .0.label())]
    MissingText(TextField),

    #[error("day {day} does not exist, the month has {max} days")]
    DayOutOfRange { day: u8, max: u8 },

    #[error("{} is not an available option", .0.label())]
    UnexpectedComponent(Component),
}

impl ValidationError {
    /// The component the error belongs to, if any.
    pub fn component(&self) -> Option<Component> {
        match self {
            ValidationError::MissingComponent(c)
            | ValidationError::MissingEstimate(c)
            | ValidationError::UnexpectedComponent(c) => Some(*c),
            ValidationError::DayOutOfRange { .. } => Some(Component::Day),
            ValidationError::MissingText(_) => None,
        }
    }

    /// Name of the form input to highlight.
    pub fn field_name(&self) -> String {
        match self {
            ValidationError::MissingEstimate(c) => format!("{}_estimate", c.name()),
            ValidationError::MissingText(t) => t.name().to_string(),
            other => other
                .component()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
        }
    }
}

/// All validation errors for one value, one entry per offending input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Errors belonging to one component.
    pub fn for_component(&self, component: Component) -> Vec<&ValidationError> {
        self.0
            .iter()
            .filter(|e| e.component() == Some(component))
            .collect()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Which inputs must be filled for a value to count as complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimumComponentsPolicy {
    pub from_granularity_year: bool,
    pub from_granularity_month: bool,
    pub from_granularity_day: bool,
    pub from_granularity_hour: bool,
    pub from_granularity_minute: bool,
    pub from_granularity_second: bool,
    pub from_granularity_timezone: bool,
    #[serde(alias = "from_estimates_year")]
    pub from_estimate_year: bool,
    #[serde(alias = "from_estimates_month")]
    pub from_estimate_month: bool,
    #[serde(alias = "from_estimates_day")]
    pub from_estimate_day: bool,
    #[serde(alias = "from_estimates_hour")]
    pub from_estimate_hour: bool,
    #[serde(alias = "from_estimates_minute")]
    pub from_estimate_minute: bool,
    #[serde(alias = "from_estimates_second")]
    pub from_estimate_second: bool,
    pub txt_short: bool,
    pub txt_long: bool,
}

impl MinimumComponentsPolicy {
    pub fn requires_component(&self, component: Component) -> bool {
        match component {
            Component::Year => self.from_granularity_year,
            Component::Month => self.from_granularity_month,
            Component::Day => self.from_granularity_day,
            Component::Hour => self.from_granularity_hour,
            Component::Minute => self.from_granularity_minute,
            Component::Second => self.from_granularity_second,
            Component::Timezone => self.from_granularity_timezone,
        }
    }

    pub fn requires_estimate(&self, component: Component) -> bool {
        match component {
            Component::Year => self.from_estimate_year,
            Component::Month => self.from_estimate_month,
            Component::Day => self.from_estimate_day,
            Component::Hour => self.from_estimate_hour,
            Component::Minute => self.from_estimate_minute,
            Component::Second => self.from_estimate_second,
            Component::Timezone => false,
        }
    }

    pub fn requires_text(&self, field: TextField) -> bool {
        match field {
            TextField::TxtShort => self.txt_short,
            TextField::TxtLong => self.txt_long,
        }
    }

    fn granularity_flag(&mut self, component: Component) -> &mut bool {
        match component {
            Component::Year => &mut self.from_granularity_year,
            Component::Month => &mut self.from_granularity_month,
            Component::Day => &mut self.from_granularity_day,
            Component::Hour => &mut self.from_granularity_hour,
            Component::Minute => &mut self.from_granularity_minute,
            Component::Second => &mut self.from_granularity_second,
            Component::Timezone => &mut self.from_granularity_timezone,
        }
    }

    fn estimate_flag(&mut self, component: Component) -> Option<&mut bool> {
        match component {
            Component::Year => Some(&mut self.from_estimate_year),
            Component::Month => Some(&mut self.from_estimate_month),
            Component::Day => Some(&mut self.from_estimate_day),
            Component::Hour => Some(&mut self.from_estimate_hour),
            Component::Minute => Some(&mut self.from_estimate_minute),
            Component::Second => Some(&mut self.from_estimate_second),
            Component::Timezone => None,
        }
    }

    /// Set a flag by its settings key. Returns false for unknown keys.
    ///
    /// Accepts both `from_estimate_<c>` and the older `from_estimates_<c>`.
    pub fn set_flag(&mut self, key: &str, enabled: bool) -> bool {
        let slot = if let Some(name) = key.strip_prefix("from_granularity_") {
            match Component::from_name(name) {
                Some(c) => Some(self.granularity_flag(c)),
                None => None,
            }
        } else if let Some(name) = key
            .strip_prefix("from_estimates_")
            .or_else(|| key.strip_prefix("from_estimate_"))
        {
            match Component::from_name(name) {
                Some(c) => self.estimate_flag(c),
                None => None,
            }
        } else {
            match key {
                "txt_short" => Some(&mut self.txt_short),
                "txt_long" => Some(&mut self.txt_long),
                _ => None,
            }
        };
        match slot {
            Some(flag) => {
                *flag = enabled;
                true
            }
            None => false,
        }
    }

    /// Every flag as `(key, enabled)` in settings-form order.
    pub fn flags(&self) -> Vec<(String, bool)> {
        let mut flags = Vec::with_capacity(15);
        for c in Component::ALL {
            flags.push((format!("from_granularity_{c}"), self.requires_component(c)));
        }
        for c in Component::NUMERIC {
            flags.push((format!("from_estimate_{c}"), self.requires_estimate(c)));
        }
        flags.push(("txt_short".to_string(), self.txt_short));
        flags.push(("txt_long".to_string(), self.txt_long));
        flags
    }

    /// Check a value against the policy, reporting each missing input.
    ///
    /// A day that does not exist in the known month is always reported,
    /// regardless of the flags.
    pub fn check(&self, value: &PartialDateValue) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for c in Component::ALL {
            if self.requires_component(c) && !value.has_component(c) {
                errors.push(ValidationError::MissingComponent(c));
            }
        }
        for c in Component::NUMERIC {
            if self.requires_estimate(c) && !value.has_component(c) && value.estimate(c).is_none() {
                errors.push(ValidationError::MissingEstimate(c));
            }
        }
        for field in [TextField::TxtShort, TextField::TxtLong] {
            if self.requires_text(field) && value.text(field).map_or(true, str::is_empty) {
                errors.push(ValidationError::MissingText(field));
            }
        }
        if let Some(error) = check_day(value) {
            errors.push(error);
        }

        if !errors.is_empty() {
            debug!(count = errors.len(), %errors, "partial date failed minimum components");
        }
        errors.into_result()
    }
}

fn check_day(value: &PartialDateValue) -> Option<ValidationError> {
    let (Some(month), Some(day)) = (value.month(), value.day()) else {
        return None;
    };
    let max = days_in_month(value.year(), month);
    (day > max).then_some(ValidationError::DayOutOfRange { day, max })
}
