//! Shapes of the two module-wide configuration objects.

use std::collections::BTreeMap;

use partial_date::{Component, FieldSettings, FormatSettings};
use serde::{Deserialize, Serialize};

/// The `partial_date.settings` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Settings new fields start from.
    pub field_defaults: FieldSettings,
    /// Overrides for the built-in component labels.
    pub component_labels: BTreeMap<Component, String>,
}

impl GlobalSettings {
    /// Display label for a component, honouring overrides.
    pub fn label(&self, component: Component) -> &str {
        self.component_labels
            .get(&component)
            .map(String::as_str)
            .unwrap_or(component.label())
    }
}

/// Everything a `partial_date.*` configuration file may hold.
///
/// ```yaml
/// settings:
///   field_defaults:
///     hide_blank_items: false
/// format:
///   date_separator: "/"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialDateConfig {
    pub settings: GlobalSettings,
    pub format: FormatSettings,
}
