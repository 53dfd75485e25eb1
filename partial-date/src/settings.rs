//! Per-field settings and the settings-form submission handler.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::component::Component;
use crate::element::is_set;
use crate::error::{join_messages, ConfigurationError, ConfigurationErrorReason};
use crate::estimate::EstimateTable;
use crate::policy::MinimumComponentsPolicy;

/// Settings stored with each field instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub path: String,
    pub hide_blank_items: bool,
    pub estimates: EstimateTable,
    pub minimum_components: MinimumComponentsPolicy,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            path: String::new(),
            hide_blank_items: true,
            estimates: EstimateTable::defaults(),
            minimum_components: MinimumComponentsPolicy::default(),
        }
    }
}

/// Estimate lines that failed to parse during a settings submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", join_messages(.0))]
pub struct SettingsFormErrors(pub Vec<ConfigurationError>);

impl SettingsFormErrors {
    pub fn for_component(&self, component: Component) -> Option<&ConfigurationError> {
        self.0.iter().find(|e| e.component == component)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FieldSettings {
    /// Apply a settings-form submission.
    ///
    /// Recognised keys: `estimates.<component>` (multi-line `start|end|label`
    /// text), `minimum_components.<flag>`, `path` and `hide_blank_items`.
    /// Components whose estimate text fails to parse keep their previous
    /// ranges; every failure is returned, everything else is applied.
    pub fn apply_form(&mut self, form: &Value) -> Result<(), SettingsFormErrors> {
        let mut errors = Vec::new();

        if let Some(estimates) = form.get("estimates").and_then(Value::as_object) {
            for c in Component::NUMERIC {
                let Some(text) = estimates.get(c.name()) else {
                    continue;
                };
                let result = match text.as_str() {
                    Some(text) => self.estimates.set_from_text(c, text),
                    None => Err(ConfigurationError {
                        component: c,
                        line_number: 1,
                        line: text.to_string(),
                        reason: ConfigurationErrorReason::NotText,
                    }),
                };
                if let Err(e) = result {
                    warn!(component = %c, error = %e, "rejected estimate configuration");
                    errors.push(e);
                }
            }
        }

        if let Some(flags) = form.get("minimum_components").and_then(Value::as_object) {
            for (key, value) in flags {
                if !self.minimum_components.set_flag(key, is_set(value)) {
                    debug!(key = %key, "ignoring unknown minimum component flag");
                }
            }
        }

        if let Some(path) = form.get("path").and_then(Value::as_str) {
            self.path = path.to_string();
        }
        if let Some(hide) = form.get("hide_blank_items") {
            self.hide_blank_items = is_set(hide);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SettingsFormErrors(errors))
        }
    }
}
