//! The `partial_date` field type.
//!
//! Ties the pieces together for a host framework: the storage schema,
//! the settings form, load/save marshalling and the delete hook.

use serde_json::Value;
use tracing::{debug, info};

use crate::component::Component;
use crate::error::Result;
use crate::form::FormElement;
use crate::logging::Pretty;
use crate::policy::{TextField, ValidationErrors};
use crate::record::PersistedRecord;
use crate::schema::{self, FieldSchema, PropertyDefinition};
use crate::settings::{FieldSettings, SettingsFormErrors};
use crate::store::{ConfigStore, FORMAT_CONFIG, SETTINGS_CONFIG};
use crate::value::{ComponentValues, PartialDateValue};

/// Plugin identifier.
pub const FIELD_TYPE_ID: &str = "partial_date";
pub const FIELD_TYPE_LABEL: &str = "Partial date and time";
pub const FIELD_TYPE_DESCRIPTION: &str = "This field stores and renders partial dates.";
pub const DEFAULT_WIDGET: &str = "partial_date_widget";
pub const DEFAULT_FORMATTER: &str = "partial_date_formatter";

const ESTIMATES_DESCRIPTION: &str = "These fields provide options for additional fields that can be used to represent corresponding date / time components. They define time periods where an event occurred when exact details are unknown. All of these fields have the format \"start|end|label\", one per line, where start marks when this period started, end marks the end of the period and the label is shown to the user. Formatters replace the corresponding date / time component with the label.";
const MINIMUM_COMPONENTS_DESCRIPTION: &str = "These are used to determine if the field is incomplete during validation.";

/// A configured partial date field instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialDateField {
    settings: FieldSettings,
}

impl PartialDateField {
    pub fn new(settings: FieldSettings) -> Self {
        Self { settings }
    }

    pub fn default_settings() -> FieldSettings {
        FieldSettings::default()
    }

    pub fn schema() -> FieldSchema {
        schema::field_schema()
    }

    pub fn property_definitions() -> Vec<PropertyDefinition> {
        schema::property_definitions()
    }

    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    /// Build the settings form for the current settings.
    pub fn settings_form(&self) -> Vec<FormElement> {
        let estimates = Component::NUMERIC
            .into_iter()
            .map(|c| {
                FormElement::textarea(
                    c.name(),
                    format!("{} range options", c.label()),
                    self.settings.estimates.to_text(c),
                )
                .description("Provide relative approximations for this date / time component.")
                .date_component(c)
            })
            .collect();

        let mut minimum = Vec::new();
        for (key, enabled) in self.settings.minimum_components.flags() {
            minimum.push(FormElement::checkbox(key.clone(), flag_title(&key), enabled));
        }

        vec![
            FormElement::details("estimates", "Base estimate values", estimates).description(ESTIMATES_DESCRIPTION),
            FormElement::details("minimum_components", "Minimum components", minimum)
                .description(MINIMUM_COMPONENTS_DESCRIPTION),
        ]
    }

    /// Apply a settings-form submission to this field.
    pub fn submit_settings_form(&mut self, form: &Value) -> std::result::Result<(), SettingsFormErrors> {
        let result = self.settings.apply_form(form);
        debug!(settings = %Pretty(&self.settings), "field settings submitted");
        result
    }

    /// Check a value against the field's minimum components.
    pub fn validate(&self, value: &PartialDateValue) -> std::result::Result<(), ValidationErrors> {
        self.settings.minimum_components.check(value)
    }

    /// Copy the submitted `from` component values onto the value.
    ///
    /// `from` holds values such as `1888` or `"11"`, not the checkbox
    /// booleans produced by [`crate::ComponentsElement::value`]; a `true`
    /// is rejected as [`crate::PartialDateError::InvalidComponentValue`].
    /// The approximate flag reaches the blob through the record itself.
    pub fn pre_save(&self, value: &mut PartialDateValue, from: &ComponentValues) -> Result<()> {
        for (component, raw) in from {
            value.set_component(*component, raw)?;
        }
        Ok(())
    }

    /// Prepare a value and produce the row to persist.
    ///
    /// The timestamp is recomputed whenever `from` changed a component, and
    /// kept only when the host set it on an otherwise untouched value.
    pub fn save(&self, value: &mut PartialDateValue, from: &ComponentValues) -> Result<PersistedRecord> {
        self.pre_save(value, from)?;
        if !from.is_empty() || value.timestamp().is_none() {
            value.refresh_timestamp();
        }
        let record = value.to_record()?;
        debug!(record = %Pretty(&record), "partial date saved");
        Ok(record)
    }

    pub fn load(&self, record: &PersistedRecord) -> Result<PartialDateValue> {
        PartialDateValue::from_record(record)
    }

    /// Delete hook: removes the module-wide configuration objects.
    ///
    /// Objects that are already gone are skipped, so calling this twice is fine.
    pub fn delete(&self, store: &dyn ConfigStore) -> Result<()> {
        for name in [SETTINGS_CONFIG, FORMAT_CONFIG] {
            if store.delete(name)? {
                info!(config = name, "deleted partial date configuration");
            }
        }
        Ok(())
    }
}

fn flag_title(key: &str) -> String {
    if let Some(c) = key.strip_prefix("from_granularity_").and_then(Component::from_name) {
        return c.label().to_string();
    }
    if let Some(c) = key.strip_prefix("from_estimate_").and_then(Component::from_name) {
        return format!("Estimate {}", c.label());
    }
    match key {
        "txt_short" => TextField::TxtShort.label().to_string(),
        "txt_long" => TextField::TxtLong.label().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ElementKind;
    use crate::store::MemoryConfigStore;
    use serde_json::json;
    use tracing_test::traced_test;

    #[test]
    fn settings_form_shape() {
        let field = PartialDateField::default();
        let form = field.settings_form();
        assert_eq!(form.len(), 2);

        let estimates = &form[0];
        assert_eq!(estimates.key, "estimates");
        assert_eq!(estimates.children().len(), 6);
        let hour = estimates.child("hour").unwrap();
        assert_eq!(hour.title, "Hour range options");
        match &hour.kind {
            ElementKind::Textarea {
                default_value,
                date_component,
            } => {
                assert!(default_value.ends_with("18|6|Night"));
                assert_eq!(*date_component, Some(Component::Hour));
            }
            other => panic!("expected textarea, got {other:?}"),
        }

        let minimum = &form[1];
        assert_eq!(minimum.children().len(), 15);
        assert_eq!(minimum.child("from_estimate_year").unwrap().title, "Estimate Year");
        assert_eq!(minimum.child("txt_long").unwrap().title, "Long date text");
        assert_eq!(minimum.child("from_granularity_timezone").unwrap().checked(), Some(false));
    }

    #[test]
    fn pre_save_copies_from_without_touching_blob() {
        let field = PartialDateField::default();
        let mut value = PartialDateValue::new();
        value.set_check_approximate(true);
        let mut from = ComponentValues::new();
        from.insert(Component::Year, json!(1789));
        from.insert(Component::Month, json!("7"));

        field.pre_save(&mut value, &from).unwrap();
        assert_eq!(value.year(), Some(1789));
        assert_eq!(value.month(), Some(7));
        assert!(value.data().is_empty());
    }

    #[test]
    fn save_then_load_returns_same_value() {
        let field = PartialDateField::default();
        let mut value = PartialDateValue::new();
        value.set_check_approximate(true);
        let mut from = ComponentValues::new();
        from.insert(Component::Year, json!(1789));

        let record = field.save(&mut value, &from).unwrap();
        let data: serde_json::Value = serde_json::from_str(record.data.as_deref().unwrap()).unwrap();
        assert_eq!(data["check_approximate"], json!(true));
        assert_eq!(field.load(&record).unwrap(), value);
    }

    #[test]
    fn pre_save_rejects_checkbox_selection() {
        let field = PartialDateField::default();
        let mut from = ComponentValues::new();
        from.insert(Component::Year, json!(true));
        assert!(matches!(
            field.pre_save(&mut PartialDateValue::new(), &from),
            Err(crate::PartialDateError::InvalidComponentValue { component: Component::Year, .. })
        ));
    }

    #[test]
    fn edited_value_gets_fresh_timestamp() {
        let field = PartialDateField::default();
        let mut from = ComponentValues::new();
        from.insert(Component::Year, json!(1970));
        let record = field.save(&mut PartialDateValue::new(), &from).unwrap();
        assert_eq!(record.timestamp, Some(0.0));

        let mut loaded = field.load(&record).unwrap();
        let mut edit = ComponentValues::new();
        edit.insert(Component::Year, json!(2000));
        let record = field.save(&mut loaded, &edit).unwrap();
        assert_eq!(record.year, Some(2000));
        assert_eq!(record.timestamp, Some(946_684_800.0));
    }

    #[test]
    fn untouched_value_keeps_host_timestamp() {
        let field = PartialDateField::default();
        let mut value = PartialDateValue::new();
        value.set_year(Some(1970)).unwrap();
        value.set_timestamp(Some(42.0)).unwrap();
        let record = field.save(&mut value, &ComponentValues::new()).unwrap();
        assert_eq!(record.timestamp, Some(42.0));
    }

    #[test]
    fn pre_save_rejects_bad_component() {
        let field = PartialDateField::default();
        let mut from = ComponentValues::new();
        from.insert(Component::Hour, json!(25));
        assert!(field.pre_save(&mut PartialDateValue::new(), &from).is_err());
    }

    #[test]
    fn save_computes_timestamp_and_load_restores() {
        let field = PartialDateField::default();
        let mut value = PartialDateValue::new();
        let mut from = ComponentValues::new();
        from.insert(Component::Year, json!(1970));
        from.insert(Component::Day, json!(2));

        let record = field.save(&mut value, &from).unwrap();
        assert_eq!(record.timestamp, Some(86_400.0));
        assert_eq!(record.year, Some(1970));
        assert_eq!(record.day, Some(2));

        let loaded = field.load(&record).unwrap();
        assert_eq!(loaded.timestamp(), Some(86_400.0));
        assert_eq!(loaded.to_record().unwrap(), record);
    }

    #[test]
    fn delete_is_idempotent() {
        let store = MemoryConfigStore::new();
        store.save(SETTINGS_CONFIG, &json!({})).unwrap();
        store.save(FORMAT_CONFIG, &json!({})).unwrap();
        store.save("other.config", &json!({})).unwrap();

        let field = PartialDateField::default();
        field.delete(&store).unwrap();
        assert!(!store.contains(SETTINGS_CONFIG));
        assert!(!store.contains(FORMAT_CONFIG));
        assert!(store.contains("other.config"));

        field.delete(&store).unwrap();
    }

    #[test]
    #[traced_test]
    fn delete_logs_only_existing_objects() {
        let store = MemoryConfigStore::new();
        store.save(FORMAT_CONFIG, &json!({})).unwrap();

        PartialDateField::default().delete(&store).unwrap();
        assert!(logs_contain("deleted partial date configuration"));
        assert!(logs_contain("partial_date.format"));
        assert!(logs_contain("existed=false"));
    }

    #[test]
    fn validate_uses_policy() {
        let mut field = PartialDateField::default();
        field
            .submit_settings_form(&json!({"minimum_components": {"from_granularity_year": true}}))
            .unwrap();
        let errors = field.validate(&PartialDateValue::new()).unwrap_err();
        assert_eq!(errors.for_component(Component::Year).len(), 1);
    }
}
