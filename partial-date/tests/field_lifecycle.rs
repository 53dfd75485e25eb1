//! End-to-end: configure a field, submit a value, save, reload, validate and display.

use partial_date::{
    Component, ComponentsElement, ConfigStore, EstimateRange, FormatSettings, MemoryConfigStore,
    PartialDateField, PartialDateFormatter, PartialDateValue, ValidationError, FORMAT_CONFIG,
    SETTINGS_CONFIG,
};
use serde_json::json;

#[test]
fn submit_save_reload_display() {
    let mut field = PartialDateField::default();
    field
        .submit_settings_form(&json!({
            "estimates": {"hour": "6|12|Morning\n18|6|Night"},
            "minimum_components": {"from_granularity_year": 1, "from_estimates_hour": 1},
            "hide_blank_items": 1
        }))
        .unwrap();

    let element = ComponentsElement::new().show_time(true);
    let from = element.value(Some(&json!({"year": "1888", "month": "11", "day": 0})));
    assert!(element.validate(&from).is_ok());

    let mut value = PartialDateValue::new();
    let night = field
        .settings()
        .estimates
        .resolve(Component::Hour, 23)
        .cloned()
        .unwrap();
    assert_eq!(night, EstimateRange::new(18, 6, "Night"));
    value.apply_estimate(Component::Hour, night).unwrap();
    value.set_txt_short(Some("A November night, 1888".into())).unwrap();

    assert!(field.validate(&value).is_err(), "year not copied from the form yet");

    let record = field.save(&mut value, &from).unwrap();
    assert_eq!(record.year, Some(1888));
    assert_eq!(record.month, Some(11));
    assert_eq!(record.day, None);
    assert_eq!(record.hour, Some(18));
    assert!(record.timestamp.is_some());

    let loaded = field.load(&record).unwrap();
    assert!(field.validate(&loaded).is_ok());
    assert!(loaded.check_approximate());
    assert!(!loaded.is_empty());

    let settings = FormatSettings {
        approximate_prefix: "c. ".into(),
        ..Default::default()
    };
    assert_eq!(PartialDateFormatter::new(&settings).format(&loaded), "c. 1888-11 Night");

    let text_first = FormatSettings {
        use_text_override: true,
        ..Default::default()
    };
    assert_eq!(
        PartialDateFormatter::new(&text_first).format(&loaded),
        "A November night, 1888"
    );
}

#[test]
fn validation_reports_each_missing_input() {
    let mut field = PartialDateField::default();
    field
        .submit_settings_form(&json!({
            "minimum_components": {
                "from_granularity_year": true,
                "from_granularity_day": true,
                "from_estimate_hour": true,
                "txt_long": true
            }
        }))
        .unwrap();

    let mut value = PartialDateValue::new();
    value.set_numeric(Component::Day, Some(12)).unwrap();

    let errors = field.validate(&value).unwrap_err();
    let mut fields: Vec<String> = errors.iter().map(ValidationError::field_name).collect();
    fields.sort();
    assert_eq!(fields, vec!["hour_estimate", "txt_long", "year"]);
    assert!(errors.for_component(Component::Day).is_empty());
}

#[test]
fn bad_settings_line_is_reported_and_isolated() {
    let mut field = PartialDateField::default();
    let errors = field
        .submit_settings_form(&json!({
            "estimates": {
                "year": "1900|1999|20th century\nnineteen|hundreds|Oops",
                "month": "3|5|Spring"
            }
        }))
        .unwrap_err();
    let year_error = errors.for_component(Component::Year).unwrap();
    assert_eq!(year_error.line_number, 2);
    assert_eq!(year_error.line, "nineteen|hundreds|Oops");

    let estimates = &field.settings().estimates;
    assert_eq!(estimates.ranges(Component::Year).len(), 7, "year kept its defaults");
    assert_eq!(estimates.ranges(Component::Month), &[EstimateRange::new(3, 5, "Spring")]);
}

#[test]
fn delete_removes_global_config_once() {
    let store = MemoryConfigStore::new();
    store.save(SETTINGS_CONFIG, &json!({"default_format": "short"})).unwrap();
    store.save(FORMAT_CONFIG, &json!({"date_separator": "/"})).unwrap();

    let field = PartialDateField::default();
    field.delete(&store).unwrap();
    field.delete(&store).unwrap();

    assert_eq!(store.load(SETTINGS_CONFIG).unwrap(), None);
    assert_eq!(store.load(FORMAT_CONFIG).unwrap(), None);
}
