//! Property-based tests using proptest for normalization, rendering and storage.

use partial_date::element::is_set;
use partial_date::{
    normalize_input, parse_estimate_lines, Component, ComponentSelection, ComponentsElement,
    FormatSettings, PartialDateFormatter, PartialDateValue, YearDesignation,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Raw checkbox/field values as a host form might submit them.
fn raw_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!(0)),
        Just(json!("0")),
        Just(json!("")),
        Just(json!(false)),
        Just(json!(true)),
        (1i64..3000).prop_map(|n| json!(n)),
        "[a-zA-Z/_]{1,12}".prop_map(Value::String),
    ]
}

fn component_strategy() -> impl Strategy<Value = Component> {
    prop::sample::select(Component::ALL.to_vec())
}

fn raw_input_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(component_strategy(), raw_value_strategy(), 0..7).prop_map(|m| {
        m.into_iter()
            .map(|(c, v)| (c.name().to_string(), v))
            .collect::<Map<String, Value>>()
    })
}

/// Values built only through setters, so always valid.
fn value_strategy() -> impl Strategy<Value = PartialDateValue> {
    (
        prop::option::of(-100_000i64..100_000),
        prop::option::of(1i64..=12),
        prop::option::of(1i64..=31),
        prop::option::of(0i64..=23),
        prop::option::of(0i64..=59),
        prop::option::of(0i64..=59),
        prop::option::of("[A-Za-z]{1,10}/[A-Za-z_]{1,20}"),
        prop::option::of("[a-z .0-9]{0,40}"),
        any::<bool>(),
    )
        .prop_map(|(y, mo, d, h, mi, s, tz, txt, approx)| {
            let mut value = PartialDateValue::new();
            value.set_year(y).unwrap();
            value.set_numeric(Component::Month, mo).unwrap();
            value.set_numeric(Component::Day, d).unwrap();
            value.set_numeric(Component::Hour, h).unwrap();
            value.set_numeric(Component::Minute, mi).unwrap();
            value.set_numeric(Component::Second, s).unwrap();
            value.set_timezone(tz).unwrap();
            value.set_txt_short(txt).unwrap();
            value.set_check_approximate(approx);
            value.refresh_timestamp();
            value
        })
}

proptest! {
    #[test]
    fn normalize_keeps_exactly_set_keys(input in raw_input_strategy()) {
        let raw = Value::Object(input.clone());
        let result = normalize_input(Some(&raw), &ComponentSelection::new());

        let expected: Vec<Component> = input
            .iter()
            .filter(|(_, v)| is_set(v))
            .filter_map(|(k, _)| Component::from_name(k))
            .collect();
        let mut expected = expected;
        expected.sort();
        let got: Vec<Component> = result.keys().copied().collect();
        prop_assert_eq!(got, expected);
        for (c, v) in &result {
            prop_assert_eq!(Some(v), input.get(c.name()));
        }
    }

    #[test]
    fn absent_input_returns_default(
        default in prop::collection::btree_map(component_strategy(), raw_value_strategy(), 0..7)
    ) {
        prop_assert_eq!(normalize_input(None, &default), default);
    }

    #[test]
    fn hidden_time_never_rendered(input in raw_input_strategy()) {
        let element = ComponentsElement::new()
            .with_options(Component::ALL)
            .show_time(false);
        let selection = element.value(Some(&Value::Object(input)));
        for rendered in element.process(&selection) {
            prop_assert!(!["hour", "minute", "second"].contains(&rendered.key.as_str()));
        }
    }

    #[test]
    fn estimate_lines_parse_in_order(
        entries in prop::collection::vec((-60_000i64..60_000, -60_000i64..60_000, "[A-Za-z][A-Za-z ]{0,20}[A-Za-z]"), 0..8)
    ) {
        let text = entries
            .iter()
            .map(|(s, e, l)| format!("{s}|{e}|{l}"))
            .collect::<Vec<_>>()
            .join("\n");
        let ranges = parse_estimate_lines(Component::Year, &text).unwrap();
        prop_assert_eq!(ranges.len(), entries.len());
        for (range, (s, e, l)) in ranges.iter().zip(&entries) {
            prop_assert_eq!(range.start, *s);
            prop_assert_eq!(range.end, *e);
            prop_assert_eq!(&range.label, l);
        }
    }

    #[test]
    fn load_save_is_idempotent(value in value_strategy()) {
        let record = value.to_record().unwrap();
        let reloaded = PartialDateValue::from_record(&record).unwrap();
        prop_assert_eq!(&reloaded, &value);
        prop_assert_eq!(reloaded.to_record().unwrap(), record);
    }

    #[test]
    fn any_year_has_finite_timestamp_and_formats(
        year in any::<i64>(),
        month in prop::option::of(1i64..=12),
        designation in prop::sample::select(vec![
            YearDesignation::Sign,
            YearDesignation::Bce,
            YearDesignation::CeBce,
        ])
    ) {
        let mut value = PartialDateValue::new();
        value.set_year(Some(year)).unwrap();
        value.set_numeric(Component::Month, month).unwrap();

        let ts = value.refresh_timestamp().unwrap();
        prop_assert!(ts.is_finite());
        prop_assert!(value.check_approximate());

        let settings = FormatSettings {
            year_designation: designation,
            ..Default::default()
        };
        let text = PartialDateFormatter::new(&settings).format(&value);
        prop_assert!(!text.is_empty());
    }

    #[test]
    fn timestamp_or_text_decides_emptiness(value in value_strategy()) {
        let has_text = value.txt_short().is_some_and(|t| !t.is_empty());
        prop_assert_eq!(value.is_empty(), value.timestamp().is_none() && !has_text);
    }
}
