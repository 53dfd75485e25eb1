//! The components form element: one checkbox per date/time component.
//!
//! The element submits a sparse map of component name to checkbox value.
//! [`normalize_input`] turns that raw submission into a [`ComponentSelection`],
//! [`ComponentsElement::process`] renders the checkboxes, and
//! [`ComponentsElement::validate`] rejects selections of components the
//! element never offered.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::component::{Component, ComponentKind};
use crate::form::{FormElement, States};
use crate::policy::{ValidationError, ValidationErrors};

/// Normalized submission: components that were set, with their raw values.
pub type ComponentSelection = BTreeMap<Component, Value>;

/// True unless the value is the unset/zero sentinel: `null`, `false`, `0`,
/// `"0"` or `""`.
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Normalize raw element input.
///
/// - `None` (nothing submitted): the default selection, entry by entry.
/// - An object: every key naming a component whose value [`is_set`].
/// - A string naming a component: that single component.
///
/// Anything else yields an empty selection. This never fails.
pub fn normalize_input(input: Option<&Value>, default: &ComponentSelection) -> ComponentSelection {
    let mut result = ComponentSelection::new();
    match input {
        None => {
            for (component, value) in default {
                result.insert(*component, value.clone());
            }
        }
        Some(Value::Object(map)) => {
            for (key, value) in map {
                let Some(component) = Component::from_name(key) else {
                    debug!(key = %key, "ignoring unknown component in element input");
                    continue;
                };
                if is_set(value) {
                    result.insert(component, value.clone());
                }
            }
        }
        Some(Value::String(name)) => {
            if let Some(component) = Component::from_name(name) {
                result.insert(component, Value::String(name.clone()));
            }
        }
        Some(other) => {
            debug!(input = %other, "element input is neither a map nor a component name");
        }
    }
    result
}

/// Configuration of one components element.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentsElement {
    options: Vec<Component>,
    show_time: bool,
    time_states: Option<States>,
    default_value: ComponentSelection,
}

impl Default for ComponentsElement {
    fn default() -> Self {
        Self {
            options: Component::ALL
                .into_iter()
                .filter(|c| *c != Component::Timezone)
                .collect(),
            show_time: true,
            time_states: None,
            default_value: ComponentSelection::new(),
        }
    }
}

impl ComponentsElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the offered components. Order is kept.
    pub fn with_options(mut self, options: impl IntoIterator<Item = Component>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    /// When false, hour, minute and second are not rendered at all.
    pub fn show_time(mut self, show_time: bool) -> Self {
        self.show_time = show_time;
        self
    }

    /// Visibility rules attached to time components.
    pub fn time_states(mut self, states: States) -> Self {
        self.time_states = Some(states);
        self
    }

    pub fn default_value(mut self, default: ComponentSelection) -> Self {
        self.default_value = default;
        self
    }

    /// Components this element renders, after the time filter.
    pub fn visible_components(&self) -> Vec<Component> {
        self.options
            .iter()
            .copied()
            .filter(|c| self.show_time || !c.is_time_of_day())
            .collect()
    }

    /// Normalize a submission against this element's default.
    pub fn value(&self, input: Option<&Value>) -> ComponentSelection {
        normalize_input(input, &self.default_value)
    }

    /// One checkbox per visible component.
    pub fn process(&self, selection: &ComponentSelection) -> Vec<FormElement> {
        self.visible_components()
            .into_iter()
            .map(|c| {
                let checked = selection.get(&c).is_some_and(is_set);
                let element = FormElement::checkbox(c.name(), c.label(), checked);
                match (&self.time_states, c.kind()) {
                    (Some(states), ComponentKind::Time) => element.states(states.clone()),
                    _ => element,
                }
            })
            .collect()
    }

    /// Every selected component must be one this element rendered.
    pub fn validate(&self, selection: &ComponentSelection) -> Result<(), ValidationErrors> {
        let visible = self.visible_components();
        let mut errors = ValidationErrors::new();
        for component in selection.keys() {
            if !visible.contains(component) {
                errors.push(ValidationError::UnexpectedComponent(*component));
            }
        }
        errors.into_result()
    }
}
