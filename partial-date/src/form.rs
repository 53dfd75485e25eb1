//! Typed form element descriptions handed to the host for rendering.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::Component;

/// Conditional visibility rules, passed through to the host verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct States(pub Value);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Checkbox {
        value: bool,
    },
    Textarea {
        default_value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_component: Option<Component>,
    },
    Details {
        open: bool,
        children: Vec<FormElement>,
    },
}

/// One element of a form tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormElement {
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<States>,
}

impl FormElement {
    pub fn checkbox(key: impl Into<String>, title: impl Into<String>, value: bool) -> Self {
        Self::with_kind(key, title, ElementKind::Checkbox { value })
    }

    pub fn textarea(key: impl Into<String>, title: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self::with_kind(
            key,
            title,
            ElementKind::Textarea {
                default_value: default_value.into(),
                date_component: None,
            },
        )
    }

    pub fn details(key: impl Into<String>, title: impl Into<String>, children: Vec<FormElement>) -> Self {
        Self::with_kind(key, title, ElementKind::Details { open: false, children })
    }

    fn with_kind(key: impl Into<String>, title: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            description: None,
            kind,
            states: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn states(mut self, states: States) -> Self {
        self.states = Some(states);
        self
    }

    /// Tag a textarea with the component it configures.
    pub fn date_component(mut self, component: Component) -> Self {
        if let ElementKind::Textarea { date_component, .. } = &mut self.kind {
            *date_component = Some(component);
        }
        self
    }

    /// Direct child by key, for `Details` groups.
    pub fn child(&self, key: &str) -> Option<&FormElement> {
        match &self.kind {
            ElementKind::Details { children, .. } => children.iter().find(|c| c.key == key),
            _ => None,
        }
    }

    pub fn children(&self) -> &[FormElement] {
        match &self.kind {
            ElementKind::Details { children, .. } => children,
            _ => &[],
        }
    }

    /// Checkbox value, `None` for other element kinds.
    pub fn checked(&self) -> Option<bool> {
        match self.kind {
            ElementKind::Checkbox { value } => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn details_children_lookup() {
        let group = FormElement::details(
            "estimates",
            "Base estimate values",
            vec![FormElement::textarea("year", "Year range options", "1|2|x").date_component(Component::Year)],
        );
        let child = group.child("year").unwrap();
        assert!(matches!(
            child.kind,
            ElementKind::Textarea {
                date_component: Some(Component::Year),
                ..
            }
        ));
        assert!(group.child("month").is_none());
        assert_eq!(group.children().len(), 1);
    }

    #[test]
    fn checkbox_serializes_flat() {
        let el = FormElement::checkbox("hour", "Hour", true)
            .states(States(json!({"visible": {":input[name=\"time\"]": {"checked": true}}})));
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "checkbox");
        assert_eq!(json["value"], true);
        assert!(json["states"]["visible"].is_object());
        assert_eq!(el.checked(), Some(true));
    }
}
