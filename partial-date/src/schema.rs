//! Storage schema and typed property definitions for the field type.
//!
//! Column names here are the persistence contract; renaming one requires a
//! data migration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::Component;
use crate::policy::TextField;
use crate::value::TIMEZONE_MAX_LEN;

/// Storage size hint for numeric and blob columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSize {
    Small,
    Normal,
    Big,
}

/// The type of a storage column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnType {
    Float { size: ColumnSize },
    Int { size: ColumnSize },
    Varchar { length: usize },
    Blob { size: ColumnSize, serialize: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(flatten)]
    pub column_type: ColumnType,
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
}

/// Columns and indexes for one partial date field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
}

impl FieldSchema {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Build the storage schema.
///
/// All components are stored separately rather than packed into one value so
/// each can be queried on its own. The timestamp is a big float to cover
/// dates far outside any integer epoch.
pub fn field_schema() -> FieldSchema {
    let mut columns = vec![
        Column {
            name: "timestamp".into(),
            column_type: ColumnType::Float {
                size: ColumnSize::Big,
            },
            nullable: true,
            default: None,
            description: "The calculated timestamp for a date stored in UTC as a float for unlimited date range support.".into(),
        },
        Column {
            name: TextField::TxtShort.name().into(),
            column_type: ColumnType::Varchar {
                length: TextField::TxtShort.max_len(),
            },
            nullable: true,
            default: None,
            description: "An editable display field for this date for the short format.".into(),
        },
        Column {
            name: TextField::TxtLong.name().into(),
            column_type: ColumnType::Varchar {
                length: TextField::TxtLong.max_len(),
            },
            nullable: true,
            default: None,
            description: "An editable display field for this date for the long format.".into(),
        },
        Column {
            name: "data".into(),
            column_type: ColumnType::Blob {
                size: ColumnSize::Big,
                serialize: true,
            },
            nullable: true,
            default: None,
            description: "Serialized settings: the approximate flag and selected estimates.".into(),
        },
    ];

    for c in Component::ALL {
        let column_type = match c {
            Component::Timezone => ColumnType::Varchar {
                length: TIMEZONE_MAX_LEN,
            },
            Component::Year => ColumnType::Int {
                size: ColumnSize::Big,
            },
            _ => ColumnType::Int {
                size: ColumnSize::Small,
            },
        };
        let description = match c {
            Component::Timezone => format!("The {} for the time component.", c.label()),
            _ => format!("The {} for the starting date component.", c.label()),
        };
        columns.push(Column {
            name: c.name().into(),
            column_type,
            nullable: true,
            default: Some(Value::Null),
            description,
        });
    }

    FieldSchema {
        columns,
        indexes: vec![Index {
            name: "timestamp".into(),
            columns: vec!["timestamp".into()],
        }],
    }
}

/// Data type of a typed property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Float,
    String,
    Integer,
    Boolean,
    Map,
}

/// A property exposed on a field item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub data_type: DataType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Derived at runtime, not stored in its own column.
    #[serde(default)]
    pub computed: bool,
}

impl PropertyDefinition {
    fn new(name: &str, data_type: DataType, label: &str) -> Self {
        Self {
            name: name.into(),
            data_type,
            label: label.into(),
            description: None,
            computed: false,
        }
    }

    fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn computed(mut self) -> Self {
        self.computed = true;
        self
    }
}

pub fn property_definitions() -> Vec<PropertyDefinition> {
    let mut props = vec![
        PropertyDefinition::new("timestamp", DataType::Float, "Timestamp")
            .description("Contains best approximation for date value"),
        PropertyDefinition::new("txt_short", DataType::String, "Short text"),
        PropertyDefinition::new("txt_long", DataType::String, "Long text"),
    ];
    for c in Component::ALL {
        props.push(match c {
            Component::Timezone => PropertyDefinition::new(c.name(), DataType::String, c.label()),
            _ => PropertyDefinition::new(c.name(), DataType::Integer, c.label())
                .description(format!("The {} for the starting date component.", c.label())),
        });
    }
    props.push(PropertyDefinition::new("check_approximate", DataType::Boolean, "Check approximate").computed());
    props.push(PropertyDefinition::new("from", DataType::Map, "From").computed());
    props.push(PropertyDefinition::new("data", DataType::Map, "Data"));
    props
}
