//! Partial date and time field type
//!
//! `partial-date` models date/time values where any component may be unknown
//! (year, month, day, hour, minute, second, timezone), backed by a best-guess
//! timestamp and free-text fallbacks, plus the configuration a field carries:
//! estimate ranges ("17th century", "Night") and a minimum components policy.
//!
//! # Architecture
//!
//! - **Typed components**: [`Component`] is a closed enum; every "one per
//!   component" structure iterates it rather than string keys
//! - **Presence is explicit**: absent components are `None`, never zero
//! - **Host-agnostic**: forms and schemas are returned as plain data
//!   ([`FormElement`], [`FieldSchema`]) for the host to render or migrate
//! - **Injected configuration**: module-wide objects live behind [`ConfigStore`]

pub mod component;
pub mod element;
pub mod error;
pub mod estimate;
pub mod field;
pub mod form;
pub mod format;
pub mod logging;
pub mod policy;
pub mod record;
pub mod schema;
pub mod settings;
pub mod store;
pub mod value;

pub use component::{Component, ComponentKind};
pub use element::{normalize_input, ComponentSelection, ComponentsElement};
pub use error::{ConfigurationError, ConfigurationErrorReason, PartialDateError, Result};
pub use estimate::{parse_estimate_lines, EstimateRange, EstimateTable};
pub use field::PartialDateField;
pub use form::{ElementKind, FormElement, States};
pub use format::{FormatLength, FormatSettings, PartialDateFormatter, YearDesignation};
pub use logging::Pretty;
pub use policy::{MinimumComponentsPolicy, TextField, ValidationError, ValidationErrors};
pub use record::PersistedRecord;
pub use schema::{Column, ColumnSize, ColumnType, FieldSchema, PropertyDefinition};
pub use settings::{FieldSettings, SettingsFormErrors};
pub use store::{ConfigStore, MemoryConfigStore, FORMAT_CONFIG, SETTINGS_CONFIG};
pub use value::{ComponentValues, PartialDateValue};
