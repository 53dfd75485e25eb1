//! Rendering partial dates for display.
//!
//! Only known components are printed. A component carrying an estimate is
//! shown by the estimate's label, and when nothing is known the free text
//! stands in.

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentKind};
use crate::policy::TextField;
use crate::value::PartialDateValue;

/// How years at or before year zero are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearDesignation {
    /// Astronomical numbering with a minus sign: `-43`.
    Sign,
    /// `44 BCE` for non-positive years, plain number otherwise.
    Bce,
    /// Always suffixed: `44 BCE`, `1066 CE`.
    CeBce,
}

/// Which text override a format uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatLength {
    Short,
    Long,
}

impl FormatLength {
    pub fn text_field(self) -> TextField {
        match self {
            FormatLength::Short => TextField::TxtShort,
            FormatLength::Long => TextField::TxtLong,
        }
    }
}

/// The `partial_date.format` configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Order of the date components. Time components are always h:m:s.
    pub date_order: Vec<Component>,
    pub date_separator: String,
    pub time_separator: String,
    pub datetime_separator: String,
    pub month_names: bool,
    pub year_designation: YearDesignation,
    pub length: FormatLength,
    /// Prefer the text override over components whenever it is set.
    pub use_text_override: bool,
    pub show_estimates: bool,
    pub show_timezone: bool,
    /// Prepended to approximate values, e.g. `"c. "`. Empty disables it.
    pub approximate_prefix: String,
    /// Stands in for an unknown component between two known ones, so year
    /// and day without a month read `1850-??-03` rather than `1850-03`.
    pub unknown_placeholder: String,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            date_order: vec![Component::Year, Component::Month, Component::Day],
            date_separator: "-".into(),
            time_separator: ":".into(),
            datetime_separator: " ".into(),
            month_names: false,
            year_designation: YearDesignation::Sign,
            length: FormatLength::Short,
            use_text_override: false,
            show_estimates: true,
            show_timezone: true,
            approximate_prefix: String::new(),
            unknown_placeholder: "??".into(),
        }
    }
}

pub struct PartialDateFormatter<'a> {
    settings: &'a FormatSettings,
}

impl<'a> PartialDateFormatter<'a> {
    pub fn new(settings: &'a FormatSettings) -> Self {
        Self { settings }
    }

    pub fn format(&self, value: &PartialDateValue) -> String {
        let s = self.settings;
        let own_text = value.text(s.length.text_field()).filter(|t| !t.is_empty());
        if s.use_text_override {
            if let Some(text) = own_text {
                return text.to_string();
            }
        }

        let date = s
            .date_order
            .iter()
            .filter(|c| c.kind() == ComponentKind::Date)
            .map(|&c| self.piece(value, c));
        let time = Component::TIME_OF_DAY.iter().map(|&c| self.piece(value, c));

        let parts: Vec<String> = [
            self.run(date, &s.date_separator),
            self.run(time, &s.time_separator),
        ]
        .into_iter()
        .flatten()
        .collect();
        let mut out = parts.join(s.datetime_separator.as_str());

        if out.is_empty() {
            let other = match s.length {
                FormatLength::Short => TextField::TxtLong,
                FormatLength::Long => TextField::TxtShort,
            };
            return own_text
                .or_else(|| value.text(other).filter(|t| !t.is_empty()))
                .unwrap_or_default()
                .to_string();
        }

        if s.show_timezone {
            if let Some(tz) = value.timezone() {
                out.push(' ');
                out.push_str(tz);
            }
        }
        if value.check_approximate() && !s.approximate_prefix.is_empty() {
            out.insert_str(0, &s.approximate_prefix);
        }
        out
    }

    /// Join the known pieces of one run, trimming unknown ends and filling
    /// interior gaps with the placeholder. `None` when nothing is known.
    fn run(&self, pieces: impl Iterator<Item = Option<String>>, separator: &str) -> Option<String> {
        let pieces: Vec<Option<String>> = pieces.collect();
        let first = pieces.iter().position(Option::is_some)?;
        let last = pieces.iter().rposition(Option::is_some)?;
        let joined: Vec<&str> = pieces[first..=last]
            .iter()
            .map(|p| p.as_deref().unwrap_or(self.settings.unknown_placeholder.as_str()))
            .collect();
        Some(joined.join(separator))
    }

    fn piece(&self, value: &PartialDateValue, component: Component) -> Option<String> {
        if self.settings.show_estimates {
            if let Some(estimate) = value.estimate(component) {
                return Some(estimate.label.clone());
            }
        }
        let n = value.numeric(component)?;
        Some(match component {
            Component::Year => self.year(n),
            Component::Month if self.settings.month_names => u8::try_from(n)
                .ok()
                .and_then(|m| chrono::Month::try_from(m).ok())
                .map(|m| m.name().to_string())
                .unwrap_or_else(|| n.to_string()),
            _ => format!("{n:02}"),
        })
    }

    fn year(&self, year: i64) -> String {
        match self.settings.year_designation {
            YearDesignation::Sign => year.to_string(),
            YearDesignation::Bce if year <= 0 => format!("{} BCE", 1 - i128::from(year)),
            YearDesignation::Bce => year.to_string(),
            YearDesignation::CeBce if year <= 0 => format!("{} BCE", 1 - i128::from(year)),
            YearDesignation::CeBce => format!("{year} CE"),
        }
    }
}
