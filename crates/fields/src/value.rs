//! Spreadsheet cell values and data rows.

use crate::{FieldError, Result};
use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Days between the spreadsheet epoch (1899-12-30) and 1970-01-01.
const UNIX_EPOCH_SERIAL: i64 = 25569;

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// Date serial (days since 1899-12-30, fraction = time of day)
    Date(f64),
    #[default]
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text drawn on a certificate.
    pub fn to_text(&self, locale: Locale) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Date(serial) => excel_date_to_text(*serial, locale),
            CellValue::Empty => String::new(),
        }
    }

    /// Plain string form, without date decoding.
    pub fn raw_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) | CellValue::Date(n) => n.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) | CellValue::Date(n) => serializer.serialize_f64(*n),
            CellValue::Empty => serializer.serialize_str(""),
        }
    }
}

/// One dataset record; columns keep header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataRow {
    columns: Vec<(String, CellValue)>,
}

impl DataRow {
    pub fn new() -> Self {
        Self { columns: Vec::new() }
    }

    /// Sets a column, replacing an existing value under the same name.
    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        let column = column.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut CellValue> {
        self.columns
            .iter_mut()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for DataRow {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        let mut row = DataRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl Serialize for DataRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Month names used for date text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Pl,
    En,
}

const MONTHS_PL: [&str; 12] = [
    "styczeń",
    "luty",
    "marzec",
    "kwiecień",
    "maj",
    "czerwiec",
    "lipiec",
    "sierpień",
    "wrzesień",
    "październik",
    "listopad",
    "grudzień",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Locale {
    /// Full month name, `month` in 1..=12.
    pub fn month_name(&self, month: u32) -> &'static str {
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            Locale::Pl => MONTHS_PL[idx],
            Locale::En => MONTHS_EN[idx],
        }
    }

    fn year_suffix(&self) -> &'static str {
        match self {
            Locale::Pl => " r.",
            Locale::En => "",
        }
    }
}

impl FromStr for Locale {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pl" | "pl-pl" => Ok(Locale::Pl),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            _ => Err(FieldError::UnknownLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Pl => write!(f, "pl"),
            Locale::En => write!(f, "en"),
        }
    }
}

/// Renders a date serial as `"<day> <month> <year> r."`.
///
/// The time-of-day fraction is dropped. Serials outside the calendar range
/// fall back to their decimal form.
pub fn excel_date_to_text(serial: f64, locale: Locale) -> String {
    match serial_to_date(serial) {
        Some(date) => format!(
            "{} {} {}{}",
            date.day(),
            locale.month_name(date.month()),
            date.year(),
            locale.year_suffix()
        ),
        None => serial.to_string(),
    }
}

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = (serial.floor() as i64).checked_sub(UNIX_EPOCH_SERIAL)?;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    epoch.checked_add_signed(TimeDelta::try_days(days)?)
}
