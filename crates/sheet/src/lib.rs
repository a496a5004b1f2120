//! Spreadsheet datasets: the first worksheet of a workbook as ordered rows.

mod headers;

pub use headers::field_keys;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use certyfikaty_fields::{CellValue, DataRow, ValueResolver};
use serde::Serialize;
use std::io::Cursor;

/// Rows shown by [`Dataset::preview_json`].
pub const PREVIEW_ROWS: usize = 10;

pub type Result<T> = std::result::Result<T, SheetError>;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("failed to open workbook: {0}")]
    Open(#[from] calamine::Error),
    #[error("workbook has no worksheets")]
    NoSheets,
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Header names plus one [`DataRow`] per non-blank record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<DataRow>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<DataRow>) -> Self {
        Self { headers, rows }
    }

    /// Parses workbook bytes (xlsx, xlsm, xlsb, xls or ods).
    pub fn from_workbook_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let sheet_names = workbook.sheet_names();
        let range = workbook.worksheet_range_at(0).ok_or(SheetError::NoSheets)??;

        let dataset = Self::from_range(&range);
        log::info!(
            "[Sheet] sheet {:?}: {} columns, {} rows",
            sheet_names.first().map(String::as_str).unwrap_or(""),
            dataset.headers.len(),
            dataset.rows.len()
        );
        Ok(dataset)
    }

    /// Builds rows from a cell range whose first row is the header.
    pub fn from_range(range: &Range<Data>) -> Self {
        let mut rows_iter = range.rows();
        let headers = match rows_iter.next() {
            Some(header_row) => header_names(header_row),
            None => return Self::default(),
        };

        let rows = rows_iter
            .filter(|cells| !cells.iter().all(is_blank))
            .map(|cells| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(idx, name)| {
                        let value = cells.get(idx).map(cell_value).unwrap_or_default();
                        (name.clone(), value)
                    })
                    .collect::<DataRow>()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<DataRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Treats plain numbers in the named columns as date serials. Column names
    /// match with or without the marker prefix.
    pub fn promote_date_columns(&mut self, columns: &[String], resolver: &ValueResolver) -> usize {
        let targets: Vec<String> = self
            .headers
            .iter()
            .filter(|header| columns.iter().any(|c| resolver.refers_to(c, header)))
            .cloned()
            .collect();

        let mut promoted = 0;
        for row in &mut self.rows {
            for column in &targets {
                if let Some(value) = row.get_mut(column) {
                    if let CellValue::Number(n) = *value {
                        *value = CellValue::Date(n);
                        promoted += 1;
                    }
                }
            }
        }
        if promoted > 0 {
            log::debug!("[Sheet] {} cells promoted to dates in {:?}", promoted, targets);
        }
        promoted
    }

    /// First rows as pretty JSON, columns in header order.
    pub fn preview_json(&self) -> Result<String> {
        let head: Vec<&DataRow> = self.rows.iter().take(PREVIEW_ROWS).collect();
        Ok(serde_json::to_string_pretty(&head)?)
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
        Data::DateTime(dt) => CellValue::Date(dt.as_f64()),
        Data::DateTimeIso(s) => match iso_serial(s) {
            Some(serial) => CellValue::Date(serial),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Converts an ISO 8601 date or date-time (as ODS stores them) to a
/// spreadsheet serial: days since 1899-12-30 plus the fraction of the day.
fn iso_serial(value: &str) -> Option<f64> {
    use chrono::{NaiveDate, NaiveDateTime, Timelike};

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let value = value.trim();
    let datetime = match NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(datetime) => datetime,
        Err(_) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?,
    };

    let days = (datetime.date() - epoch).num_days() as f64;
    let seconds = datetime.num_seconds_from_midnight() as f64;
    Some(days + seconds / 86_400.0)
}

/// Trimmed header names; blanks become `__EMPTY` and repeats get `_1`, `_2`.
fn header_names(cells: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(cells.len());
    for cell in cells {
        let raw = match cell {
            Data::Empty => String::new(),
            other => cell_value(other).raw_text(),
        };
        let trimmed = raw.trim();
        let base = if trimmed.is_empty() { "__EMPTY" } else { trimmed };

        let mut name = base.to_string();
        let mut n = 1;
        while names.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    fn range(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_header_row_and_defaults() {
        let r = range(&[
            &[s(" $name "), s("$hours"), s("$course")],
            &[s("Anna"), Data::Float(16.0), Data::Empty],
            &[s("Jan"), Data::Int(8)],
        ]);
        let ds = Dataset::from_range(&r);

        assert_eq!(ds.headers(), &["$name", "$hours", "$course"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].get("$name"), Some(&CellValue::Text("Anna".into())));
        assert_eq!(ds.rows()[0].get("$hours"), Some(&CellValue::Number(16.0)));
        assert_eq!(ds.rows()[0].get("$course"), Some(&CellValue::Empty));
        assert_eq!(ds.rows()[1].get("$hours"), Some(&CellValue::Number(8.0)));
        assert_eq!(ds.rows()[1].get("$course"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let r = range(&[
            &[s("$name")],
            &[Data::Empty],
            &[s("Ewa")],
            &[s("")],
        ]);
        let ds = Dataset::from_range(&r);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rows()[0].get("$name"), Some(&CellValue::Text("Ewa".into())));
    }

    #[test]
    fn test_duplicate_and_empty_headers() {
        let r = range(&[&[s("name"), s("name"), Data::Empty, s("")], &[s("a"), s("b"), s("c"), s("d")]]);
        let ds = Dataset::from_range(&r);
        assert_eq!(ds.headers(), &["name", "name_1", "__EMPTY", "__EMPTY_1"]);
        assert_eq!(ds.rows()[0].get("name_1"), Some(&CellValue::Text("b".into())));
    }

    #[test]
    fn test_date_cells_become_dates() {
        let bday = ExcelDateTime::new(36526.0, ExcelDateTimeType::DateTime, false);
        let r = range(&[&[s("$bday")], &[Data::DateTime(bday)]]);
        let ds = Dataset::from_range(&r);
        assert_eq!(ds.rows()[0].get("$bday"), Some(&CellValue::Date(36526.0)));
    }

    #[test]
    fn test_durations_stay_numbers() {
        let hours = ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false);
        let r = range(&[&[s("$hours")], &[Data::DateTime(hours)]]);
        let ds = Dataset::from_range(&r);
        assert_eq!(ds.rows()[0].get("$hours"), Some(&CellValue::Number(1.5)));
    }

    #[test]
    fn test_iso_dates_become_dates() {
        let r = range(&[
            &[s("$bday"), s("$start"), s("$time")],
            &[
                Data::DateTimeIso("2000-01-01".into()),
                Data::DateTimeIso("2000-01-01T12:00:00".into()),
                Data::DateTimeIso("10:30:00".into()),
            ],
        ]);
        let ds = Dataset::from_range(&r);
        let row = &ds.rows()[0];
        assert_eq!(row.get("$bday"), Some(&CellValue::Date(36526.0)));
        assert_eq!(row.get("$start"), Some(&CellValue::Date(36526.5)));
        assert_eq!(row.get("$time"), Some(&CellValue::Text("10:30:00".into())));
    }

    #[test]
    fn test_iso_serial() {
        assert_eq!(iso_serial("1899-12-31"), Some(1.0));
        assert_eq!(iso_serial("2024-02-29T06:00:00.000"), Some(45351.25));
        assert_eq!(iso_serial("29.02.2024"), None);
    }

    #[test]
    fn test_promote_date_columns() {
        let r = range(&[
            &[s("$bday"), s("$hours")],
            &[Data::Float(36526.0), Data::Float(16.0)],
        ]);
        let mut ds = Dataset::from_range(&r);
        let promoted = ds.promote_date_columns(&["bday".to_string()], &ValueResolver::default());
        assert_eq!(promoted, 1);
        assert_eq!(ds.rows()[0].get("$bday"), Some(&CellValue::Date(36526.0)));
        assert_eq!(ds.rows()[0].get("$hours"), Some(&CellValue::Number(16.0)));
    }

    #[test]
    fn test_preview_json_limits_rows() {
        let mut cells: Vec<Vec<Data>> = vec![vec![s("$name")]];
        for i in 0..15 {
            cells.push(vec![s(&format!("osoba {}", i))]);
        }
        let refs: Vec<&[Data]> = cells.iter().map(|r| r.as_slice()).collect();
        let ds = Dataset::from_range(&range(&refs));

        let json: serde_json::Value = serde_json::from_str(&ds.preview_json().unwrap()).unwrap();
        let arr = json.as_array().unwrap();
        assert_eq!(arr.len(), PREVIEW_ROWS);
        assert_eq!(arr[0]["$name"], "osoba 0");
    }

    #[test]
    fn test_empty_range() {
        let ds = Dataset::from_range(&Range::<Data>::empty());
        assert!(ds.is_empty());
        assert!(ds.headers().is_empty());
    }
}
