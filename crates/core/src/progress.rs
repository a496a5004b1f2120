//! User-facing status lines.

use std::fmt;

/// A status message shown to the user while working through a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Generating,
    Progress { done: usize, total: usize },
    Done,
    Loaded { records: usize },
    DefaultTemplateUsed,
    DefaultDatasetUsed,
    DefaultMissing { name: String },
    MissingTemplate,
    MissingDataset,
    RowFailed { row: usize, name: String, error: String },
    Cancelled { done: usize, total: usize },
    Summary { generated: usize, total: usize, failed: usize },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Generating => write!(f, "Generowanie..."),
            Status::Progress { done, total } => write!(f, "Generowano {}/{}", done, total),
            Status::Done => write!(f, "Gotowe — pobieranie ZIP."),
            Status::Loaded { records } => write!(f, "Wczytano {} rekordów", records),
            Status::DefaultTemplateUsed => write!(f, "Użyto domyślnego szablonu."),
            Status::DefaultDatasetUsed => write!(f, "Użyto domyślnego pliku Excel."),
            Status::DefaultMissing { name } => write!(f, "Brak domyślnego pliku {}", name),
            Status::MissingTemplate => write!(f, "Wgraj szablon PDF"),
            Status::MissingDataset => write!(f, "Wgraj plik Excel"),
            Status::RowFailed { row, name, error } => {
                write!(f, "Błąd w wierszu {} ({}): {}", row, name, error)
            }
            Status::Cancelled { done, total } => write!(f, "Przerwano po {} z {}", done, total),
            Status::Summary {
                generated,
                total,
                failed,
            } => write!(f, "Wygenerowano {} z {}, błędy: {}", generated, total, failed),
        }
    }
}

impl Status {
    /// Log level a status is recorded at.
    pub fn level(&self) -> log::Level {
        match self {
            Status::RowFailed { .. }
            | Status::MissingTemplate
            | Status::MissingDataset
            | Status::DefaultMissing { .. }
            | Status::Cancelled { .. } => log::Level::Warn,
            Status::Progress { .. } => log::Level::Debug,
            _ => log::Level::Info,
        }
    }
}

/// Receives status updates.
pub trait ProgressReporter {
    fn report(&mut self, status: &Status);
}

impl<F> ProgressReporter for F
where
    F: FnMut(&Status),
{
    fn report(&mut self, status: &Status) {
        self(status)
    }
}

/// Forwards statuses to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&mut self, status: &Status) {
        log::log!(status.level(), "[Status] {}", status);
    }
}
