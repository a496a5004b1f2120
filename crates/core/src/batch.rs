//! Per-row certificate rendering.

use crate::{CoreError, Result};
use certyfikaty_fields::{
    certificate_filename, fallback_name, to_document_space, DataRow, Field, Locale,
    PreviewGeometry, ValueResolver,
};
use certyfikaty_pdf::{CertificateWriter, DocumentInfo, FontWeight, TemplateDocument};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub resolver: ValueResolver,
    /// Logical column naming the participant, without the marker
    pub primary_key: String,
    pub locale: Locale,
    pub fail_fast: bool,
    /// Pause after each row on top of the cooperative yield
    pub row_delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            resolver: ValueResolver::default(),
            primary_key: "name".to_string(),
            locale: Locale::default(),
            fail_fast: false,
            row_delay: Duration::ZERO,
        }
    }
}

/// One generated certificate.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// One-based row number within the dataset
    pub row_number: usize,
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub row_number: usize,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<RenderedDocument>,
    pub failures: Vec<RowFailure>,
    pub cancelled: bool,
    pub total: usize,
}

impl BatchReport {
    /// Rows finished so far, successfully or not.
    pub fn processed(&self) -> usize {
        self.documents.len() + self.failures.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Progress { done: usize, total: usize },
    RowFailed(RowFailure),
}

/// Shared flag checked between rows.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct BatchRenderer {
    template: TemplateDocument,
    fields: Arc<[Field]>,
    geometry: PreviewGeometry,
    options: BatchOptions,
}

impl BatchRenderer {
    pub fn new(
        template: TemplateDocument,
        fields: impl Into<Arc<[Field]>>,
        geometry: PreviewGeometry,
        options: BatchOptions,
    ) -> Self {
        Self {
            template,
            fields: fields.into(),
            geometry,
            options,
        }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    fn is_primary(&self, key: &str) -> bool {
        self.options.resolver.refers_to(key, &self.options.primary_key)
    }

    /// Participant name for `row`: the marked primary column, then the bare
    /// one. `None` when both are blank or absent.
    pub fn row_name(&self, row: &DataRow) -> Option<String> {
        let marker = self.options.resolver.marker();
        let marked = format!("{}{}", marker, self.options.primary_key);
        [marked.as_str(), self.options.primary_key.as_str()]
            .iter()
            .map(|key| self.options.resolver.resolve(row, key).to_text(self.options.locale))
            .find(|text| !text.is_empty())
    }

    /// Renders one row. `index` is zero-based.
    pub fn render_row(&self, index: usize, row: &DataRow) -> Result<RenderedDocument> {
        let mut writer = CertificateWriter::open(&self.template)?;

        for field in self.fields.iter() {
            let text = self
                .options
                .resolver
                .resolve(row, &field.key)
                .to_text(self.options.locale);
            if text.is_empty() {
                continue;
            }

            let (x, y) = to_document_space(field.x, field.y, &self.geometry);
            let weight = if self.is_primary(&field.key) {
                FontWeight::Bold
            } else {
                FontWeight::Regular
            };
            writer.draw_text(&text, x, y, field.effective_size(), weight, field.color.rgb())?;
        }

        let name = self.row_name(row);
        let filename = certificate_filename(
            index,
            name.as_deref().unwrap_or(&fallback_name(index)),
        );
        let info = DocumentInfo {
            title: name,
            ..DocumentInfo::default()
        };
        let bytes = writer.finish(&info)?;

        log::debug!("[Batch] row {} -> {} ({} bytes)", index + 1, filename, bytes.len());
        Ok(RenderedDocument {
            row_number: index + 1,
            filename,
            bytes,
        })
    }

    /// Renders every row in order, calling `on_event` after each one.
    ///
    /// Failed rows are recorded and skipped unless `fail_fast` is set, in
    /// which case the first failure ends the batch with an error.
    pub fn render_all(
        &self,
        rows: &[DataRow],
        cancel: &CancelToken,
        mut on_event: impl FnMut(&BatchEvent),
    ) -> Result<BatchReport> {
        let total = rows.len();
        let mut report = BatchReport {
            total,
            ..BatchReport::default()
        };
        log::info!(
            "[Batch] rendering {} rows with {} fields",
            total,
            self.fields.len()
        );

        for (index, row) in rows.iter().enumerate() {
            if cancel.is_cancelled() {
                log::warn!("[Batch] cancelled after {} of {} rows", index, total);
                report.cancelled = true;
                break;
            }

            match self.render_row(index, row) {
                Ok(doc) => report.documents.push(doc),
                Err(e) => {
                    if self.options.fail_fast {
                        return Err(CoreError::RowFailed {
                            row_number: index + 1,
                            source: Box::new(e),
                        });
                    }
                    let failure = RowFailure {
                        row_number: index + 1,
                        name: self.row_name(row).unwrap_or_else(|| fallback_name(index)),
                        error: e.to_string(),
                    };
                    log::warn!(
                        "[Batch] row {} ({}) failed: {}",
                        failure.row_number,
                        failure.name,
                        failure.error
                    );
                    on_event(&BatchEvent::RowFailed(failure.clone()));
                    report.failures.push(failure);
                }
            }

            on_event(&BatchEvent::Progress {
                done: index + 1,
                total,
            });
            thread::yield_now();
            if !self.options.row_delay.is_zero() {
                thread::sleep(self.options.row_delay);
            }
        }

        log::info!(
            "[Batch] finished: {} generated, {} failed",
            report.documents.len(),
            report.failures.len()
        );
        Ok(report)
    }
}

/// A batch running on a worker thread.
pub struct BatchHandle {
    events: Receiver<BatchEvent>,
    cancel: CancelToken,
    worker: JoinHandle<Result<BatchReport>>,
}

impl BatchHandle {
    /// Events in the order they happened. The iterator ends once the worker
    /// is done.
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// Stops the worker before its next row.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the worker and returns its report.
    pub fn join(self) -> Result<BatchReport> {
        self.worker.join().map_err(|_| CoreError::WorkerPanicked)?
    }
}

/// Runs `renderer` over `rows` on a new thread.
pub fn spawn_batch(renderer: BatchRenderer, rows: Vec<DataRow>) -> Result<BatchHandle> {
    let (tx, events) = mpsc::channel();
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();

    let worker = thread::Builder::new()
        .name("certyfikaty-batch".to_string())
        .spawn(move || {
            renderer.render_all(&rows, &worker_cancel, |event| {
                // the receiver may be gone; rendering continues regardless
                let _ = tx.send(event.clone());
            })
        })?;

    Ok(BatchHandle {
        events,
        cancel,
        worker,
    })
}
