//! Working state of one certificate run: template, geometry, dataset and
//! placed fields.

use crate::batch::{
    spawn_batch, BatchEvent, BatchHandle, BatchOptions, BatchRenderer, BatchReport, CancelToken,
};
use crate::{CoreError, Result};
use certyfikaty_fields::{
    DataRow, Field, FieldRegistry, HexColor, PreviewGeometry, DEFAULT_PREVIEW_WIDTH,
};
use certyfikaty_pdf::TemplateDocument;
use certyfikaty_sheet::Dataset;

#[derive(Debug)]
pub struct Session {
    preview_width: f64,
    template: Option<TemplateDocument>,
    geometry: Option<PreviewGeometry>,
    dataset: Option<Dataset>,
    fields: FieldRegistry,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_WIDTH)
    }
}

impl Session {
    pub fn new(preview_width: f64) -> Self {
        Self {
            preview_width,
            template: None,
            geometry: None,
            dataset: None,
            fields: FieldRegistry::new(),
        }
    }

    /// Replaces the template and recomputes the preview geometry. Placed
    /// fields keep their preview coordinates.
    pub fn load_template(&mut self, bytes: Vec<u8>) -> Result<&PreviewGeometry> {
        let template = TemplateDocument::from_bytes(bytes)?;
        let geometry = template.geometry(self.preview_width)?;
        log::info!(
            "[Session] template {:.2}x{:.2} pt, preview {:.0}x{:.0} px",
            geometry.native_width,
            geometry.native_height,
            geometry.scaled_width,
            geometry.scaled_height
        );
        self.template = Some(template);
        Ok(self.geometry.insert(geometry))
    }

    /// Replaces the dataset. Returns the record count.
    pub fn load_dataset(&mut self, bytes: &[u8]) -> Result<usize> {
        let dataset = Dataset::from_workbook_bytes(bytes)?;
        Ok(self.set_dataset(dataset))
    }

    pub fn set_dataset(&mut self, dataset: Dataset) -> usize {
        let records = dataset.len();
        log::info!("[Session] dataset with {} records", records);
        self.dataset = Some(dataset);
        records
    }

    pub fn template(&self) -> Option<&TemplateDocument> {
        self.template.as_ref()
    }

    pub fn geometry(&self) -> Option<&PreviewGeometry> {
        self.geometry.as_ref()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn dataset_mut(&mut self) -> Option<&mut Dataset> {
        self.dataset.as_mut()
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    /// Places a field at preview coordinates. A template must be loaded.
    pub fn add_field(
        &mut self,
        key: impl Into<String>,
        x: f64,
        y: f64,
        size: f32,
        font: impl Into<String>,
        color: HexColor,
    ) -> Result<&Field> {
        if self.template.is_none() {
            return Err(CoreError::MissingTemplate);
        }
        Ok(self.fields.add(key, x, y, size, font, color))
    }

    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    pub fn nudge_last(&mut self, dx: f64, dy: f64) -> bool {
        self.fields.nudge_last(dx, dy)
    }

    /// Checks prerequisites and builds a renderer plus the rows to feed it.
    pub fn prepare(&self, options: BatchOptions) -> Result<(BatchRenderer, Vec<DataRow>)> {
        let (template, geometry) = match (&self.template, &self.geometry) {
            (Some(t), Some(g)) => (t.clone(), *g),
            _ => return Err(CoreError::MissingTemplate),
        };
        let dataset = self.dataset.as_ref().ok_or(CoreError::MissingDataset)?;
        if dataset.is_empty() {
            return Err(CoreError::EmptyDataset);
        }

        let renderer = BatchRenderer::new(template, self.fields.fields().to_vec(), geometry, options);
        Ok((renderer, dataset.rows().to_vec()))
    }

    /// Runs the batch on the calling thread.
    pub fn generate(
        &self,
        options: BatchOptions,
        cancel: &CancelToken,
        on_event: impl FnMut(&BatchEvent),
    ) -> Result<BatchReport> {
        let (renderer, rows) = self.prepare(options)?;
        renderer.render_all(&rows, cancel, on_event)
    }

    /// Runs the batch on a worker thread.
    pub fn spawn_generate(&self, options: BatchOptions) -> Result<BatchHandle> {
        let (renderer, rows) = self.prepare(options)?;
        spawn_batch(renderer, rows)
    }
}
