//! Certificate batch orchestration: session state, per-row rendering,
//! archiving and status reporting.

pub mod archive;
pub mod batch;
pub mod progress;
pub mod session;

pub use archive::{pack, ARCHIVE_NAME};
pub use batch::{
    spawn_batch, BatchEvent, BatchHandle, BatchOptions, BatchRenderer, BatchReport, CancelToken,
    RenderedDocument, RowFailure,
};
pub use progress::{LogReporter, ProgressReporter, Status};
pub use session::Session;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("no template loaded")]
    MissingTemplate,
    #[error("no dataset loaded")]
    MissingDataset,
    #[error("dataset has no records")]
    EmptyDataset,
    #[error("row {row_number} failed: {source}")]
    RowFailed {
        row_number: usize,
        source: Box<CoreError>,
    },
    #[error("duplicate archive entry {0:?}")]
    DuplicateEntry(String),
    #[error("batch worker panicked")]
    WorkerPanicked,
    #[error(transparent)]
    Pdf(#[from] certyfikaty_pdf::PdfError),
    #[error(transparent)]
    Sheet(#[from] certyfikaty_sheet::SheetError),
    #[error(transparent)]
    Field(#[from] certyfikaty_fields::FieldError),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// The status line shown for a missing prerequisite, if this is one.
    pub fn status(&self) -> Option<Status> {
        match self {
            CoreError::MissingTemplate => Some(Status::MissingTemplate),
            CoreError::MissingDataset | CoreError::EmptyDataset => Some(Status::MissingDataset),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use certyfikaty_fields::{CellValue, DataRow};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    pub fn row(cells: &[(&str, &str)]) -> DataRow {
        cells
            .iter()
            .map(|(k, v)| (*k, CellValue::from(*v)))
            .collect()
    }

    /// Single-page template with one line of background text.
    pub fn template(width: i64, height: i64) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Times-Roman",
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 20.into()]),
                Operation::new("Td", vec![40.into(), 40.into()]),
                Operation::new("Tj", vec![Object::string_literal("CERTYFIKAT")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }
}
