//! Field placement, value resolution and coordinate mapping.

pub mod color;
pub mod filename;
pub mod geometry;
pub mod registry;
pub mod resolve;
pub mod value;

pub use color::{HexColor, Rgb};
pub use filename::{certificate_filename, fallback_name, sanitize_filename, MAX_NAME_LEN};
pub use geometry::{to_document_space, to_preview_space, PreviewGeometry, DEFAULT_PREVIEW_WIDTH};
pub use registry::{Field, FieldRegistry, DEFAULT_COLOR, DEFAULT_FONT, DEFAULT_FONT_SIZE, DEFAULT_KEY};
pub use resolve::{KeyCandidate, ValueResolver, DEFAULT_MARKER};
pub use value::{excel_date_to_text, CellValue, DataRow, Locale};

pub type Result<T> = std::result::Result<T, FieldError>;

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
    #[error("invalid page size {width}x{height}")]
    InvalidPageSize { width: f64, height: f64 },
    #[error("invalid preview width {0}")]
    InvalidPreviewWidth(f64),
    #[error("unknown locale {0:?}")]
    UnknownLocale(String),
}
