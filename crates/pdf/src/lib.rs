//! PDF template loading and certificate text stamping.

mod encoding;
mod fonts;
mod metadata;
mod template;
mod writer;

pub use encoding::{encode_text, POLISH_GLYPHS};
pub use metadata::DocumentInfo;
pub use template::{PageBox, TemplateDocument};
pub use writer::{CertificateWriter, FontWeight};

pub type Result<T> = std::result::Result<T, PdfError>;

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("failed to load PDF: {0}")]
    Load(String),
    #[error("PDF has no pages")]
    NoPages,
    #[error("invalid page object: {0}")]
    InvalidPage(String),
    #[error("character {ch:?} cannot be drawn with the standard fonts (in {text:?})")]
    UnencodableChar { ch: char, text: String },
    #[error("failed to encode content stream: {0}")]
    Encode(String),
    #[error("failed to save PDF: {0}")]
    Save(String),
    #[error("pdf error: {0}")]
    Lopdf(#[from] lopdf::Error),
    #[error(transparent)]
    Field(#[from] certyfikaty_fields::FieldError),
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Single-page template whose MediaBox and Resources live on the Pages
    /// node, so lookups must follow inheritance.
    pub fn template(width: i64, height: i64) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 50.into()]),
                Operation::new("Tj", vec![Object::string_literal("Background")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
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
