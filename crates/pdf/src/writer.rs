//! Per-row certificate document: a private copy of the template with text
//! drawn on its first page.

use crate::encoding::encode_text;
use crate::fonts::{register_standard_fonts, StandardFonts};
use crate::metadata::{stamp_info, DocumentInfo};
use crate::template::{first_page, page_box, PageBox, TemplateDocument};
use crate::{PdfError, Result};
use certyfikaty_fields::Rgb;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

pub struct CertificateWriter {
    doc: Document,
    page_id: ObjectId,
    page_box: PageBox,
    fonts: StandardFonts,
    operations: Vec<Operation>,
}

impl CertificateWriter {
    /// Opens an independent mutable copy of the template.
    pub fn open(template: &TemplateDocument) -> Result<Self> {
        let mut doc =
            Document::load_mem(template.bytes()).map_err(|e| PdfError::Load(e.to_string()))?;
        let (page_id, _) = first_page(&doc)?;
        let page_box = page_box(&doc, page_id);
        let fonts = register_standard_fonts(&mut doc, page_id)?;

        Ok(Self {
            doc,
            page_id,
            page_box,
            fonts,
            operations: Vec::new(),
        })
    }

    pub fn page_box(&self) -> PageBox {
        self.page_box
    }

    /// Number of text draws queued so far.
    pub fn text_count(&self) -> usize {
        self.operations.iter().filter(|op| op.operator == "Tj").count()
    }

    /// Queues `text` with its baseline origin at (`x`, `y`) in document
    /// space, relative to the page box corner.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        size: f32,
        weight: FontWeight,
        color: Rgb,
    ) -> Result<()> {
        let encoded = encode_text(text).map_err(|ch| PdfError::UnencodableChar {
            ch,
            text: text.to_string(),
        })?;
        let font = match weight {
            FontWeight::Regular => &self.fonts.regular,
            FontWeight::Bold => &self.fonts.bold,
        };
        let (r, g, b) = color.normalized();
        let page_x = (self.page_box.llx + x) as f32;
        let page_y = (self.page_box.lly + y) as f32;

        self.operations.extend([
            Operation::new("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font.clone()), Object::Real(size)]),
            Operation::new("Td", vec![Object::Real(page_x), Object::Real(page_y)]),
            Operation::new("Tj", vec![Object::String(encoded, StringFormat::Hexadecimal)]),
            Operation::new("ET", vec![]),
        ]);
        Ok(())
    }

    /// Appends the queued text, stamps `info` and serializes the document.
    pub fn finish(mut self, info: &DocumentInfo) -> Result<Vec<u8>> {
        append_overlay(&mut self.doc, self.page_id, self.operations)?;
        stamp_info(&mut self.doc, info)?;
        self.doc.compress();

        let mut out = Vec::new();
        self.doc
            .save_to(&mut out)
            .map_err(|e| PdfError::Save(e.to_string()))?;
        Ok(out)
    }
}

/// Page content streams are read as one concatenated stream, so each added
/// stream is framed by newlines to keep its operators apart from the
/// neighbouring template content.
fn add_stream(doc: &mut Document, operations: Vec<Operation>) -> Result<ObjectId> {
    let encoded = Content { operations }
        .encode()
        .map_err(|e| PdfError::Encode(e.to_string()))?;
    let mut data = Vec::with_capacity(encoded.len() + 2);
    data.push(b'\n');
    data.extend_from_slice(&encoded);
    data.push(b'\n');
    Ok(doc.add_object(Stream::new(Dictionary::new(), data)))
}

/// Adds the overlay after the existing page content. The existing content is
/// wrapped in `q`/`Q` so its graphics state cannot leak into the overlay.
fn append_overlay(doc: &mut Document, page_id: ObjectId, operations: Vec<Operation>) -> Result<()> {
    if operations.is_empty() {
        return Ok(());
    }

    let existing: Vec<Object> = {
        let page = doc.get_object(page_id)?.as_dict()?;
        match page.get(b"Contents") {
            Ok(Object::Reference(id)) => match doc.get_object(*id) {
                Ok(Object::Array(arr)) => arr.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Ok(Object::Array(arr)) => arr.clone(),
            _ => Vec::new(),
        }
    };

    let contents = if existing.is_empty() {
        let mut overlay = vec![Operation::new("q", vec![])];
        overlay.extend(operations);
        overlay.push(Operation::new("Q", vec![]));
        vec![Object::Reference(add_stream(doc, overlay)?)]
    } else {
        let open_id = add_stream(doc, vec![Operation::new("q", vec![])])?;
        let mut overlay = vec![Operation::new("Q", vec![]), Operation::new("q", vec![])];
        overlay.extend(operations);
        overlay.push(Operation::new("Q", vec![]));
        let overlay_id = add_stream(doc, overlay)?;

        let mut contents = Vec::with_capacity(existing.len() + 2);
        contents.push(Object::Reference(open_id));
        contents.extend(existing);
        contents.push(Object::Reference(overlay_id));
        contents
    };

    match doc.get_object_mut(page_id)? {
        Object::Dictionary(page) => {
            page.set("Contents", Object::Array(contents));
            Ok(())
        }
        _ => Err(PdfError::InvalidPage(format!(
            "page {:?} is not a dictionary",
            page_id
        ))),
    }
}
