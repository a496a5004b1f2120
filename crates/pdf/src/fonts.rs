//! Standard font registration on the template page.

use crate::encoding::differences;
use crate::template::inherited;
use crate::{PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

const REGULAR_FACE: &str = "Helvetica";
const BOLD_FACE: &str = "Helvetica-Bold";

/// Resource names of the two faces on the page.
#[derive(Debug, Clone)]
pub(crate) struct StandardFonts {
    pub regular: Vec<u8>,
    pub bold: Vec<u8>,
}

fn font_dict(base_font: &str, encoding_id: ObjectId) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"Font".to_vec()));
    dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    dict.set("BaseFont", Object::Name(base_font.as_bytes().to_vec()));
    dict.set("Encoding", Object::Reference(encoding_id));
    dict
}

/// Picks `base`, or `base` with a numeric suffix, that is not yet used.
fn unused_name(fonts: &Dictionary, base: &str) -> Vec<u8> {
    let mut name = base.as_bytes().to_vec();
    let mut n = 1;
    while fonts.has(&name) {
        name = format!("{}{}", base, n).into_bytes();
        n += 1;
    }
    name
}

/// Adds Helvetica and Helvetica-Bold to the page's font resources.
///
/// Inherited or shared resources are copied onto the page first so the
/// template's own resources stay untouched.
pub(crate) fn register_standard_fonts(doc: &mut Document, page_id: ObjectId) -> Result<StandardFonts> {
    let mut resources = match inherited(doc, page_id, b"Resources") {
        Some(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };
    let mut fonts = match resources.get(b"Font") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            _ => Dictionary::new(),
        },
        _ => Dictionary::new(),
    };

    let mut encoding = Dictionary::new();
    encoding.set("Type", Object::Name(b"Encoding".to_vec()));
    encoding.set("BaseEncoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    encoding.set("Differences", Object::Array(differences()));
    let encoding_id = doc.add_object(encoding);

    let regular_id = doc.add_object(font_dict(REGULAR_FACE, encoding_id));
    let bold_id = doc.add_object(font_dict(BOLD_FACE, encoding_id));

    let regular = unused_name(&fonts, "CertRegular");
    fonts.set(regular.clone(), Object::Reference(regular_id));
    let bold = unused_name(&fonts, "CertBold");
    fonts.set(bold.clone(), Object::Reference(bold_id));

    resources.set("Font", Object::Dictionary(fonts));

    match doc.get_object_mut(page_id)? {
        Object::Dictionary(page) => page.set("Resources", Object::Dictionary(resources)),
        _ => {
            return Err(PdfError::InvalidPage(format!(
                "page {:?} is not a dictionary",
                page_id
            )))
        }
    }

    log::debug!(
        "[Fonts] registered {} / {} on page {:?}",
        String::from_utf8_lossy(&regular),
        String::from_utf8_lossy(&bold),
        page_id
    );

    Ok(StandardFonts { regular, bold })
}
