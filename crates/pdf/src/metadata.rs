//! Document information dictionary for generated certificates.

use crate::Result;
use chrono::Local;
use lopdf::{Dictionary, Document, Object, StringFormat};

/// Values written to the Info dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub producer: String,
    pub creator: String,
    pub title: Option<String>,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            producer: format!("certyfikaty v{}", env!("CARGO_PKG_VERSION")),
            creator: "certyfikaty".to_string(),
            title: None,
        }
    }
}

fn literal(value: &str) -> Object {
    Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
}

/// PDF text string: plain bytes for ASCII, UTF-16BE with BOM otherwise.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Sets Producer, Creator, ModDate (and Title when given), creating the
/// Info dictionary if the template has none.
pub(crate) fn stamp_info(doc: &mut Document, info: &DocumentInfo) -> Result<()> {
    let info_id = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => *id,
        _ => {
            let new_id = doc.add_object(Object::Dictionary(Dictionary::new()));
            doc.trailer.set("Info", Object::Reference(new_id));
            new_id
        }
    };

    let now = Local::now();
    let pdf_date = format!("D:{}", now.format("%Y%m%d%H%M%S"));

    if let Object::Dictionary(ref mut dict) = doc.get_object_mut(info_id)? {
        dict.set("Producer", literal(&info.producer));
        dict.set("Creator", literal(&info.creator));
        dict.set("ModDate", literal(&pdf_date));
        if let Some(title) = &info.title {
            dict.set("Title", text_string(title));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_info_created_and_filled() {
        let mut doc = Document::load_mem(&fixtures::template(100, 100)).unwrap();
        let info = DocumentInfo {
            title: Some("Anna Żak".to_string()),
            ..DocumentInfo::default()
        };
        stamp_info(&mut doc, &info).unwrap();

        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let dict = doc.get_object(info_id).unwrap().as_dict().unwrap();
        assert!(dict.has(b"ModDate"));
        match dict.get(b"Creator").unwrap() {
            Object::String(bytes, _) => assert_eq!(bytes, b"certyfikaty"),
            _ => panic!("Creator is not a string"),
        }
        match dict.get(b"Title").unwrap() {
            Object::String(bytes, _) => assert_eq!(&bytes[..2], &[0xFEu8, 0xFF]),
            _ => panic!("Title is not a string"),
        }
    }

    #[test]
    fn test_ascii_title_is_literal() {
        assert!(matches!(text_string("Jan"), Object::String(_, StringFormat::Literal)));
    }
}
