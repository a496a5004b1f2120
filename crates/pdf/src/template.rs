//! Template loading and page geometry.

use crate::{PdfError, Result};
use certyfikaty_fields::PreviewGeometry;
use lopdf::{Document, Object, ObjectId};
use std::sync::Arc;

/// Maximum depth when walking the page tree for inherited attributes.
const MAX_INHERIT_DEPTH: usize = 16;

/// Page bounds in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl PageBox {
    /// US Letter, used when a page declares no box at all.
    pub const LETTER: PageBox = PageBox {
        llx: 0.0,
        lly: 0.0,
        urx: 612.0,
        ury: 792.0,
    };

    fn normalized(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self {
            llx: llx.min(urx),
            lly: lly.min(ury),
            urx: llx.max(urx),
            ury: lly.max(ury),
        }
    }

    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    fn intersect(&self, other: &PageBox) -> Option<PageBox> {
        let clipped = PageBox {
            llx: self.llx.max(other.llx),
            lly: self.lly.max(other.lly),
            urx: self.urx.min(other.urx),
            ury: self.ury.min(other.ury),
        };
        (clipped.width() > 0.0 && clipped.height() > 0.0).then_some(clipped)
    }
}

/// A validated single-page template, shared read-only by every row.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    bytes: Arc<[u8]>,
    page_box: PageBox,
    page_count: usize,
}

impl TemplateDocument {
    /// Parses `bytes` once to check the document and read the first page box.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let bytes = bytes.into();
        let doc = Document::load_mem(&bytes).map_err(|e| PdfError::Load(e.to_string()))?;
        let (page_id, page_count) = first_page(&doc)?;
        let page_box = page_box(&doc, page_id);

        if page_count > 1 {
            log::warn!(
                "[Template] template has {} pages, only the first is used",
                page_count
            );
        }
        let rotation = page_rotation(&doc, page_id);
        if rotation % 360 != 0 {
            log::warn!("[Template] page rotation {}° is ignored", rotation);
        }
        log::info!(
            "[Template] loaded {} bytes, page {:.2}x{:.2} pt",
            bytes.len(),
            page_box.width(),
            page_box.height()
        );

        Ok(Self {
            bytes,
            page_box,
            page_count,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_box(&self) -> PageBox {
        self.page_box
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Preview geometry for a preview `target_width` pixels wide.
    pub fn geometry(&self, target_width: f64) -> Result<PreviewGeometry> {
        Ok(PreviewGeometry::fit_width(
            self.page_box.width(),
            self.page_box.height(),
            target_width,
        )?)
    }
}

/// First page id and total page count.
pub(crate) fn first_page(doc: &Document) -> Result<(ObjectId, usize)> {
    let pages = doc.get_pages();
    let page_id = pages.values().next().copied().ok_or(PdfError::NoPages)?;
    Ok((page_id, pages.len()))
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Looks `key` up on the page, then on its ancestors.
pub(crate) fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_object(page_id).ok()?;
    for _ in 0..MAX_INHERIT_DEPTH {
        let dict = match node {
            Object::Dictionary(dict) => dict,
            _ => return None,
        };
        if let Ok(value) = dict.get(key) {
            return resolve(doc, value);
        }
        node = match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => doc.get_object(*parent).ok()?,
            _ => return None,
        };
    }
    None
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn box_values(doc: &Document, obj: &Object) -> Option<PageBox> {
    let arr = match obj {
        Object::Array(arr) => arr,
        _ => return None,
    };
    let values: Vec<f64> = arr
        .iter()
        .filter_map(|o| resolve(doc, o).and_then(number))
        .collect();
    match values.as_slice() {
        [llx, lly, urx, ury] => Some(PageBox::normalized(*llx, *lly, *urx, *ury)),
        _ => None,
    }
}

/// Visible page area: the CropBox clipped to the MediaBox, falling back to
/// the MediaBox, then to Letter.
pub(crate) fn page_box(doc: &Document, page_id: ObjectId) -> PageBox {
    let media = inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| box_values(doc, obj))
        .unwrap_or_else(|| {
            log::warn!("[Template] page has no MediaBox, assuming Letter");
            PageBox::LETTER
        });

    inherited(doc, page_id, b"CropBox")
        .and_then(|obj| box_values(doc, obj))
        .and_then(|crop| crop.intersect(&media))
        .unwrap_or(media)
}

fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    match inherited(doc, page_id, b"Rotate") {
        Some(Object::Integer(rotate)) => *rotate,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_inherited_media_box() {
        let template = TemplateDocument::from_bytes(fixtures::template(600, 400)).unwrap();
        assert_eq!(template.page_box().width(), 600.0);
        assert_eq!(template.page_box().height(), 400.0);
        assert_eq!(template.page_count(), 1);
    }

    #[test]
    fn test_geometry_from_template() {
        let template = TemplateDocument::from_bytes(fixtures::template(600, 400)).unwrap();
        let geometry = template.geometry(800.0).unwrap();
        assert!((geometry.scale - 800.0 / 600.0).abs() < 1e-12);
        assert_eq!(geometry.native_height, 400.0);
    }

    #[test]
    fn test_rejects_garbage() {
        let err = TemplateDocument::from_bytes(b"not a pdf".to_vec()).unwrap_err();
        assert!(matches!(err, PdfError::Load(_)));
    }

    #[test]
    fn test_crop_box_wins_over_media_box() {
        let mut doc = Document::load_mem(&fixtures::template(600, 400)).unwrap();
        let (page_id, _) = first_page(&doc).unwrap();
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set(
                "CropBox",
                vec![10.into(), 20.into(), 510.into(), 320.into()],
            );
        }
        let crop = page_box(&doc, page_id);
        assert_eq!(crop, PageBox::normalized(10.0, 20.0, 510.0, 320.0));
    }

    #[test]
    fn test_missing_media_box_defaults_to_letter() {
        let mut doc = Document::load_mem(&fixtures::template(600, 400)).unwrap();
        let (page_id, _) = first_page(&doc).unwrap();
        let parent = match doc.get_object(page_id).unwrap() {
            Object::Dictionary(dict) => dict.get(b"Parent").unwrap().as_reference().unwrap(),
            _ => unreachable!(),
        };
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(parent) {
            dict.remove(b"MediaBox");
        }
        assert_eq!(page_box(&doc, page_id), PageBox::LETTER);
    }
}
