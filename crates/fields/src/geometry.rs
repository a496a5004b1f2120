//! Preview space (scaled, origin top-left) and document space (PDF points,
//! origin bottom-left).

use crate::{FieldError, Result};
use serde::{Deserialize, Serialize};

/// Width in pixels every template is normalized to in the preview.
pub const DEFAULT_PREVIEW_WIDTH: f64 = 800.0;

/// Preview geometry captured when a template is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewGeometry {
    pub scaled_width: f64,
    pub scaled_height: f64,
    pub native_width: f64,
    pub native_height: f64,
    /// `target preview width / native width`
    pub scale: f64,
}

impl PreviewGeometry {
    /// Scales a page of `native_width` x `native_height` points so that its
    /// preview is exactly `target_width` pixels wide.
    pub fn fit_width(native_width: f64, native_height: f64, target_width: f64) -> Result<Self> {
        if !(native_width.is_finite() && native_height.is_finite())
            || native_width <= 0.0
            || native_height <= 0.0
        {
            return Err(FieldError::InvalidPageSize {
                width: native_width,
                height: native_height,
            });
        }
        if !target_width.is_finite() || target_width <= 0.0 {
            return Err(FieldError::InvalidPreviewWidth(target_width));
        }

        let scale = target_width / native_width;
        Ok(Self {
            scaled_width: native_width * scale,
            scaled_height: native_height * scale,
            native_width,
            native_height,
            scale,
        })
    }
}

/// Converts a preview point to document space.
pub fn to_document_space(preview_x: f64, preview_y: f64, geometry: &PreviewGeometry) -> (f64, f64) {
    let doc_x = preview_x / geometry.scale;
    let doc_y = geometry.native_height - (preview_y / geometry.scale);
    (doc_x, doc_y)
}

/// Inverse of [`to_document_space`].
pub fn to_preview_space(doc_x: f64, doc_y: f64, geometry: &PreviewGeometry) -> (f64, f64) {
    let preview_x = doc_x * geometry.scale;
    let preview_y = (geometry.native_height - doc_y) * geometry.scale;
    (preview_x, preview_y)
}
