//! Template preview rasterization and field markers.

mod binding;
mod markers;

pub use binding::{bind_pdfium, pdfium_search_paths};
pub use markers::{draw_field_markers, MARKER_COLOR, MARKER_HEIGHT, MARKER_WIDTH};

use certyfikaty_fields::PreviewGeometry;
use image::{ImageFormat, RgbaImage};
use pdfium_render::prelude::*;
use std::path::Path;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("pdfium library unavailable: {0}")]
    Binding(String),
    #[error("pdfium error: {0}")]
    Pdfium(String),
    #[error("template has no pages")]
    NoPages,
    #[error("rendered bitmap could not be converted to RGBA")]
    Bitmap,
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Rasterizes the first template page at the preview scale.
pub fn render_preview(
    pdfium: &Pdfium,
    template: &[u8],
    geometry: &PreviewGeometry,
) -> Result<RgbaImage> {
    let document = pdfium
        .load_pdf_from_byte_slice(template, None)
        .map_err(|e| RenderError::Pdfium(e.to_string()))?;
    let pages = document.pages();
    if pages.len() == 0 {
        return Err(RenderError::NoPages);
    }
    let page = pages
        .get(0)
        .map_err(|e| RenderError::Pdfium(e.to_string()))?;

    let target_width = geometry.scaled_width.round().max(1.0) as i32;
    let target_height = geometry.scaled_height.round().max(1.0) as i32;
    log::info!(
        "[Preview] {:.2}x{:.2} pt -> {}x{} px (scale {:.4})",
        geometry.native_width,
        geometry.native_height,
        target_width,
        target_height,
        geometry.scale
    );

    let config = PdfRenderConfig::new()
        .set_target_width(target_width)
        .set_target_height(target_height);
    let bitmap = page
        .render_with_config(&config)
        .map_err(|e| RenderError::Pdfium(e.to_string()))?;

    let image = bitmap
        .as_image()
        .as_rgba8()
        .ok_or(RenderError::Bitmap)?
        .clone();
    Ok(image)
}

/// Writes the preview as PNG.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    log::info!("[Preview] saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");

        let image = RgbaImage::from_pixel(8, 4, image::Rgba([255, 255, 255, 255]));
        save_png(&image, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (8, 4));
    }
}
