//! Field position markers drawn over the preview.

use certyfikaty_fields::Field;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

pub const MARKER_WIDTH: u32 = 60;
pub const MARKER_HEIGHT: u32 = 24;
pub const MARKER_COLOR: Rgba<u8> = Rgba([220, 38, 38, 255]);

/// Cross hair arm length in pixels.
const CROSS_ARM: f32 = 4.0;

/// Draws a box centered on each field's preview point plus a cross hair on
/// the point itself. Markers partly outside the image are clipped.
pub fn draw_field_markers<'a>(image: &mut RgbaImage, fields: impl IntoIterator<Item = &'a Field>) {
    for field in fields {
        let (x, y) = (field.x as f32, field.y as f32);
        let left = field.x.round() as i32 - (MARKER_WIDTH / 2) as i32;
        let top = field.y.round() as i32 - (MARKER_HEIGHT / 2) as i32;

        draw_hollow_rect_mut(
            image,
            Rect::at(left, top).of_size(MARKER_WIDTH, MARKER_HEIGHT),
            MARKER_COLOR,
        );
        draw_line_segment_mut(image, (x - CROSS_ARM, y), (x + CROSS_ARM, y), MARKER_COLOR);
        draw_line_segment_mut(image, (x, y - CROSS_ARM), (x, y + CROSS_ARM), MARKER_COLOR);
    }
}
