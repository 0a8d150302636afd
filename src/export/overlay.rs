//! Rendered overlay of the annotated points over the source image.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;

use crate::error::AnnotateError;
use crate::labels::LabelSchema;
use crate::state::PointStore;

/// Circle radius as a fraction of the image's shorter dimension.
const RADIUS_FRACTION: f32 = 0.01;

/// Outline stroke width as a fraction of the radius.
const STROKE_FRACTION: f32 = 0.6;

/// Draw a hollow circle at every annotated point, in its label's color,
/// and encode the result as PNG.
///
/// The source image is not mutated. Converting to RGB drops any alpha
/// channel, and re-encoding from raw pixels drops embedded color-profile
/// metadata that some scanners attach and some PNG writers reject.
pub fn render_overlay(
    image: &DynamicImage,
    store: &PointStore,
    schema: &LabelSchema,
) -> Result<Vec<u8>, AnnotateError> {
    let mut canvas: RgbImage = image.to_rgb8();

    let radius = point_radius(canvas.width(), canvas.height());
    let stroke = (radius as f32 * STROKE_FRACTION).round().max(1.0) as i32;

    for ((x, y), label) in store.iter() {
        let color = schema.color(label);
        // Stroke grows inward from the outline
        let innermost = (radius - stroke + 1).max(1);
        for r in innermost..=radius {
            draw_hollow_circle_mut(&mut canvas, (x as i32, y as i32), r, color);
        }
    }

    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// 1% of the shorter dimension, never below one pixel.
pub fn point_radius(width: u32, height: u32) -> i32 {
    let shorter = width.min(height) as f32;
    (shorter * RADIUS_FRACTION).round().max(1.0) as i32
}
