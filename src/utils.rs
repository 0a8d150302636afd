//! Utility functions for the annotation engine.

/// Parse a hex color string (e.g., "#ff0000") to an RGB pixel
pub fn parse_color(hex: &str) -> Option<image::Rgb<u8>> {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(image::Rgb([r, g, b]))
    } else {
        None
    }
}

/// File name with its final extension stripped ("slide_04.png" -> "slide_04").
///
/// Matching between the image, annotation, and report directories is done on
/// this stem, so companion files stay grouped despite differing extensions.
pub fn base_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}
