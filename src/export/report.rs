//! Human-readable annotation report.

use chrono::{DateTime, Local};

use crate::labels::LabelSchema;
use crate::state::PointStore;

/// Render the per-class count/percentage report.
///
/// Pure function of its inputs; the caller supplies the timestamp so tests
/// stay reproducible. When the store is empty every percentage is 0.0 and
/// the total reads 0; an empty scoring is a valid result, not an error.
pub fn render_report(
    store: &PointStore,
    schema: &LabelSchema,
    image_name: &str,
    generated_at: DateTime<Local>,
) -> String {
    let counts = store.counts_per_label(schema.len());
    let total = store.len();

    let mut out = String::new();
    out.push_str("Annotation report\n");
    out.push_str("=================\n");
    out.push_str(&format!("Image: {image_name}\n"));
    out.push_str(&format!(
        "Generated: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S %z")
    ));
    out.push('\n');
    out.push_str(&format!("Total annotations: {total}\n"));
    out.push('\n');
    out.push_str("Per-class counts:\n");

    for (id, count) in counts.iter().enumerate() {
        let name = schema.name(id).unwrap_or("?");
        let percentage = if total == 0 {
            0.0
        } else {
            100.0 * *count as f64 / total as f64
        };
        out.push_str(&format!("  {name}: {count} {percentage:.1}%\n"));
    }

    out
}
