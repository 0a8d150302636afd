//! CSV serialization of the point store.
//!
//! The CSV is the persisted, human-auditable format and the only source of
//! truth for crash recovery, so both directions are strict: writing rejects
//! labels outside the schema, reading rejects rows that do not parse or
//! name an unknown label.

use crate::error::AnnotateError;
use crate::labels::LabelSchema;
use crate::state::PointStore;

pub const CSV_HEADER: &str = "X,Y,Label";

/// Render the store as CSV, one `x,y,name` row per point.
///
/// Rows come out in the store's lexicographic (x, y) order, so the same
/// store always produces byte-identical output.
pub fn render_csv(store: &PointStore, schema: &LabelSchema) -> Result<String, AnnotateError> {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + store.len() * 16);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for ((x, y), label) in store.iter() {
        let name = schema
            .name(label)
            .ok_or(AnnotateError::LabelOutOfRange(label))?;
        out.push_str(&format!("{x},{y},{name}\n"));
    }

    Ok(out)
}

/// Parse CSV content back into a point store, validating every label name
/// against the schema.
///
/// The whole read aborts on the first malformed row or unknown label;
/// partially-read rows are discarded rather than kept.
pub fn parse_csv(content: &str, schema: &LabelSchema) -> Result<PointStore, AnnotateError> {
    let mut lines = content.lines().enumerate();

    match lines.next() {
        Some((_, header)) if header.trim() == CSV_HEADER => {}
        Some((_, header)) => {
            return Err(AnnotateError::MalformedRow {
                line: 1,
                reason: format!("expected header {CSV_HEADER:?}, found {header:?}"),
            });
        }
        None => return Ok(PointStore::new()),
    }

    let mut store = PointStore::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        // splitn keeps any commas inside the label name intact
        let mut fields = line.splitn(3, ',');
        let (Some(x_str), Some(y_str), Some(name)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(AnnotateError::MalformedRow {
                line: line_no,
                reason: "expected 3 fields (X,Y,Label)".to_string(),
            });
        };

        let x: u32 = x_str
            .trim()
            .parse()
            .map_err(|e| AnnotateError::MalformedRow {
                line: line_no,
                reason: format!("bad X coordinate {x_str:?}: {e}"),
            })?;
        let y: u32 = y_str
            .trim()
            .parse()
            .map_err(|e| AnnotateError::MalformedRow {
                line: line_no,
                reason: format!("bad Y coordinate {y_str:?}: {e}"),
            })?;

        let label = schema.index_of(name.trim())?;
        store.insert((x, y), label);
    }

    Ok(store)
}
