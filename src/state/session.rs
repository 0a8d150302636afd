//! Image activation, rehydration, and crash recovery.

use std::fs;
use std::path::Path;

use chrono::Local;
use image::DynamicImage;
use tracing::info;

use crate::error::AnnotateError;
use crate::export::{csv, overlay, report};
use crate::labels::LabelSchema;
use crate::state::types::{Artifacts, SessionContext};
use crate::storage::{DataDirs, write_atomic};
use crate::utils::base_stem;

/// Activate an image from a source path.
///
/// If a CSV for the image's base name exists in the annotation directory,
/// the store is rehydrated from it (every label validated against the
/// schema; any invalid row aborts the whole read). Otherwise the raw source
/// image is persisted into the image directory and the store starts empty.
/// Either way the session log is updated to reference this image.
pub fn activate_image(
    dirs: &DataDirs,
    schema: &LabelSchema,
    source: &Path,
) -> Result<SessionContext, AnnotateError> {
    let image_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(AnnotateError::MissingImage)?
        .to_string();
    let stem = base_stem(&image_name).to_string();

    // Keep a copy next to its future annotations so the session survives
    // the upload going away.
    let image_path = match dirs.locate_image(&image_name) {
        Some(stored) => stored,
        None => {
            let stored = dirs.image_path(&image_name);
            fs::copy(source, &stored).map_err(|e| AnnotateError::io_at(&stored, e))?;
            stored
        }
    };

    let mut ctx = SessionContext::new(&image_name, image_path);
    let csv_path = dirs.annotation_path(&stem);
    if csv_path.is_file() {
        ctx.store = read_store(&csv_path, schema)?;
        info!(
            "rehydrated {} annotation(s) for {image_name}",
            ctx.store.len()
        );
    }

    dirs.write_session_log(&ctx.image_name)?;
    Ok(ctx)
}

/// Resume the most recent session without an explicit image.
///
/// The session log names the last active image; the persisted CSV is the
/// source of truth for its annotations. This is the only crash-recovery
/// mechanism: it assumes the CSV was written after the last reconciliation.
pub fn resume_latest(
    dirs: &DataDirs,
    schema: &LabelSchema,
) -> Result<SessionContext, AnnotateError> {
    let image_name = dirs.read_session_log().ok_or(AnnotateError::MissingImage)?;
    let image_path = dirs
        .locate_image(&image_name)
        .ok_or(AnnotateError::MissingImage)?;

    let mut ctx = SessionContext::new(&image_name, image_path);
    let csv_path = dirs.annotation_path(ctx.stem());
    if csv_path.is_file() {
        ctx.store = read_store(&csv_path, schema)?;
    }

    info!(
        "resumed session for {} with {} annotation(s)",
        ctx.image_name,
        ctx.store.len()
    );
    Ok(ctx)
}

/// Re-derive all artifacts from the store, cache them on the context, and
/// persist the CSV and report.
///
/// Writes go through a temp file and rename, so an interrupted save never
/// corrupts the previously persisted state.
pub fn regenerate_artifacts(
    ctx: &mut SessionContext,
    schema: &LabelSchema,
    dirs: &DataDirs,
    image: &DynamicImage,
) -> Result<(), AnnotateError> {
    let csv_data = csv::render_csv(&ctx.store, schema)?;
    let report_data = report::render_report(&ctx.store, schema, ctx.stem(), Local::now());
    let overlay_png = overlay::render_overlay(image, &ctx.store, schema)?;

    write_atomic(&dirs.annotation_path(ctx.stem()), csv_data.as_bytes())?;
    write_atomic(&dirs.report_path(ctx.stem()), report_data.as_bytes())?;

    ctx.artifacts = Some(Artifacts {
        csv: csv_data,
        report: report_data,
        overlay_png,
    });
    Ok(())
}

fn read_store(
    csv_path: &Path,
    schema: &LabelSchema,
) -> Result<crate::state::PointStore, AnnotateError> {
    let content = fs::read_to_string(csv_path).map_err(|e| AnnotateError::io_at(csv_path, e))?;
    csv::parse_csv(&content, schema)
}
