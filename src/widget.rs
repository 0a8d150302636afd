//! Contract for the interactive annotation widget.
//!
//! The widget (an external canvas component) is handed the current state of
//! the viewport and either reports no change or returns the complete set of
//! points it currently displays. That returned patch drives both additions
//! and deletions during reconciliation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AnnotateError;
use crate::labels::LabelSchema;
use crate::state::{LabelId, Point};

/// One record of a widget-reported patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchPoint {
    pub point: Point,
    pub label_id: LabelId,
}

/// What clicking on the canvas does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    #[default]
    Add,
    Delete,
}

impl InteractionMode {
    /// Mode string understood by the canvas component.
    pub fn as_widget_mode(self) -> &'static str {
        match self {
            InteractionMode::Add => "Transform",
            InteractionMode::Delete => "Del",
        }
    }
}

/// Everything the widget needs to present one interaction round.
pub struct WidgetFrame<'a> {
    pub image_path: &'a Path,
    pub schema: &'a LabelSchema,
    pub points: Vec<Point>,
    pub labels: Vec<LabelId>,
    pub width: u32,
    pub height: u32,
    pub mode: InteractionMode,
    pub active_label: LabelId,
    pub zoom: u8,
    pub point_width: u32,
}

/// The annotation canvas, as seen from the engine.
///
/// `None` means no interaction happened; `Some(patch)` is the complete
/// current visible annotation state, never a diff.
pub trait AnnotationWidget {
    fn present(&mut self, frame: &WidgetFrame<'_>)
    -> Result<Option<Vec<PatchPoint>>, AnnotateError>;
}

/// Widget stand-in that replays a patch from a JSON file.
///
/// Used by the CLI driver: an interactive session exports the widget's
/// reported state as JSON, and this source feeds it through the same
/// reconciliation path. The file holds a JSON array of patch points.
pub struct FilePatchSource {
    path: PathBuf,
    consumed: bool,
}

impl FilePatchSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            consumed: false,
        }
    }
}

impl AnnotationWidget for FilePatchSource {
    fn present(
        &mut self,
        _frame: &WidgetFrame<'_>,
    ) -> Result<Option<Vec<PatchPoint>>, AnnotateError> {
        // A patch file represents one interaction; replaying it again
        // reports "no change" like an idle widget.
        if self.consumed {
            return Ok(None);
        }
        self.consumed = true;

        let text =
            fs::read_to_string(&self.path).map_err(|e| AnnotateError::io_at(&self.path, e))?;
        let patch: Vec<PatchPoint> = serde_json::from_str(&text).map_err(|e| {
            AnnotateError::MalformedRow {
                line: e.line(),
                reason: format!("patch json: {e}"),
            }
        })?;
        Ok(Some(patch))
    }
}
