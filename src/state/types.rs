//! Typed session-scoped state.

use std::path::PathBuf;

use crate::state::store::{LabelId, Point, PointStore};
use crate::utils::base_stem;
use crate::widget::InteractionMode;

/// Cached derived artifacts for the active image.
///
/// All three are fully reconstructible from the point store; they exist so
/// the UI layer can offer downloads without re-rendering.
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    pub csv: String,
    pub report: String,
    pub overlay_png: Vec<u8>,
}

/// Everything one annotation session owns.
///
/// Created when an image becomes active, discarded when the session ends or
/// the active image changes. There is no process-wide state: every
/// operation takes the context it works on.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Original file name of the active image, with extension.
    pub image_name: String,
    /// Where the persisted copy of the image lives.
    pub image_path: PathBuf,
    pub store: PointStore,
    pub active_label: LabelId,
    pub mode: InteractionMode,
    pub zoom: u8,
    pub artifacts: Option<Artifacts>,
}

impl SessionContext {
    pub fn new(image_name: impl Into<String>, image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_name: image_name.into(),
            image_path: image_path.into(),
            store: PointStore::new(),
            active_label: 0,
            mode: InteractionMode::default(),
            zoom: 1,
            artifacts: None,
        }
    }

    /// Base name shared by the image's companion CSV and report files.
    pub fn stem(&self) -> &str {
        base_stem(&self.image_name)
    }

    /// Current points and labels as parallel vectors, the shape the
    /// annotation widget consumes.
    pub fn patch_view(&self) -> (Vec<Point>, Vec<LabelId>) {
        let mut points = Vec::with_capacity(self.store.len());
        let mut labels = Vec::with_capacity(self.store.len());
        for (point, label) in self.store.iter() {
            points.push(point);
            labels.push(label);
        }
        (points, labels)
    }
}
