//! The authoritative point -> label mapping for one image.

use std::collections::BTreeMap;

/// A pixel coordinate pair in image space.
pub type Point = (u32, u32);

/// Index into the label schema's ordered name list.
pub type LabelId = usize;

/// Deduplicated set of annotated points and their labels.
///
/// Backed by a `BTreeMap` so iteration (and therefore every serialized
/// artifact) follows a stable lexicographic (x, y) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointStore {
    points: BTreeMap<Point, LabelId>,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.points.contains_key(&point)
    }

    pub fn label_of(&self, point: Point) -> Option<LabelId> {
        self.points.get(&point).copied()
    }

    /// Insert a point unless it is already present.
    ///
    /// An existing point keeps its label; the widget re-submits the full
    /// visible state on every interaction, so a re-add of a known point is
    /// not a relabel. Returns true if the point was new.
    pub fn insert_if_absent(&mut self, point: Point, label: LabelId) -> bool {
        if self.points.contains_key(&point) {
            return false;
        }
        self.points.insert(point, label);
        true
    }

    /// Insert or overwrite a point's label.
    pub fn insert(&mut self, point: Point, label: LabelId) {
        self.points.insert(point, label);
    }

    pub fn remove(&mut self, point: Point) -> Option<LabelId> {
        self.points.remove(&point)
    }

    /// Keep only the points for which the predicate holds.
    pub fn retain(&mut self, mut keep: impl FnMut(Point) -> bool) {
        self.points.retain(|point, _| keep(*point));
    }

    /// Iterate in lexicographic (x, y) order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, LabelId)> + '_ {
        self.points.iter().map(|(p, l)| (*p, *l))
    }

    /// Per-label annotation counts for a schema of `label_count` classes.
    ///
    /// Labels outside the schema range are ignored here; serialization
    /// rejects them explicitly instead.
    pub fn counts_per_label(&self, label_count: usize) -> Vec<usize> {
        let mut counts = vec![0usize; label_count];
        for (_, label) in self.iter() {
            if let Some(slot) = counts.get_mut(label) {
                *slot += 1;
            }
        }
        counts
    }
}

impl FromIterator<(Point, LabelId)> for PointStore {
    fn from_iter<T: IntoIterator<Item = (Point, LabelId)>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
