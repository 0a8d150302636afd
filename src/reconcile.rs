//! Patch reconciliation.
//!
//! A patch is the widget's complete report of the points currently visible
//! in the interacting viewport. Merging it into the global store means:
//! points in the patch but not in the store were added by the user; points
//! in the store but not in the patch were deleted. Both directions are
//! resolved in one call.

use std::collections::HashSet;

use crate::state::{Point, PointStore};
use crate::widget::PatchPoint;

/// Counts of what a reconciliation changed, for status reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub added: usize,
    pub removed: usize,
}

/// Merge a widget patch into the store.
///
/// Two independent passes over the full patch:
///
/// 1. Every patch point missing from the store is inserted with its patch
///    label. Points already present keep their stored label, and the first
///    occurrence wins when a coordinate appears twice within one patch.
/// 2. Every stored point absent from the patch's key set is removed,
///    together with its label.
///
/// The removal pass tests membership against a prebuilt key set, so a full
/// reconciliation is O(P + S) rather than a per-point scan of the patch.
/// Applying the same patch twice is a no-op the second time.
pub fn reconcile(store: &mut PointStore, patch: &[PatchPoint]) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    let mut patch_keys: HashSet<Point> = HashSet::with_capacity(patch.len());
    for entry in patch {
        if store.insert_if_absent(entry.point, entry.label_id) {
            outcome.added += 1;
        }
        patch_keys.insert(entry.point);
    }

    let before = store.len();
    store.retain(|point| patch_keys.contains(&point));
    outcome.removed = before - store.len();

    outcome
}
