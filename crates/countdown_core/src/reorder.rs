//! Drag-and-drop relocation.
//!
//! The drag gesture reports `start(source)`, a stream of `over(target)`,
//! `drop(target, cursor_y, bounds)` and `end`. A drop places the source
//! before or after the target in the visible order, which is then folded back
//! into the full order. Dragging is only offered under the `all` filter.

use crate::model::Filter;
use std::collections::HashSet;

/// Vertical extent of the todo row the cursor was dropped on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBounds {
    pub top: f64,
    pub height: f64,
}

impl TargetBounds {
    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPlacement {
    Before,
    After,
}

impl DropPlacement {
    /// Below the midpoint of the target means after it; on or above means
    /// before it.
    pub fn from_cursor(cursor_y: f64, bounds: TargetBounds) -> Self {
        if cursor_y > bounds.midpoint() {
            Self::After
        } else {
            Self::Before
        }
    }
}

/// Tracks the todo currently being dragged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragSession {
    source: Option<String>,
}

impl DragSession {
    /// Starts a drag. Refused when reordering is disabled for `filter`.
    pub fn start(&mut self, source_id: &str, filter: Filter) -> bool {
        if !reorder_enabled(filter) {
            self.source = None;
            return false;
        }
        self.source = Some(source_id.to_string());
        true
    }

    /// Returns whether the host should suppress its default drop handling,
    /// which is the case for as long as a drag is in progress.
    pub fn over(&self, _target_id: &str) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    pub fn end(&mut self) -> Option<String> {
        self.source.take()
    }
}

pub fn reorder_enabled(filter: Filter) -> bool {
    filter == Filter::All
}

/// Moves `source` next to `target` inside the visible order. Returns `None`
/// when either id is not visible or both are the same row.
pub fn relocate<S: AsRef<str>>(
    visible: &[S],
    source: &str,
    target: &str,
    placement: DropPlacement,
) -> Option<Vec<String>> {
    if source == target {
        return None;
    }

    let mut order: Vec<String> = visible.iter().map(|id| id.as_ref().to_string()).collect();
    let source_index = order.iter().position(|id| id == source)?;
    order.iter().position(|id| id == target)?;

    let moved = order.remove(source_index);
    let target_index = order.iter().position(|id| id == target)?;
    let insert_at = match placement {
        DropPlacement::Before => target_index,
        DropPlacement::After => target_index + 1,
    };
    order.insert(insert_at, moved);
    Some(order)
}

/// Folds a rearranged visible subset back into the full order: the slots the
/// visible ids occupied are refilled in their new order, everything else
/// stays where it was.
pub fn reconcile<F: AsRef<str>, V: AsRef<str>>(full: &[F], visible: &[V]) -> Vec<String> {
    let visible_set: HashSet<&str> = visible.iter().map(AsRef::as_ref).collect();
    let mut replacements = visible.iter().map(|id| id.as_ref().to_string());

    full.iter()
        .map(|id| {
            let id = id.as_ref();
            if visible_set.contains(id) {
                replacements.next().unwrap_or_else(|| id.to_string())
            } else {
                id.to_string()
            }
        })
        .collect()
}
