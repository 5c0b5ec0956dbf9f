//! Stable references into host-owned table DOM.
//!
//! Handles are attachment points only. The overlay never mutates the
//! structure of the nodes they name; widgets mount into portal
//! containers the overlay created itself.

use crate::ids::NodeId;
use crate::sort::SortColumn;

/// Ordering-stable reference to one host table body row. Valid until
/// the synchronizer's next republish invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowHandle {
    pub node: NodeId,
    pub position: usize,
}

/// One full republish of the table body, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowSet {
    /// Bumped on every republish; consumers drop handles from older
    /// generations.
    pub generation: u64,
    pub rows: Vec<RowHandle>,
}

impl RowSet {
    pub fn empty(generation: u64) -> Self {
        Self {
            generation,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Mapping from sortable column to the host's header cell, built once
/// per header-row identity. Entries keep the native declared order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderMap {
    entries: Vec<(SortColumn, NodeId)>,
}

impl HeaderMap {
    pub fn new(entries: Vec<(SortColumn, NodeId)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, column: SortColumn) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == column)
            .map(|(_, node)| *node)
    }

    pub fn contains(&self, column: SortColumn) -> bool {
        self.get(column).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SortColumn, NodeId)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Screen position of the control that triggered a deactivation. The
/// lingering close affordance stays anchored here after the host has
/// already unmounted the control itself.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorPoint {
    pub x: f64,
    pub y: f64,
}

impl AnchorPoint {
    /// Fallback when the trigger control was unmounted before its
    /// position could be read.
    pub const OFF_SCREEN: AnchorPoint = AnchorPoint {
        x: -10_000.0,
        y: -10_000.0,
    };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
