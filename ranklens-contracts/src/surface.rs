//! Read-only discovery surface over the host's table DOM.
//!
//! The adapter that implements [`TableSurface`] owns the real DOM
//! bindings. Core receives snapshots and change notifications only; it
//! never holds a live node reference, so a host re-render can never
//! leave it with a dangling pointer.

use std::fmt;

use ranklens_model::NodeId;
use tokio::sync::mpsc;

use crate::error::Result;

/// One change notification from the host table.
#[derive(Debug, Clone)]
pub enum TableMutation {
    /// The row-group's child list changed (rows inserted, removed, or
    /// replaced out-of-band by the host).
    ChildList,
    /// The underlying observer failed; the synchronizer re-scans and
    /// reports through its observer hook.
    SurfaceError(String),
}

/// A header cell snapshot: node identity plus trimmed cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub node: NodeId,
    pub text: String,
}

/// The header row with its cells in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow {
    pub node: NodeId,
    pub cells: Vec<HeaderCell>,
}

/// One immediate child of the row-group container. Non-element nodes
/// (text, comments) are reported so the synchronizer can filter them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowNode {
    pub node: NodeId,
    pub is_element: bool,
}

/// RAII unsubscribe handle returned by [`TableSurface::subscribe`].
/// Dropping it detaches the underlying DOM observer.
pub struct SubscriptionGuard {
    on_drop: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionGuard {
    pub fn new(on_drop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_drop: Some(Box::new(on_drop)),
        }
    }

    /// Guard for surfaces that need no explicit teardown.
    pub fn noop() -> Self {
        Self { on_drop: None }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(on_drop) = self.on_drop.take() {
            on_drop();
        }
    }
}

impl fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("armed", &self.on_drop.is_some())
            .finish()
    }
}

/// Snapshot reads and change notifications for one host table.
///
/// Snapshots reflect the DOM at call time. `subscribe` registers a
/// child-list observer on the row-group container that pushes into
/// `sink`; senders must not block the UI thread (use `try_send` and
/// drop on overflow, since the synchronizer re-scans fully anyway).
pub trait TableSurface: Send + Sync {
    fn header_row(&self) -> Option<HeaderRow>;

    fn body_rows(&self) -> Vec<RowNode>;

    fn subscribe(
        &self,
        sink: mpsc::Sender<TableMutation>,
    ) -> Result<SubscriptionGuard>;
}
