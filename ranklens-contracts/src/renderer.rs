//! Presentational widget layer.

use ranklens_model::{AnchorPoint, HeaderMap, RankSnapshot, RowSet};

/// Consumes attachment points and overlay state; owns the actual
/// widgets (range filter, icons, predictor cells).
///
/// Calls arrive in no guaranteed relative order across the three
/// channels; implementations must tolerate any interleaving and
/// re-render idempotently keyed by row position.
pub trait OverlayRenderer: Send + Sync {
    /// Show or hide the overlay root. On hide, `anchor` is where the
    /// lingering close affordance stays mounted.
    fn set_visible(&self, visible: bool, anchor: AnchorPoint);

    /// A full replacement row set from the synchronizer.
    fn apply_rows(&self, rows: &RowSet);

    /// A rebuilt header map after a header identity change.
    fn apply_headers(&self, headers: &HeaderMap);

    /// Rank data arrived (or was cleared). `None` means render without
    /// rank annotations.
    fn apply_snapshot(&self, snapshot: Option<&RankSnapshot>);
}
