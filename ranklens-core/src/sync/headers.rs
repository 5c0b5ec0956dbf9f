//! Positional header-to-column mapping.
//!
//! Coupled to the host's column order and header labels, which is
//! fragile by nature, so the whole rule lives in one pure function
//! taking the exclusion set and column order as explicit arguments.

use ranklens_contracts::HeaderCell;
use ranklens_model::{HeaderMap, SortColumn};

/// Header cells that are not sortable columns in the host table.
pub const DEFAULT_EXCLUDED_HEADERS: &[&str] = &["status", "company"];

/// Walks header cells in document order, drops cells whose trimmed
/// text matches the exclusion set (case-insensitive), and assigns the
/// survivors positionally to `order`. Cells beyond the enumerated
/// column count are ignored.
pub fn map_headers(
    cells: &[HeaderCell],
    excluded: &[&str],
    order: &[SortColumn],
) -> HeaderMap {
    let mut entries = Vec::with_capacity(order.len());
    let mut columns = order.iter();
    for cell in cells {
        let text = cell.text.trim();
        if excluded.iter().any(|skip| text.eq_ignore_ascii_case(skip)) {
            continue;
        }
        let Some(column) = columns.next() else {
            break;
        };
        entries.push((*column, cell.node));
    }
    HeaderMap::new(entries)
}
