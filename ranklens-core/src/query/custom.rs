//! Compact wire grammar for the overlay's custom parameter block.
//!
//! Segments are joined by `_`, fields inside a segment by `.`:
//! `sort.ranking.ascending_range.1200.2400`. Both characters belong to
//! the form-urlencoded safe set, so the encoded value never picks up
//! percent escapes that a host canonicalization pass might normalize
//! differently.

use ranklens_model::{CustomParams, Direction, RankRange, SortColumn, SortSpec};
use tracing::debug;

const SEGMENT_SEPARATOR: char = '_';
const FIELD_SEPARATOR: char = '.';

const SORT_TAG: &str = "sort";
const RANGE_TAG: &str = "range";

pub(crate) fn encode(custom: &CustomParams) -> String {
    let mut segments = Vec::with_capacity(2);
    if let Some(sort) = custom.sort {
        segments.push(format!(
            "{SORT_TAG}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            sort.order_by.compact_name(),
            sort.direction.compact_name()
        ));
    }
    if let Some(range) = custom.rank_range {
        segments.push(format!(
            "{RANGE_TAG}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            range.min(),
            range.max()
        ));
    }
    let separator = SEGMENT_SEPARATOR.to_string();
    segments.join(&separator)
}

/// Decodes a custom block, dropping malformed segments. Returns `None`
/// when nothing intelligible remains.
pub(crate) fn decode(raw: &str) -> Option<CustomParams> {
    let mut custom = CustomParams::default();
    for segment in raw.split(SEGMENT_SEPARATOR).filter(|s| !s.is_empty()) {
        let fields: Vec<&str> = segment.split(FIELD_SEPARATOR).collect();
        match fields.as_slice() {
            &[SORT_TAG, column, direction] => {
                match parse_sort(column, direction) {
                    Some(sort) => custom.sort = Some(sort),
                    None => debug!("dropping malformed sort segment: {segment}"),
                }
            }
            &[RANGE_TAG, min, max] => match parse_range(min, max) {
                Some(range) => custom.rank_range = Some(range),
                None => debug!("dropping malformed range segment: {segment}"),
            },
            _ => debug!("dropping unrecognized custom segment: {segment}"),
        }
    }
    (!custom.is_empty()).then_some(custom)
}

fn parse_sort(column: &str, direction: &str) -> Option<SortSpec> {
    let order_by = SortColumn::parse_compact_name(column).ok()?;
    let direction = Direction::parse_compact_name(direction).ok()?;
    Some(SortSpec::new(order_by, direction))
}

fn parse_range(min: &str, max: &str) -> Option<RankRange> {
    let min = min.parse::<u32>().ok()?;
    let max = max.parse::<u32>().ok()?;
    RankRange::new(min, max).ok()
}
