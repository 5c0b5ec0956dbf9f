//! Structured view of the host page's query string.

use crate::error::{ModelError, Result};
use crate::sort::{SortSpec, WireSort};

/// Inclusive rank interval used by the overlay's range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankRange {
    min: u32,
    max: u32,
}

impl RankRange {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(ModelError::InvalidRange(format!(
                "min {min} exceeds max {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, rating: f64) -> bool {
        rating >= f64::from(self.min) && rating <= f64::from(self.max)
    }
}

/// Overlay intent that the host's native sort vocabulary cannot express.
///
/// Created when the user first sorts by rank or sets a range filter;
/// destroyed when the feature is disabled and no other custom intent
/// remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomParams {
    pub sort: Option<SortSpec>,
    pub rank_range: Option<RankRange>,
}

impl CustomParams {
    pub fn is_empty(&self) -> bool {
        self.sort.is_none() && self.rank_range.is_none()
    }
}

/// Structured decoding of the full query string.
///
/// `passthrough` preserves every parameter this overlay does not
/// recognize (pagination, host filters) verbatim and in original order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    pub sorting: Option<Vec<WireSort>>,
    pub custom: Option<CustomParams>,
    pub passthrough: Vec<(String, String)>,
}

impl QueryParams {
    /// The custom block, materializing an empty one on first use.
    pub fn custom_mut(&mut self) -> &mut CustomParams {
        self.custom.get_or_insert_with(CustomParams::default)
    }

    /// Drops the custom block when nothing is left inside it.
    pub fn prune_custom(&mut self) {
        if self.custom.is_some_and(|custom| custom.is_empty()) {
            self.custom = None;
        }
    }

    pub fn custom_sort(&self) -> Option<SortSpec> {
        self.custom.and_then(|custom| custom.sort)
    }

    pub fn rank_range(&self) -> Option<RankRange> {
        self.custom.and_then(|custom| custom.rank_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{Direction, SortColumn};

    #[test]
    fn rank_range_rejects_inverted_bounds() {
        assert!(RankRange::new(2400, 1200).is_err());
        let range = RankRange::new(1200, 2400).unwrap();
        assert!(range.contains(1200.0));
        assert!(range.contains(2400.0));
        assert!(!range.contains(2400.5));
    }

    #[test]
    fn prune_custom_removes_empty_blocks_only() {
        let mut params = QueryParams::default();
        params.custom_mut().sort =
            Some(SortSpec::new(SortColumn::Ranking, Direction::Ascending));
        params.prune_custom();
        assert!(params.custom.is_some());

        params.custom_mut().sort = None;
        params.prune_custom();
        assert!(params.custom.is_none());
    }
}
