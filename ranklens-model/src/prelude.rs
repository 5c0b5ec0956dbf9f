//! Frequently used model types for downstream crates.

pub use crate::error::{ModelError, Result as ModelResult};
pub use crate::ids::{NodeId, QuestionId, TableId};
pub use crate::params::{CustomParams, QueryParams, RankRange};
#[cfg(feature = "chrono")]
pub use crate::rank::RankSnapshot;
pub use crate::rank::{Question, RankRecord};
pub use crate::sort::{
    Direction, DirectionField, SortColumn, SortSpec, WireSort,
};
pub use crate::table::{AnchorPoint, HeaderMap, RowHandle, RowSet};
