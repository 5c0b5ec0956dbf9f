//! Core data model definitions shared across Ranklens crates.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod params;
pub mod prelude;
pub mod rank;
pub mod sort;
pub mod table;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::{NodeId, QuestionId, TableId};
pub use params::{CustomParams, QueryParams, RankRange};
pub use rank::{Question, RankRecord};
#[cfg(feature = "chrono")]
pub use rank::RankSnapshot;
pub use sort::{Direction, DirectionField, SortColumn, SortSpec, WireSort};
pub use table::{AnchorPoint, HeaderMap, RowHandle, RowSet};
