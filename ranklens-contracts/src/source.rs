//! External rank data layer.

use async_trait::async_trait;
use ranklens_model::{Question, RankRecord};

use crate::error::Result;

/// Supplies ranking and question data. Both calls may fail; failures
/// must never crash the overlay, which simply renders without rank
/// annotations. Retry policy belongs to the implementation, not the
/// caller.
#[async_trait]
pub trait RankSource: Send + Sync {
    async fn fetch_rank_data(&self) -> Result<Vec<RankRecord>>;

    async fn fetch_question_list(&self) -> Result<Vec<Question>>;
}
