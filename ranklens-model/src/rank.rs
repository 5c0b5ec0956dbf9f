//! DTOs supplied by the external rank data layer.

use crate::ids::QuestionId;

/// One problem's contest-derived rating.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RankRecord {
    pub question_id: QuestionId,
    pub rating: f64,
}

/// One entry of the host's question list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Question {
    pub question_id: QuestionId,
    pub title_slug: String,
    pub paid_only: bool,
}

/// Rank and question data joined at fetch time.
///
/// A snapshot is immutable once taken; a new activation produces a new
/// snapshot rather than patching the old one.
#[cfg(feature = "chrono")]
#[derive(Debug, Clone, PartialEq)]
pub struct RankSnapshot {
    pub records: Vec<RankRecord>,
    pub questions: Vec<Question>,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(feature = "chrono")]
impl RankSnapshot {
    pub fn new(records: Vec<RankRecord>, questions: Vec<Question>) -> Self {
        Self {
            records,
            questions,
            fetched_at: chrono::Utc::now(),
        }
    }

    pub fn rating_for(&self, question_id: QuestionId) -> Option<f64> {
        self.records
            .iter()
            .find(|record| record.question_id == question_id)
            .map(|record| record.rating)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
