//! Sort vocabulary shared by the query codec and the controller.
//!
//! `SortColumn` covers both the host's native sortable columns and the
//! overlay-owned `Ranking` column. The wire-facing types distinguish a
//! real direction from the synthetic cache-busting token that may sit in
//! the direction slot of a native sort entry.

use crate::error::{ModelError, Result};
use std::fmt;

/// A sortable column of the problem table.
///
/// `Ranking` is the distinguished overlay-owned key; the host's sort
/// vocabulary does not understand it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SortColumn {
    Title,
    Acceptance,
    Difficulty,
    Frequency,
    Ranking,
}

impl SortColumn {
    /// Host-native columns in their fixed declared order. Positional
    /// header mapping assigns surviving header cells to exactly this
    /// sequence; `Ranking` is injected by the overlay and never mapped
    /// from host markup.
    pub fn native_order() -> &'static [SortColumn] {
        use SortColumn::*;
        &[Title, Acceptance, Difficulty, Frequency]
    }

    /// Value used in the host's `orderBy` field.
    pub fn api_name(&self) -> &'static str {
        match self {
            SortColumn::Title => "TITLE",
            SortColumn::Acceptance => "ACCEPTANCE",
            SortColumn::Difficulty => "DIFFICULTY",
            SortColumn::Frequency => "FREQUENCY",
            SortColumn::Ranking => "RANKING",
        }
    }

    /// Lowercase form used inside the overlay's compact query block.
    pub fn compact_name(&self) -> &'static str {
        match self {
            SortColumn::Title => "title",
            SortColumn::Acceptance => "acceptance",
            SortColumn::Difficulty => "difficulty",
            SortColumn::Frequency => "frequency",
            SortColumn::Ranking => "ranking",
        }
    }

    pub fn parse_api_name(value: &str) -> Result<Self> {
        match value {
            "TITLE" => Ok(SortColumn::Title),
            "ACCEPTANCE" => Ok(SortColumn::Acceptance),
            "DIFFICULTY" => Ok(SortColumn::Difficulty),
            "FREQUENCY" => Ok(SortColumn::Frequency),
            "RANKING" => Ok(SortColumn::Ranking),
            other => Err(ModelError::UnknownColumn(other.to_string())),
        }
    }

    pub fn parse_compact_name(value: &str) -> Result<Self> {
        match value {
            "title" => Ok(SortColumn::Title),
            "acceptance" => Ok(SortColumn::Acceptance),
            "difficulty" => Ok(SortColumn::Difficulty),
            "frequency" => Ok(SortColumn::Frequency),
            "ranking" => Ok(SortColumn::Ranking),
            other => Err(ModelError::UnknownColumn(other.to_string())),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

/// Sort order. `Ascending` is the host's canonical value; a descending
/// direction left in the URL on disable would trigger the host's
/// canonicalization redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// The value the host's canonicalization rule accepts without a
    /// redirect.
    pub fn canonical() -> Self {
        Direction::Ascending
    }

    pub fn api_name(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        }
    }

    pub fn compact_name(&self) -> &'static str {
        match self {
            Direction::Ascending => "ascending",
            Direction::Descending => "descending",
        }
    }

    pub fn parse_api_name(value: &str) -> Result<Self> {
        match value {
            "ASCENDING" => Ok(Direction::Ascending),
            "DESCENDING" => Ok(Direction::Descending),
            other => Err(ModelError::InvalidDirection(other.to_string())),
        }
    }

    pub fn parse_compact_name(value: &str) -> Result<Self> {
        match value {
            "ascending" => Ok(Direction::Ascending),
            "descending" => Ok(Direction::Descending),
            other => Err(ModelError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

/// One sort instruction as the overlay reasons about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortSpec {
    pub order_by: SortColumn,
    pub direction: Direction,
}

impl SortSpec {
    pub fn new(order_by: SortColumn, direction: Direction) -> Self {
        Self {
            order_by,
            direction,
        }
    }

    /// "Same column, different direction" comparisons go through here.
    pub fn same_column(&self, other: &SortSpec) -> bool {
        self.order_by == other.order_by
    }
}

/// Wire-side value of the direction-adjacent field in a native sort
/// entry: either a real direction or the synthetic cache-busting token.
/// The token has no sort meaning; it exists only to make the full query
/// string distinct from every previously cached one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionField {
    Direction(Direction),
    Token(u64),
}

impl DirectionField {
    /// Parses the string form found in the host's `orderDirection` slot.
    pub fn parse_wire(value: &str) -> Result<Self> {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            let token = value
                .parse::<u64>()
                .map_err(|e| ModelError::InvalidDirection(e.to_string()))?;
            return Ok(DirectionField::Token(token));
        }
        Direction::parse_api_name(value).map(DirectionField::Direction)
    }

    pub fn as_direction(&self) -> Option<Direction> {
        match self {
            DirectionField::Direction(direction) => Some(*direction),
            DirectionField::Token(_) => None,
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self, DirectionField::Token(_))
    }
}

impl fmt::Display for DirectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionField::Direction(direction) => {
                write!(f, "{}", direction.api_name())
            }
            DirectionField::Token(token) => write!(f, "{token}"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DirectionField {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DirectionField {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DirectionField::parse_wire(&raw).map_err(serde::de::Error::custom)
    }
}

/// One entry of the host-native `sorting` sequence as it appears on the
/// wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WireSort {
    pub order_by: SortColumn,
    pub order_direction: DirectionField,
}

impl WireSort {
    pub fn new(order_by: SortColumn, order_direction: DirectionField) -> Self {
        Self {
            order_by,
            order_direction,
        }
    }

    /// A canonical entry the host accepts without redirecting.
    pub fn canonical(order_by: SortColumn) -> Self {
        Self {
            order_by,
            order_direction: DirectionField::Direction(Direction::canonical()),
        }
    }

    pub fn from_spec(spec: SortSpec) -> Self {
        Self {
            order_by: spec.order_by,
            order_direction: DirectionField::Direction(spec.direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_field_distinguishes_tokens_from_directions() {
        assert_eq!(
            DirectionField::parse_wire("ASCENDING").unwrap(),
            DirectionField::Direction(Direction::Ascending)
        );
        assert_eq!(
            DirectionField::parse_wire("1000042").unwrap(),
            DirectionField::Token(1000042)
        );
        assert!(DirectionField::parse_wire("sideways").is_err());
        assert!(DirectionField::parse_wire("").is_err());
    }

    #[test]
    fn native_order_excludes_ranking() {
        assert!(!SortColumn::native_order().contains(&SortColumn::Ranking));
        assert_eq!(SortColumn::native_order().len(), 4);
    }

    #[test]
    fn same_column_ignores_direction() {
        let a = SortSpec::new(SortColumn::Acceptance, Direction::Ascending);
        let b = SortSpec::new(SortColumn::Acceptance, Direction::Descending);
        assert!(a.same_column(&b));
        assert_ne!(a, b);
    }
}
