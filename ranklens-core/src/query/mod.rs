//! Bidirectional mapping between the host page's query string and the
//! structured [`QueryParams`](ranklens_model::QueryParams) model.
//!
//! Parsing is total: unrecognized parameters pass through verbatim,
//! malformed sort entries are dropped entry-wise, and a malformed
//! custom block is dropped segment-wise, never fatally. Serialization
//! is injective over every field the host's canonicalization rule
//! looks at; field order is normalized (`sorting`, then the custom
//! block, then passthrough in original order).
//!
//! No DOM, no network, no clock. Pure data transforms.

mod codec;
mod custom;

pub use codec::{parse, serialize};

/// Host-native sort parameter. The value is a JSON array of
/// `{orderBy, orderDirection}` objects; the direction slot carries
/// either a canonical direction name or a bare-digit cache-busting
/// token.
pub const SORTING_KEY: &str = "sorting";

/// The overlay's single opaque parameter. The value uses only
/// unreserved characters (`a-z`, digits, `.`, `_`) so a host router's
/// canonicalization pass forwards it unchanged.
pub const CUSTOM_KEY: &str = "xrank";
