//! Trait surfaces that describe the host environment the Ranklens
//! overlay augments.
//!
//! Everything the overlay cannot own lives behind these seams: the
//! host's client-side router, the live table DOM, the rank data layer,
//! and the presentational widget layer. Implementations are supplied by
//! the embedding adapter; `ranklens-core` only ever sees trait objects.

pub mod error;
pub mod renderer;
pub mod router;
pub mod source;
pub mod surface;

/// Frequently used contract types for core and adapter crates.
pub mod prelude {
    pub use super::error::{HostError, Result as HostResult};
    pub use super::renderer::OverlayRenderer;
    pub use super::router::{HostRouter, RouteLocation};
    pub use super::source::RankSource;
    pub use super::surface::{
        HeaderCell, HeaderRow, RowNode, SubscriptionGuard, TableMutation,
        TableSurface,
    };
}

pub use error::{HostError, Result};
pub use renderer::OverlayRenderer;
pub use router::{HostRouter, RouteLocation};
pub use source::RankSource;
pub use surface::{
    HeaderCell, HeaderRow, RowNode, SubscriptionGuard, TableMutation,
    TableSurface,
};
