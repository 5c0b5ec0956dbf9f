//! Commonly used types for adapter and widget crates.

pub use crate::controller::{
    ControllerConfig, ControllerState, OverlayPhase, SortController,
};
pub use crate::discover::{DiscoveryConfig, discover_surface};
pub use crate::engine::{EngineConfig, OverlayEngine};
pub use crate::error::{OverlayError, Result};
pub use crate::query;
pub use crate::sequence::SequenceCounter;
pub use crate::sync::{
    NoopSyncObserver, RowSyncService, SyncConfig, SyncObserver,
};
pub use ranklens_contracts::prelude::*;
pub use ranklens_model::prelude::*;
