//! # Ranklens Core
//!
//! Core library for the Ranklens overlay: the machinery that lets a
//! custom "rank" ordering coexist with a host single-page application's
//! router and query-keyed response cache, and that keeps injected row
//! and header content attached to a table the host re-renders
//! out-of-band.
//!
//! ## Overview
//!
//! - **Query codec**: total parse / injective serialize between the
//!   host's query string and a structured parameter model that
//!   separates native sort instructions from overlay-owned custom
//!   parameters
//! - **Cache-busting sequencer**: session-scoped monotonic tokens that
//!   defeat the host's query-keyed response cache while a custom
//!   ordering is active
//! - **Sort controller**: the enable/disable state machine that decides
//!   what to write into the URL and when to navigate
//! - **Row/column synchronizer**: debounced child-list observation of
//!   the host table with full-replacement republish of row and header
//!   attachment points
//! - **Overlay engine**: discovery plus the wiring that drives an
//!   [`OverlayRenderer`](ranklens_contracts::OverlayRenderer) from
//!   controller and synchronizer state
//!
//! The host environment itself (router, table DOM, data layer, widgets)
//! sits behind the trait surfaces in `ranklens-contracts`; this crate
//! never touches a real DOM node.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Sort controller state machine
pub mod controller;
/// Bounded-patience discovery of the host table surface
pub mod discover;
/// Wiring between controller, synchronizer, and renderer
pub mod engine;
/// Crate error type
pub mod error;
/// Commonly used types
pub mod prelude;
/// Query-string codec
pub mod query;
/// Cache-busting sequence tokens
pub mod sequence;
/// Row/column synchronizer
pub mod sync;

pub use controller::{ControllerConfig, ControllerState, OverlayPhase, SortController};
pub use discover::{DiscoveryConfig, discover_surface};
pub use engine::{EngineConfig, OverlayEngine};
pub use error::{OverlayError, Result};
pub use sequence::SequenceCounter;
pub use sync::{NoopSyncObserver, RowSyncService, SyncConfig, SyncObserver};
