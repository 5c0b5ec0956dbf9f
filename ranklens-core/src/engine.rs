//! Overlay engine: the wiring between the sort controller, the row
//! synchronizer, and the presentational renderer.
//!
//! Navigation events and data fetches flow through the controller; the
//! synchronizer independently observes the host table. The engine's
//! only job is to forward both streams of state into the renderer and
//! to tear everything down as one unit.

use std::fmt;
use std::sync::Arc;

use ranklens_contracts::{
    HostRouter, OverlayRenderer, RankSource, TableSurface,
};
use ranklens_model::{HeaderMap, RankSnapshot, RowSet, TableId};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::controller::{ControllerConfig, OverlayPhase, SortController};
use crate::discover::{DiscoveryConfig, discover_surface};
use crate::error::{OverlayError, Result};
use crate::sequence::SequenceCounter;
use crate::sync::{RowSyncService, SyncConfig, SyncObserver};

#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    pub controller: ControllerConfig,
    pub sync: SyncConfig,
    pub discovery: DiscoveryConfig,
}

/// Routes synchronizer errors into the log; the overlay carries no
/// metrics pipeline.
struct LogSyncObserver;

impl SyncObserver for LogSyncObserver {
    fn on_error(&self, table_id: TableId, error: &str) {
        warn!("table {table_id} sync error: {error}");
    }
}

impl fmt::Debug for LogSyncObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LogSyncObserver")
    }
}

/// One overlay instance over one host page.
pub struct OverlayEngine {
    controller: SortController,
    sync: RowSyncService<LogSyncObserver>,
    renderer: Arc<dyn OverlayRenderer>,
    config: EngineConfig,
    table_id: TableId,
    forward_task: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for OverlayEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayEngine")
            .field("table_id", &self.table_id)
            .field("controller", &self.controller)
            .finish()
    }
}

impl OverlayEngine {
    pub fn new(
        router: Arc<dyn HostRouter>,
        source: Arc<dyn RankSource>,
        renderer: Arc<dyn OverlayRenderer>,
        config: EngineConfig,
    ) -> Self {
        let controller = SortController::new(
            router,
            source,
            SequenceCounter::new(),
            config.controller.clone(),
        );
        let sync = RowSyncService::new(
            config.sync.clone(),
            Arc::new(LogSyncObserver),
        );
        Self {
            controller,
            sync,
            renderer,
            config,
            table_id: TableId::new(),
            forward_task: Mutex::new(None),
        }
    }

    /// Discover the host table and start driving the renderer.
    ///
    /// A host without the expected markup leaves the engine inert: the
    /// overlay renders nothing rather than surfacing an error.
    pub async fn start<F>(&self, probe: F) -> Result<()>
    where
        F: FnMut() -> Option<Arc<dyn TableSurface>>,
    {
        let surface =
            match discover_surface(probe, &self.config.discovery).await {
                Ok(surface) => surface,
                Err(OverlayError::HostUnavailable(reason)) => {
                    warn!("overlay unavailable: {reason}");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };

        self.sync.register_table(self.table_id, surface).await?;
        let rows_rx = self
            .sync
            .rows_watch(self.table_id)
            .await
            .ok_or_else(|| {
                OverlayError::Internal("table registration vanished".into())
            })?;
        let headers_rx = self
            .sync
            .headers_watch(self.table_id)
            .await
            .ok_or_else(|| {
                OverlayError::Internal("table registration vanished".into())
            })?;

        let task = tokio::spawn(forward_loop(
            Arc::clone(&self.renderer),
            self.controller.phase_watch(),
            self.controller.snapshot_watch(),
            rows_rx,
            headers_rx,
        ));
        if let Some(previous) = self.forward_task.lock().await.replace(task)
        {
            previous.abort();
        }
        Ok(())
    }

    /// Controller handle for wiring user interactions (header clicks,
    /// range filter edits) into URL rewrites.
    pub fn controller(&self) -> &SortController {
        &self.controller
    }

    pub async fn shutdown(&self) {
        if let Some(task) = self.forward_task.lock().await.take() {
            task.abort();
        }
        self.sync.unregister_table(self.table_id).await;
        self.controller.shutdown().await;
    }
}

async fn forward_loop(
    renderer: Arc<dyn OverlayRenderer>,
    mut phase_rx: watch::Receiver<OverlayPhase>,
    mut snapshot_rx: watch::Receiver<Option<RankSnapshot>>,
    mut rows_rx: watch::Receiver<RowSet>,
    mut headers_rx: watch::Receiver<HeaderMap>,
) {
    // Deliver current state up front; the synchronizer's initial scan
    // may have published before we subscribed.
    {
        let phase = *phase_rx.borrow_and_update();
        renderer.set_visible(phase.visible, phase.anchor);
        let snapshot = snapshot_rx.borrow_and_update().clone();
        renderer.apply_snapshot(snapshot.as_ref());
        let rows = rows_rx.borrow_and_update().clone();
        renderer.apply_rows(&rows);
        let headers = headers_rx.borrow_and_update().clone();
        renderer.apply_headers(&headers);
    }

    loop {
        tokio::select! {
            changed = phase_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let phase = *phase_rx.borrow_and_update();
                renderer.set_visible(phase.visible, phase.anchor);
            }
            changed = snapshot_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshot_rx.borrow_and_update().clone();
                renderer.apply_snapshot(snapshot.as_ref());
            }
            changed = rows_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let rows = rows_rx.borrow_and_update().clone();
                renderer.apply_rows(&rows);
            }
            changed = headers_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let headers = headers_rx.borrow_and_update().clone();
                renderer.apply_headers(&headers);
            }
        }
    }
}
