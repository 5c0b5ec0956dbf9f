//! Row/column synchronizer for host-owned tables.
//!
//! A thin layer over the host adapter's child-list notifications that
//! debounces bursts into a single re-scan and republishes the full
//! ordered row set. Partial diffs are never computed; downstream
//! consumers re-render idempotently keyed by position, so full
//! replacement is both simpler and correctness-preserving when the
//! host swaps rows out-of-band.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ranklens_contracts::{SubscriptionGuard, TableMutation, TableSurface};
use ranklens_model::{HeaderMap, NodeId, RowHandle, RowSet, SortColumn, TableId};
use tokio::sync::{RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};
use tracing::debug;

use crate::error::Result;

pub mod headers;

/// Configuration knobs for table synchronization.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Debounce window for coalescing rapid mutation bursts, sized so
    /// pagination and page-size changes collapse into one re-scan.
    pub debounce_window: Duration,
    /// Capacity of the mutation intake channel. Overflow is harmless:
    /// a dropped notification is subsumed by the full re-scan the
    /// surviving ones trigger.
    pub max_pending_mutations: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(500),
            max_pending_mutations: 256,
        }
    }
}

/// Observer hook for surfacing synchronizer errors.
pub trait SyncObserver: Send + Sync {
    fn on_error(&self, table_id: TableId, error: &str);
}

/// No-op observer used when nothing is wired up.
pub struct NoopSyncObserver;

impl SyncObserver for NoopSyncObserver {
    fn on_error(&self, _table_id: TableId, _error: &str) {}
}

impl fmt::Debug for NoopSyncObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NoopSyncObserver")
    }
}

/// Tracks host tables and republishes row/header attachment points as
/// the host re-renders them.
pub struct RowSyncService<O: SyncObserver = NoopSyncObserver> {
    config: SyncConfig,
    observer: Arc<O>,
    tables: Arc<RwLock<HashMap<TableId, TableWatch>>>,
}

impl<O: SyncObserver + 'static> fmt::Debug for RowSyncService<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("RowSyncService");
        debug
            .field("config", &self.config)
            .field("observer_type", &std::any::type_name::<O>());
        match self.tables.try_read() {
            Ok(guard) => {
                debug.field("table_count", &guard.len());
            }
            Err(_) => {
                debug.field("tables", &"<locked>");
            }
        }
        debug.finish()
    }
}

impl<O: SyncObserver + 'static> RowSyncService<O> {
    pub fn new(config: SyncConfig, observer: Arc<O>) -> Self {
        Self {
            config,
            observer,
            tables: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Attach to the supplied table surface. An initial scan publishes
    /// immediately; afterwards republishes follow debounced mutation
    /// bursts. Registration is idempotent per table id.
    pub async fn register_table(
        &self,
        table_id: TableId,
        surface: Arc<dyn TableSurface>,
    ) -> Result<()> {
        {
            let guard = self.tables.read().await;
            if guard.contains_key(&table_id) {
                return Ok(());
            }
        }

        let capacity = self.config.max_pending_mutations.max(16);
        let (tx, rx) = mpsc::channel::<TableMutation>(capacity);
        let subscription = surface.subscribe(tx)?;

        let (rows_tx, _) = watch::channel(RowSet::default());
        let (headers_tx, _) = watch::channel(HeaderMap::default());
        let rows_tx = Arc::new(rows_tx);
        let headers_tx = Arc::new(headers_tx);

        let sync_task = spawn_sync_loop(
            table_id,
            surface,
            rx,
            Arc::clone(&rows_tx),
            Arc::clone(&headers_tx),
            Arc::clone(&self.observer),
            self.config.clone(),
        );

        let mut guard = self.tables.write().await;
        if guard.contains_key(&table_id) {
            sync_task.abort();
            return Ok(());
        }
        guard.insert(
            table_id,
            TableWatch {
                rows_tx,
                headers_tx,
                _subscription: subscription,
                sync_task,
            },
        );
        Ok(())
    }

    /// Live row handles for the table, if registered.
    pub async fn rows_watch(
        &self,
        table_id: TableId,
    ) -> Option<watch::Receiver<RowSet>> {
        self.tables
            .read()
            .await
            .get(&table_id)
            .map(|watch| watch.rows_tx.subscribe())
    }

    /// Live header map for the table, if registered.
    pub async fn headers_watch(
        &self,
        table_id: TableId,
    ) -> Option<watch::Receiver<HeaderMap>> {
        self.tables
            .read()
            .await
            .get(&table_id)
            .map(|watch| watch.headers_tx.subscribe())
    }

    /// Stop tracking the table and clear its published handles.
    pub async fn unregister_table(&self, table_id: TableId) {
        if let Some(watch) = self.tables.write().await.remove(&table_id) {
            watch.shutdown();
        }
    }

    /// Tear down every registered table.
    pub async fn shutdown(&self) {
        let mut guard = self.tables.write().await;
        let watches: Vec<_> = guard.drain().map(|(_, watch)| watch).collect();
        drop(guard);
        for watch in watches {
            watch.shutdown();
        }
    }

    #[cfg(test)]
    pub async fn table_count(&self) -> usize {
        self.tables.read().await.len()
    }
}

struct TableWatch {
    rows_tx: Arc<watch::Sender<RowSet>>,
    headers_tx: Arc<watch::Sender<HeaderMap>>,
    _subscription: SubscriptionGuard,
    sync_task: JoinHandle<()>,
}

impl TableWatch {
    fn shutdown(self) {
        self.sync_task.abort();
        // Stale handles must not outlive the registration.
        let generation = self.rows_tx.borrow().generation + 1;
        self.rows_tx.send_replace(RowSet::empty(generation));
        self.headers_tx.send_replace(HeaderMap::default());
        // Dropping `_subscription` detaches the host observer.
    }
}

impl fmt::Debug for TableWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableWatch")
            .field("generation", &self.rows_tx.borrow().generation)
            .field("sync_task_finished", &self.sync_task.is_finished())
            .finish()
    }
}

fn spawn_sync_loop<O: SyncObserver + 'static>(
    table_id: TableId,
    surface: Arc<dyn TableSurface>,
    mut rx: mpsc::Receiver<TableMutation>,
    rows_tx: Arc<watch::Sender<RowSet>>,
    headers_tx: Arc<watch::Sender<HeaderMap>>,
    observer: Arc<O>,
    config: SyncConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut generation: u64 = 0;
        let mut header_identity: Option<NodeId> = None;

        // Initial scan: consumers get attachment points without
        // waiting for the host to mutate the table first.
        generation += 1;
        republish(
            surface.as_ref(),
            &rows_tx,
            &headers_tx,
            generation,
            &mut header_identity,
        );

        let mut dirty = false;
        loop {
            let msg = if dirty {
                match timeout(config.debounce_window, rx.recv()).await {
                    Ok(msg) => msg,
                    Err(_) => {
                        // Window elapsed with no further notifications.
                        dirty = false;
                        generation += 1;
                        republish(
                            surface.as_ref(),
                            &rows_tx,
                            &headers_tx,
                            generation,
                            &mut header_identity,
                        );
                        continue;
                    }
                }
            } else {
                rx.recv().await
            };

            let Some(msg) = msg else {
                if dirty {
                    generation += 1;
                    republish(
                        surface.as_ref(),
                        &rows_tx,
                        &headers_tx,
                        generation,
                        &mut header_identity,
                    );
                }
                break;
            };

            match msg {
                TableMutation::ChildList => dirty = true,
                TableMutation::SurfaceError(error) => {
                    observer.on_error(table_id, &error);
                    // Re-scan rather than trust whatever state the
                    // broken observer left behind.
                    dirty = true;
                }
            }
        }
        debug!("sync loop for table {table_id} ended");
    })
}

fn republish(
    surface: &dyn TableSurface,
    rows_tx: &watch::Sender<RowSet>,
    headers_tx: &watch::Sender<HeaderMap>,
    generation: u64,
    header_identity: &mut Option<NodeId>,
) {
    let rows: Vec<RowHandle> = surface
        .body_rows()
        .into_iter()
        .filter(|node| node.is_element)
        .enumerate()
        .map(|(position, node)| RowHandle {
            node: node.node,
            position,
        })
        .collect();
    rows_tx.send_replace(RowSet { generation, rows });

    match surface.header_row() {
        Some(header) if *header_identity != Some(header.node) => {
            *header_identity = Some(header.node);
            headers_tx.send_replace(headers::map_headers(
                &header.cells,
                headers::DEFAULT_EXCLUDED_HEADERS,
                SortColumn::native_order(),
            ));
        }
        Some(_) => {}
        None => {
            if header_identity.take().is_some() {
                headers_tx.send_replace(HeaderMap::default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranklens_contracts::{HeaderCell, HeaderRow, RowNode};
    use ranklens_contracts::Result as HostResult;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeSurface {
        header: Mutex<Option<HeaderRow>>,
        rows: Mutex<Vec<RowNode>>,
        sink: Mutex<Option<mpsc::Sender<TableMutation>>>,
        unsubscribed: Arc<AtomicBool>,
    }

    impl FakeSurface {
        fn new(rows: Vec<RowNode>, header: Option<HeaderRow>) -> Self {
            Self {
                header: Mutex::new(header),
                rows: Mutex::new(rows),
                sink: Mutex::new(None),
                unsubscribed: Arc::new(AtomicBool::new(false)),
            }
        }

        fn set_rows(&self, rows: Vec<RowNode>) {
            *self.rows.lock().unwrap() = rows;
        }

        fn set_header(&self, header: Option<HeaderRow>) {
            *self.header.lock().unwrap() = header;
        }

        fn sink(&self) -> mpsc::Sender<TableMutation> {
            self.sink.lock().unwrap().clone().expect("subscribed")
        }
    }

    impl TableSurface for FakeSurface {
        fn header_row(&self) -> Option<HeaderRow> {
            self.header.lock().unwrap().clone()
        }

        fn body_rows(&self) -> Vec<RowNode> {
            self.rows.lock().unwrap().clone()
        }

        fn subscribe(
            &self,
            sink: mpsc::Sender<TableMutation>,
        ) -> HostResult<SubscriptionGuard> {
            *self.sink.lock().unwrap() = Some(sink);
            let flag = Arc::clone(&self.unsubscribed);
            Ok(SubscriptionGuard::new(move || {
                flag.store(true, Ordering::SeqCst);
            }))
        }
    }

    fn element(id: u64) -> RowNode {
        RowNode {
            node: NodeId(id),
            is_element: true,
        }
    }

    fn text_node(id: u64) -> RowNode {
        RowNode {
            node: NodeId(id),
            is_element: false,
        }
    }

    fn header(node: u64, labels: &[&str]) -> HeaderRow {
        HeaderRow {
            node: NodeId(node),
            cells: labels
                .iter()
                .enumerate()
                .map(|(i, label)| HeaderCell {
                    node: NodeId(node * 10 + i as u64),
                    text: (*label).to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn registers_and_unregisters_table() {
        let service: RowSyncService = RowSyncService::new(
            SyncConfig::default(),
            Arc::new(NoopSyncObserver),
        );
        let surface = Arc::new(FakeSurface::new(vec![element(1)], None));
        let table_id = TableId::new();

        service
            .register_table(table_id, Arc::clone(&surface) as _)
            .await
            .unwrap();
        service
            .register_table(table_id, Arc::clone(&surface) as _)
            .await
            .unwrap();
        assert_eq!(service.table_count().await, 1);

        service.unregister_table(table_id).await;
        assert_eq!(service.table_count().await, 0);
        assert!(surface.unsubscribed.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn initial_scan_publishes_element_rows_only() {
        let service: RowSyncService = RowSyncService::new(
            SyncConfig::default(),
            Arc::new(NoopSyncObserver),
        );
        let surface = Arc::new(FakeSurface::new(
            vec![element(1), text_node(2), element(3)],
            None,
        ));
        let table_id = TableId::new();
        service
            .register_table(table_id, surface as _)
            .await
            .unwrap();

        let mut rows_rx = service.rows_watch(table_id).await.unwrap();
        let rows = rows_rx
            .wait_for(|set| set.generation >= 1)
            .await
            .unwrap()
            .clone();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows[0].node, NodeId(1));
        assert_eq!(rows.rows[0].position, 0);
        assert_eq!(rows.rows[1].node, NodeId(3));
        assert_eq!(rows.rows[1].position, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn mutation_burst_coalesces_into_one_republish() {
        let service: RowSyncService = RowSyncService::new(
            SyncConfig::default(),
            Arc::new(NoopSyncObserver),
        );
        let surface = Arc::new(FakeSurface::new(
            vec![element(1), element(2), element(3)],
            None,
        ));
        let table_id = TableId::new();
        service
            .register_table(table_id, Arc::clone(&surface) as _)
            .await
            .unwrap();

        let mut rows_rx = service.rows_watch(table_id).await.unwrap();
        rows_rx.wait_for(|set| set.generation >= 1).await.unwrap();

        // Pagination-style burst: the host swaps the whole row set
        // while 20 notifications land within 100ms.
        surface.set_rows(vec![
            element(10),
            element(11),
            element(12),
            element(13),
            element(14),
        ]);
        let sink = surface.sink();
        for _ in 0..20 {
            sink.send(TableMutation::ChildList).await.unwrap();
            tokio::time::advance(Duration::from_millis(5)).await;
        }
        tokio::time::advance(Duration::from_millis(600)).await;

        let rows = rows_rx
            .wait_for(|set| set.generation >= 2)
            .await
            .unwrap()
            .clone();
        // Exactly one republish for the whole burst, holding the
        // final row set.
        assert_eq!(rows.generation, 2);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows.rows[0].node, NodeId(10));
        assert_eq!(rows.rows[4].position, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn header_map_rebuilds_only_on_identity_change() {
        let service: RowSyncService = RowSyncService::new(
            SyncConfig::default(),
            Arc::new(NoopSyncObserver),
        );
        let labels =
            ["Status", "Title", "Acceptance", "Difficulty", "Frequency", "Company"];
        let surface = Arc::new(FakeSurface::new(
            vec![element(1)],
            Some(header(50, &labels)),
        ));
        let table_id = TableId::new();
        service
            .register_table(table_id, Arc::clone(&surface) as _)
            .await
            .unwrap();

        let mut headers_rx = service.headers_watch(table_id).await.unwrap();
        let map = headers_rx
            .wait_for(|map| !map.is_empty())
            .await
            .unwrap()
            .clone();
        assert_eq!(map.len(), 4);
        assert_eq!(map.get(SortColumn::Title), Some(NodeId(501)));

        // Same header identity: a republish leaves the map alone.
        let sink = surface.sink();
        sink.send(TableMutation::ChildList).await.unwrap();
        tokio::time::advance(Duration::from_millis(600)).await;
        assert_eq!(*headers_rx.borrow_and_update(), map);

        // Host re-render swapped the header element: rebuild.
        surface.set_header(Some(header(51, &labels)));
        sink.send(TableMutation::ChildList).await.unwrap();
        tokio::time::advance(Duration::from_millis(600)).await;
        let rebuilt = headers_rx
            .wait_for(|map| map.get(SortColumn::Title) == Some(NodeId(511)))
            .await
            .unwrap()
            .clone();
        assert_eq!(rebuilt.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn unregister_clears_published_rows() {
        let service: RowSyncService = RowSyncService::new(
            SyncConfig::default(),
            Arc::new(NoopSyncObserver),
        );
        let surface = Arc::new(FakeSurface::new(vec![element(1)], None));
        let table_id = TableId::new();
        service
            .register_table(table_id, surface as _)
            .await
            .unwrap();

        let mut rows_rx = service.rows_watch(table_id).await.unwrap();
        rows_rx.wait_for(|set| set.generation >= 1).await.unwrap();

        service.unregister_table(table_id).await;
        let cleared = rows_rx
            .wait_for(|set| set.generation >= 2)
            .await
            .unwrap()
            .clone();
        assert!(cleared.is_empty());
        assert!(service.rows_watch(table_id).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn surface_errors_reach_the_observer_and_trigger_a_rescan() {
        struct CountingObserver(std::sync::atomic::AtomicUsize);
        impl SyncObserver for CountingObserver {
            fn on_error(&self, _table_id: TableId, _error: &str) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let observer = Arc::new(CountingObserver(Default::default()));
        let service = RowSyncService::new(
            SyncConfig::default(),
            Arc::clone(&observer),
        );
        let surface = Arc::new(FakeSurface::new(vec![element(1)], None));
        let table_id = TableId::new();
        service
            .register_table(table_id, Arc::clone(&surface) as _)
            .await
            .unwrap();

        let mut rows_rx = service.rows_watch(table_id).await.unwrap();
        rows_rx.wait_for(|set| set.generation >= 1).await.unwrap();

        surface.set_rows(vec![element(1), element(2)]);
        surface
            .sink()
            .send(TableMutation::SurfaceError("observer died".into()))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_millis(600)).await;

        let rows = rows_rx
            .wait_for(|set| set.generation >= 2)
            .await
            .unwrap()
            .clone();
        assert_eq!(rows.len(), 2);
        assert_eq!(observer.0.load(Ordering::SeqCst), 1);
    }
}
