//! Sort controller state machine.
//!
//! Owns the decision of what to write into the URL and when to
//! navigate. Three states: `Disabled`, `Enabled`, and the transient
//! `Disabling` during which the overlay is already hidden locally but
//! the URL has not changed yet. Activation never rewrites the URL by
//! itself; the user's sort interaction does that through
//! [`SortController::apply_rank_sort`] or
//! [`SortController::apply_column_sort`].

use std::sync::Arc;

use ranklens_contracts::{HostRouter, RankSource, RouteLocation};
use ranklens_model::{
    AnchorPoint, Direction, DirectionField, QueryParams, RankRange,
    RankSnapshot, SortColumn, SortSpec, WireSort,
};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, warn};

use crate::error::Result;
use crate::query;
use crate::sequence::SequenceCounter;

/// Configuration knobs for the controller.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Delay between hiding the overlay and rewriting the URL. Sized
    /// so the hide transition visually completes before the
    /// navigation-induced host re-render lands.
    pub settle_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Disabled,
    Enabled,
    /// Overlay hidden locally, URL rewrite pending behind the settle
    /// delay.
    Disabling,
}

/// Overlay root visibility plus the anchor where the lingering close
/// affordance stays mounted while a deactivation settles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPhase {
    pub visible: bool,
    pub anchor: AnchorPoint,
}

impl Default for OverlayPhase {
    fn default() -> Self {
        Self {
            visible: false,
            anchor: AnchorPoint::OFF_SCREEN,
        }
    }
}

/// Orchestrates enabling and disabling the custom ordering.
pub struct SortController {
    shared: Arc<Shared>,
}

struct Shared {
    config: ControllerConfig,
    router: Arc<dyn HostRouter>,
    source: Arc<dyn RankSource>,
    counter: SequenceCounter,
    inner: Mutex<Inner>,
    phase_tx: watch::Sender<OverlayPhase>,
    snapshot_tx: watch::Sender<Option<RankSnapshot>>,
}

#[derive(Default)]
struct Inner {
    state: ControllerState,
    settle_task: Option<JoinHandle<()>>,
    fetch_task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for SortController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortController")
            .field("config", &self.shared.config)
            .field("phase", &*self.shared.phase_tx.borrow())
            .finish()
    }
}

impl SortController {
    /// The counter is injected rather than ambient so tests can
    /// substitute their own floor.
    pub fn new(
        router: Arc<dyn HostRouter>,
        source: Arc<dyn RankSource>,
        counter: SequenceCounter,
        config: ControllerConfig,
    ) -> Self {
        let (phase_tx, _) = watch::channel(OverlayPhase::default());
        let (snapshot_tx, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                config,
                router,
                source,
                counter,
                inner: Mutex::new(Inner::default()),
                phase_tx,
                snapshot_tx,
            }),
        }
    }

    pub async fn state(&self) -> ControllerState {
        self.shared.inner.lock().await.state
    }

    pub fn phase_watch(&self) -> watch::Receiver<OverlayPhase> {
        self.shared.phase_tx.subscribe()
    }

    pub fn snapshot_watch(&self) -> watch::Receiver<Option<RankSnapshot>> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Enable the feature: kick off the rank-data and question-list
    /// fetches and show the overlay root. A deactivation still waiting
    /// out its settle delay is cancelled before its navigation fires.
    pub async fn activate(&self) {
        let mut inner = self.shared.inner.lock().await;
        if let Some(task) = inner.settle_task.take() {
            task.abort();
            debug!("pending deactivation superseded by activate");
        }
        if inner.state == ControllerState::Enabled {
            return;
        }
        inner.state = ControllerState::Enabled;
        if let Some(task) = inner.fetch_task.take() {
            task.abort();
        }
        inner.fetch_task =
            Some(tokio::spawn(fetch_snapshot(Arc::clone(&self.shared))));
        drop(inner);

        self.shared.phase_tx.send_replace(OverlayPhase {
            visible: true,
            anchor: AnchorPoint::OFF_SCREEN,
        });
    }

    /// Disable the feature. The overlay hides immediately, anchored at
    /// the trigger control's captured position (the control itself is
    /// about to be unmounted); the URL rewrite follows after the
    /// settle delay. A second call while one is pending is a no-op, so
    /// exactly one navigation results.
    pub async fn deactivate(&self, anchor: Option<AnchorPoint>) {
        let mut inner = self.shared.inner.lock().await;
        if inner.state != ControllerState::Enabled {
            return;
        }
        inner.state = ControllerState::Disabling;
        if let Some(task) = inner.fetch_task.take() {
            task.abort();
        }

        let anchor = anchor.unwrap_or(AnchorPoint::OFF_SCREEN);
        self.shared.phase_tx.send_replace(OverlayPhase {
            visible: false,
            anchor,
        });

        let shared = Arc::clone(&self.shared);
        inner.settle_task = Some(tokio::spawn(async move {
            tokio::time::sleep(shared.config.settle_delay).await;
            finish_deactivate(shared).await;
        }));
    }

    /// User sorted by rank: rank ordering is represented entirely
    /// out-of-band, so the native `sorting` parameter is cleared.
    pub async fn apply_rank_sort(&self) -> Result<()> {
        let location = self.shared.router.location();
        let mut params = query::parse(&location.query);
        params.custom_mut().sort = Some(SortSpec::new(
            SortColumn::Ranking,
            Direction::Ascending,
        ));
        params.sorting = None;
        self.navigate_with(location, &params).await
    }

    /// User sorted a native column while the overlay is enabled. The
    /// real direction lives in the custom block; the native entry
    /// carries a fresh sequence token so every cycle produces a query
    /// string the host's response cache has never seen.
    pub async fn apply_column_sort(
        &self,
        column: SortColumn,
        direction: Direction,
    ) -> Result<()> {
        if column == SortColumn::Ranking {
            return self.apply_rank_sort().await;
        }
        let location = self.shared.router.location();
        let mut params = query::parse(&location.query);
        params.custom_mut().sort = Some(SortSpec::new(column, direction));
        params.sorting = Some(vec![WireSort::new(
            column,
            DirectionField::Token(self.shared.counter.next()),
        )]);
        self.navigate_with(location, &params).await
    }

    pub async fn set_rank_range(&self, range: RankRange) -> Result<()> {
        let location = self.shared.router.location();
        let mut params = query::parse(&location.query);
        params.custom_mut().rank_range = Some(range);
        self.navigate_with(location, &params).await
    }

    pub async fn clear_rank_range(&self) -> Result<()> {
        let location = self.shared.router.location();
        let mut params = query::parse(&location.query);
        if let Some(custom) = params.custom.as_mut() {
            custom.rank_range = None;
        }
        params.prune_custom();
        self.navigate_with(location, &params).await
    }

    async fn navigate_with(
        &self,
        location: RouteLocation,
        params: &QueryParams,
    ) -> Result<()> {
        let query = query::serialize(params);
        self.shared
            .router
            .navigate(location.with_query(query))
            .await
            .map_err(Into::into)
    }

    /// Abort pending settle and fetch work. State is left as-is; the
    /// owner is tearing the overlay down entirely.
    pub async fn shutdown(&self) {
        let mut inner = self.shared.inner.lock().await;
        if let Some(task) = inner.settle_task.take() {
            task.abort();
        }
        if let Some(task) = inner.fetch_task.take() {
            task.abort();
        }
    }
}

async fn fetch_snapshot(shared: Arc<Shared>) {
    let (records, questions) = tokio::join!(
        shared.source.fetch_rank_data(),
        shared.source.fetch_question_list()
    );
    let snapshot = match (records, questions) {
        (Ok(records), Ok(questions)) => {
            Some(RankSnapshot::new(records, questions))
        }
        (Err(err), _) | (_, Err(err)) => {
            warn!("rank data unavailable, rendering without annotations: {err}");
            None
        }
    };
    shared.snapshot_tx.send_replace(snapshot);
}

/// The deferred half of deactivation: recompute the query string the
/// host should resolve against once the overlay is gone, navigate, and
/// finish the state transition.
async fn finish_deactivate(shared: Arc<Shared>) {
    let location = shared.router.location();
    let mut params = query::parse(&location.query);

    if let Some(mut custom) = params.custom {
        match custom.sort.take() {
            Some(spec) if spec.order_by == SortColumn::Ranking => {
                // Rank ordering disappears with the overlay. The
                // native sort that was active before rank sort was
                // engaged is intentionally not restored.
            }
            Some(spec) => {
                // Hand the column back to the host in canonical
                // ascending form so its redirect does not fire on the
                // next load.
                params.sorting =
                    Some(vec![WireSort::canonical(spec.order_by)]);
            }
            None => {}
        }
        custom.rank_range = None;
        params.custom = (!custom.is_empty()).then_some(custom);
    }

    let query = query::serialize(&params);
    if let Err(err) =
        shared.router.navigate(location.with_query(query)).await
    {
        warn!("deactivate navigation failed: {err}");
    }
    shared.snapshot_tx.send_replace(None);

    let mut inner = shared.inner.lock().await;
    inner.state = ControllerState::Disabled;
    inner.settle_task = None;
}
