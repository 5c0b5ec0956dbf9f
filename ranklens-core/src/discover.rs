//! Bounded-patience discovery of the host table.
//!
//! The host's markup is not a stable contract: the page may still be
//! loading, or the host may have shipped a redesign. Discovery polls a
//! caller-supplied probe and gives up after a fixed number of
//! attempts, at which point the overlay is simply unavailable.

use std::sync::Arc;

use ranklens_contracts::TableSurface;
use tokio::time::{Duration, sleep};
use tracing::debug;

use crate::error::{OverlayError, Result};

/// Configuration knobs for discovery.
#[derive(Clone, Debug)]
pub struct DiscoveryConfig {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            max_attempts: 20,
        }
    }
}

/// Polls `probe` until it yields a surface or patience runs out.
///
/// The probe is the host adapter's selector lookup; `None` means the
/// expected elements are not in the document yet.
pub async fn discover_surface<F>(
    mut probe: F,
    config: &DiscoveryConfig,
) -> Result<Arc<dyn TableSurface>>
where
    F: FnMut() -> Option<Arc<dyn TableSurface>>,
{
    let attempts = config.max_attempts.max(1);
    for attempt in 1..=attempts {
        if let Some(surface) = probe() {
            debug!("host table discovered on attempt {attempt}");
            return Ok(surface);
        }
        if attempt < attempts {
            sleep(config.poll_interval).await;
        }
    }
    Err(OverlayError::HostUnavailable(format!(
        "table root not found after {attempts} attempts"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranklens_contracts::{
        HeaderRow, Result as HostResult, RowNode, SubscriptionGuard,
        TableMutation,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::mpsc;

    struct BareSurface;

    impl TableSurface for BareSurface {
        fn header_row(&self) -> Option<HeaderRow> {
            None
        }

        fn body_rows(&self) -> Vec<RowNode> {
            Vec::new()
        }

        fn subscribe(
            &self,
            _sink: mpsc::Sender<TableMutation>,
        ) -> HostResult<SubscriptionGuard> {
            Ok(SubscriptionGuard::noop())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn finds_a_late_appearing_surface() {
        let calls = AtomicU32::new(0);
        let surface = discover_surface(
            || {
                if calls.fetch_add(1, Ordering::SeqCst) < 4 {
                    None
                } else {
                    Some(Arc::new(BareSurface) as Arc<dyn TableSurface>)
                }
            },
            &DiscoveryConfig::default(),
        )
        .await;
        assert!(surface.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let config = DiscoveryConfig {
            poll_interval: Duration::from_millis(50),
            max_attempts: 7,
        };
        let result = discover_surface(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                None
            },
            &config,
        )
        .await;
        assert!(matches!(result, Err(OverlayError::HostUnavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 7);
    }
}
