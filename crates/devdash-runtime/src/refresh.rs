//! Timer-driven refresh loop.
//!
//! Runs one compose pass immediately and then one per refresh interval in a
//! tokio task, sending each finished [`Layout`] through an `mpsc` channel.
//! The UI owns the terminal and is the only writer to it; this task never
//! touches the screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use devdash_core::config::{Config, ProjectConfig};
use devdash_core::layout::Layout;
use devdash_data::ProviderFactory;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::composer::Composer;

// ── Stats ─────────────────────────────────────────────────────────────────────

/// Counters shared between the loop and its handle.
#[derive(Debug, Default)]
pub struct RefreshStats {
    passes: AtomicU64,
    skipped_ticks: AtomicU64,
}

impl RefreshStats {
    /// Completed passes, including ones that produced an error panel.
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    /// Ticks dropped because a pass was still running when they fell due.
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped_ticks.load(Ordering::Relaxed)
    }
}

// ── RefreshLoop ───────────────────────────────────────────────────────────────

pub struct RefreshLoop<F: ?Sized> {
    composer: Composer<F>,
    projects: Vec<ProjectConfig>,
    interval: Duration,
}

impl<F: ProviderFactory + ?Sized + 'static> RefreshLoop<F> {
    pub fn new(factory: Arc<F>, config: Config) -> Self {
        Self {
            composer: Composer::new(factory, config.general.provider_timeout()),
            interval: config.general.refresh_interval(),
            projects: config.projects,
        }
    }

    /// Spawn the loop.
    ///
    /// The loop stops when the receiver is dropped or the handle aborts it.
    pub fn start(self) -> (mpsc::Receiver<Layout>, RefreshHandle) {
        let (tx, rx) = mpsc::channel(16);
        let stats = Arc::new(RefreshStats::default());
        let task_stats = Arc::clone(&stats);
        let handle = tokio::spawn(async move {
            self.run(tx, task_stats).await;
        });
        (rx, RefreshHandle { handle, stats })
    }

    async fn run(self, tx: mpsc::Sender<Layout>, stats: Arc<RefreshStats>) {
        info!(
            projects = self.projects.len(),
            interval_secs = self.interval.as_secs(),
            "refresh loop started"
        );
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let started = Instant::now();
            let layout = self.pass().await;

            let missed = missed_ticks(started.elapsed(), self.interval);
            if missed > 0 {
                stats.skipped_ticks.fetch_add(missed, Ordering::Relaxed);
                warn!(missed, "refresh pass overran its interval; skipping ticks");
                ticker.reset();
            }
            stats.passes.fetch_add(1, Ordering::Relaxed);

            if tx.send(layout).await.is_err() {
                debug!("layout channel closed; exiting refresh loop");
                break;
            }

            ticker.tick().await;
            if tx.is_closed() {
                debug!("layout channel closed; exiting refresh loop");
                break;
            }
        }
    }

    /// One full pass over every project.
    async fn pass(&self) -> Layout {
        match self.composer.compose_all(&self.projects).await {
            Ok(layout) => layout,
            Err(err) => {
                error!(error = %err, fatal = err.is_fatal_to_pass(), "refresh pass failed");
                Layout::error_panel(err.to_string())
            }
        }
    }
}

/// Number of whole intervals that elapsed while a pass ran.
fn missed_ticks(elapsed: Duration, interval: Duration) -> u64 {
    if interval.is_zero() {
        return 0;
    }
    u64::try_from(elapsed.as_nanos() / interval.as_nanos()).unwrap_or(u64::MAX)
}

// ── RefreshHandle ─────────────────────────────────────────────────────────────

/// Handle to the background refresh task.
pub struct RefreshHandle {
    handle: tokio::task::JoinHandle<()>,
    stats: Arc<RefreshStats>,
}

impl RefreshHandle {
    pub fn stats(&self) -> &RefreshStats {
        &self.stats
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
