use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::controller::{ControllerClient, Sample};
use crate::error::TelemetryError;

// ─── Seams ───────────────────────────────────────────────────────

/// Anything that can produce the latest counters on demand.
pub trait SampleSource: Send + Sync + 'static {
    fn fetch_latest(&self) -> impl Future<Output = Result<Sample, TelemetryError>> + Send;
}

impl SampleSource for ControllerClient {
    fn fetch_latest(&self) -> impl Future<Output = Result<Sample, TelemetryError>> + Send {
        ControllerClient::fetch_latest(self)
    }
}

/// Receives decoded samples from the loop.
///
/// `generation` is read before each fetch and handed back with the result,
/// so a sink that was cleared while the fetch was in flight can refuse it.
pub trait SampleSink: Send + Sync + 'static {
    fn generation(&self) -> u64;

    /// Returns `false` if the sample was discarded as stale.
    fn on_sample(&self, generation: u64, sample: Sample, timestamp_ms: i64) -> bool;
}

// ─── Stats ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PollStats {
    ticks: AtomicU64,
    appended: AtomicU64,
    failed: AtomicU64,
    stale: AtomicU64,
    running: AtomicBool,
}

/// Clears the running flag however the loop task ends, panics included.
struct RunningGuard(Arc<PollStats>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.running.store(false, Ordering::SeqCst);
    }
}

/// Point-in-time copy of the loop counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollStatsSnapshot {
    pub ticks: u64,
    pub appended: u64,
    pub failed: u64,
    pub stale: u64,
}

impl PollStats {
    fn snapshot(&self) -> PollStatsSnapshot {
        PollStatsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            appended: self.appended.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
        }
    }
}

const MIN_PERIOD: Duration = Duration::from_millis(1);

// ─── PollLoop ────────────────────────────────────────────────────

/// Fixed-period fetch-and-forward loop.
///
/// Fetches are serialized: the next tick is not awaited until the current
/// fetch resolves, and ticks that fell due meanwhile are skipped rather
/// than bunched up. Results therefore reach the sink in issue order.
///
/// Periods below one millisecond are raised to one millisecond.
pub struct PollLoop<S, K> {
    source: S,
    sink: Arc<K>,
    period: Duration,
    tick_limit: Option<u64>,
}

impl<S: SampleSource, K: SampleSink> PollLoop<S, K> {
    pub fn new(source: S, sink: Arc<K>, period: Duration) -> Self {
        if period < MIN_PERIOD {
            tracing::warn!(
                requested_us = period.as_micros() as u64,
                "poll period too short, using 1ms"
            );
        }
        Self {
            source,
            sink,
            period: period.max(MIN_PERIOD),
            tick_limit: None,
        }
    }

    /// Halt on its own after `ticks` ticks (successful or not).
    pub fn with_tick_limit(mut self, ticks: u64) -> Self {
        self.tick_limit = Some(ticks);
        self
    }

    /// Spawn the loop on the current runtime. The first tick fires
    /// immediately.
    pub fn start(self) -> PollHandle {
        let stats = Arc::new(PollStats::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tracing::info!(period_ms = self.period.as_millis() as u64, "poll loop started");
        stats.running.store(true, Ordering::SeqCst);
        let guard = RunningGuard(stats.clone());
        let task = tokio::spawn({
            let stats = stats.clone();
            async move {
                let _guard = guard;
                self.run(stats, shutdown_rx).await;
            }
        });

        PollHandle {
            shutdown: Some(shutdown_tx),
            task,
            stats,
        }
    }

    async fn run(self, stats: Arc<PollStats>, mut shutdown: oneshot::Receiver<()>) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_timestamp: Option<i64> = None;

        loop {
            if let Some(limit) = self.tick_limit {
                if stats.ticks.load(Ordering::Relaxed) >= limit {
                    break;
                }
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {}
            }
            let tick = stats.ticks.fetch_add(1, Ordering::Relaxed) + 1;

            let generation = self.sink.generation();
            let result = tokio::select! {
                _ = &mut shutdown => break,
                result = self.source.fetch_latest() => result,
            };

            match result {
                Ok(sample) => {
                    let timestamp = next_timestamp(
                        chrono::Utc::now().timestamp_millis(),
                        last_timestamp,
                    );
                    last_timestamp = Some(timestamp);

                    if self.sink.on_sample(generation, sample, timestamp) {
                        stats.appended.fetch_add(1, Ordering::Relaxed);
                    } else {
                        stats.stale.fetch_add(1, Ordering::Relaxed);
                        tracing::debug!(tick, "discarded sample fetched before a reset");
                    }
                }
                Err(err) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(tick, error = %err, "poll tick failed, skipping");
                }
            }
        }

        tracing::info!(ticks = stats.ticks.load(Ordering::Relaxed), "poll loop stopped");
    }
}

/// Strictly increasing timestamps even if the wall clock stalls or steps back.
fn next_timestamp(now_ms: i64, last_ms: Option<i64>) -> i64 {
    match last_ms {
        Some(last) if now_ms <= last => last + 1,
        _ => now_ms,
    }
}

// ─── PollHandle ──────────────────────────────────────────────────

/// Owner of a running loop. Dropping it also stops the loop.
pub struct PollHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    stats: Arc<PollStats>,
}

impl PollHandle {
    pub fn stats(&self) -> PollStatsSnapshot {
        self.stats.snapshot()
    }

    /// A cloneable reader for the counters, for use after the handle moves.
    pub fn stats_reader(&self) -> PollStatsReader {
        PollStatsReader(self.stats.clone())
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel the pending timer (and any in-flight fetch) and wait for the
    /// task to exit.
    pub async fn stop(mut self) -> PollStatsSnapshot {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.join().await
    }

    /// Wait for a tick-limited loop to finish on its own.
    pub async fn finished(self) -> PollStatsSnapshot {
        self.join().await
    }

    async fn join(mut self) -> PollStatsSnapshot {
        // Ignore JoinError: a panicked loop has nothing left to clean up.
        let _ = (&mut self.task).await;
        self.stats.snapshot()
    }
}

#[derive(Debug, Clone)]
pub struct PollStatsReader(Arc<PollStats>);

impl PollStatsReader {
    pub fn snapshot(&self) -> PollStatsSnapshot {
        self.0.snapshot()
    }

    /// False once the loop task has exited for any reason.
    pub fn is_running(&self) -> bool {
        self.0.running.load(Ordering::SeqCst)
    }
}
