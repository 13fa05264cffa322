pub mod series;
pub mod stream;
pub mod surface;

pub use series::{Direction, Endpoint, Series, SeriesId, TimePoint};
pub use surface::{ChartSnapshot, ChartSurface};

use parking_lot::Mutex;

use crate::controller::Sample;
use crate::poll_loop::SampleSink;

/// Thread-safe owner of the [`ChartSurface`].
/// The poll loop appends through [`SampleSink`], HTTP handlers read
/// snapshots and flip visibility, the reset use case clears.
pub struct LiveChart {
    inner: Mutex<Inner>,
}

struct Inner {
    surface: ChartSurface,
    // Bumped on every clear; appends carrying an older value are refused.
    generation: u64,
}

impl LiveChart {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                surface: ChartSurface::initialize(),
                generation: 0,
            }),
        }
    }

    /// Drop all points and invalidate any fetch already in flight.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.surface.clear_all();
        inner.generation += 1;
    }

    pub fn set_visible(&self, id: SeriesId, visible: bool) {
        self.inner.lock().surface.set_visible(id, visible);
    }

    pub fn toggle(&self, id: SeriesId) -> bool {
        self.inner.lock().surface.toggle(id)
    }

    pub fn is_visible(&self, id: SeriesId) -> bool {
        self.inner.lock().surface.series(id).visible
    }

    pub fn dispose(&self) {
        let mut inner = self.inner.lock();
        inner.surface.dispose();
        inner.generation += 1;
    }

    /// Points per series.
    pub fn len(&self) -> usize {
        self.inner.lock().surface.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        self.inner.lock().surface.snapshot()
    }

    pub fn render(&self) -> ChartSnapshot {
        self.inner.lock().surface.render()
    }
}

impl Default for LiveChart {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSink for LiveChart {
    fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    fn on_sample(&self, generation: u64, sample: Sample, timestamp_ms: i64) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != generation || inner.surface.is_disposed() {
            return false;
        }
        // Caller guarantees ordering; anything else is a stale straggler.
        if inner
            .surface
            .last_timestamp()
            .is_some_and(|last| timestamp_ms < last)
        {
            return false;
        }
        inner.surface.append_sample(&sample, timestamp_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: u64) -> Sample {
        Sample {
            client_sent: n,
            client_recv: n,
            proxy_sent: n,
            proxy_recv: n,
            server_sent: n,
            server_recv: n,
        }
    }

    #[test]
    fn append_with_current_generation() {
        let chart = LiveChart::new();
        let generation = chart.generation();
        assert!(chart.on_sample(generation, sample(1), 10));
        assert!(chart.on_sample(generation, sample(2), 20));
        assert_eq!(chart.len(), 2);
    }

    #[test]
    fn clear_invalidates_in_flight_generation() {
        let chart = LiveChart::new();
        let before = chart.generation();
        assert!(chart.on_sample(before, sample(1), 10));

        chart.clear();
        assert!(chart.is_empty());
        assert!(!chart.on_sample(before, sample(2), 20));
        assert!(chart.is_empty());

        assert!(chart.on_sample(chart.generation(), sample(3), 30));
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn out_of_order_timestamp_is_refused() {
        let chart = LiveChart::new();
        let generation = chart.generation();
        assert!(chart.on_sample(generation, sample(1), 20));
        assert!(!chart.on_sample(generation, sample(2), 10));
        assert_eq!(chart.len(), 1);
    }

    #[test]
    fn disposed_chart_refuses_samples() {
        let chart = LiveChart::new();
        chart.dispose();
        assert!(!chart.on_sample(chart.generation(), sample(1), 1));
        assert!(chart.is_empty());
    }
}
