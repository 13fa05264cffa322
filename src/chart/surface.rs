use serde::Serialize;

use super::series::{Series, SeriesId, TimePoint};
use crate::controller::Sample;

/// The six traffic series a chart widget would draw.
///
/// Pure in-process state with no error paths. Visibility is a rendering
/// flag only: hidden series keep accumulating points.
#[derive(Debug, Clone)]
pub struct ChartSurface {
    series: Vec<Series>,
    disposed: bool,
}

/// Serializable view of the surface.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSnapshot {
    pub series: Vec<Series>,
}

impl ChartSurface {
    /// Create all six series empty, proxy series hidden.
    pub fn initialize() -> Self {
        Self {
            series: SeriesId::ALL.into_iter().map(Series::new).collect(),
            disposed: false,
        }
    }

    /// Append one point to every series at `timestamp_ms`.
    pub fn append_sample(&mut self, sample: &Sample, timestamp_ms: i64) {
        if self.disposed {
            return;
        }
        for series in &mut self.series {
            series.push(TimePoint {
                timestamp_ms,
                value: series.id.read(sample),
            });
        }
    }

    /// Drop every point; legend state survives.
    pub fn clear_all(&mut self) {
        for series in &mut self.series {
            series.points.clear();
        }
    }

    pub fn set_visible(&mut self, id: SeriesId, visible: bool) {
        self.series_mut(id).visible = visible;
    }

    /// Flip visibility, returning the new state.
    pub fn toggle(&mut self, id: SeriesId) -> bool {
        let series = self.series_mut(id);
        series.visible = !series.visible;
        series.visible
    }

    /// Tear down: data is released and later appends are ignored.
    pub fn dispose(&mut self) {
        self.clear_all();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn series(&self, id: SeriesId) -> &Series {
        // `series` is built from `SeriesId::ALL`, so the index always exists.
        &self.series[Self::index(id)]
    }

    pub fn all_series(&self) -> &[Series] {
        &self.series
    }

    /// Number of points per series (identical across all six).
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, |s| s.points.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.series.first().and_then(Series::last_timestamp)
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            series: self.series.clone(),
        }
    }

    /// Only what would actually be drawn.
    pub fn render(&self) -> ChartSnapshot {
        ChartSnapshot {
            series: self.series.iter().filter(|s| s.visible).cloned().collect(),
        }
    }

    fn series_mut(&mut self, id: SeriesId) -> &mut Series {
        &mut self.series[Self::index(id)]
    }

    fn index(id: SeriesId) -> usize {
        id as usize
    }
}
