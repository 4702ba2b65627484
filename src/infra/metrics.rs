//! Lock-free counters for classification and grouping
//!
//! Uses atomics for hot-path operations to avoid mutex contention.
//! Only the per-area tally and the report clock sit behind a lock.
//!
//! NOTE: All atomics use Relaxed ordering intentionally—these are statistical
//! counters only. Do NOT use these atomics for coordination or logic decisions.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Lock-free metrics collector
///
/// Counters are monotonic; `report()` reads them without resetting and
/// `take_report()` swaps them to zero for interval reporting.
pub struct Metrics {
    /// Postcode checks performed
    postcode_checks: AtomicU64,
    /// Postcode checks that returned in-region
    postcode_in_region: AtomicU64,
    /// Postcodes with no parseable outward code
    postcode_unparseable: AtomicU64,
    /// Bounding-box checks performed
    coordinate_checks: AtomicU64,
    /// Bounding-box checks inside the box
    coordinate_in_region: AtomicU64,
    /// Calls to the grouper
    grouping_runs: AtomicU64,
    /// Events placed into a group
    events_grouped: AtomicU64,
    /// Events dropped for missing or non-finite coordinates
    events_skipped: AtomicU64,
    /// Groups emitted
    groups_emitted: AtomicU64,
    /// Groups holding more than one event
    clusters_emitted: AtomicU64,
    /// Postcode checks per area prefix
    area_checks: Mutex<FxHashMap<String, u64>>,
    /// Last report time
    last_report_time: Mutex<Instant>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            postcode_checks: AtomicU64::new(0),
            postcode_in_region: AtomicU64::new(0),
            postcode_unparseable: AtomicU64::new(0),
            coordinate_checks: AtomicU64::new(0),
            coordinate_in_region: AtomicU64::new(0),
            grouping_runs: AtomicU64::new(0),
            events_grouped: AtomicU64::new(0),
            events_skipped: AtomicU64::new(0),
            groups_emitted: AtomicU64::new(0),
            clusters_emitted: AtomicU64::new(0),
            area_checks: Mutex::new(FxHashMap::default()),
            last_report_time: Mutex::new(Instant::now()),
        }
    }

    /// Record one postcode classification
    ///
    /// `area` is None when no outward code could be parsed.
    pub fn record_postcode(&self, area: Option<&str>, in_region: bool) {
        self.postcode_checks.fetch_add(1, Ordering::Relaxed);
        if in_region {
            self.postcode_in_region.fetch_add(1, Ordering::Relaxed);
        }
        match area {
            Some(area) => {
                let mut areas = self.area_checks.lock();
                *areas.entry(area.to_string()).or_insert(0) += 1;
            }
            None => {
                self.postcode_unparseable.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    #[inline]
    pub fn record_coordinate(&self, in_region: bool) {
        self.coordinate_checks.fetch_add(1, Ordering::Relaxed);
        if in_region {
            self.coordinate_in_region.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record one grouping pass
    pub fn record_grouping(&self, grouped: u64, skipped: u64, groups: u64, clusters: u64) {
        self.grouping_runs.fetch_add(1, Ordering::Relaxed);
        self.events_grouped.fetch_add(grouped, Ordering::Relaxed);
        self.events_skipped.fetch_add(skipped, Ordering::Relaxed);
        self.groups_emitted.fetch_add(groups, Ordering::Relaxed);
        self.clusters_emitted.fetch_add(clusters, Ordering::Relaxed);
    }

    /// Snapshot without resetting
    pub fn report(&self) -> MetricsSummary {
        let elapsed = self.last_report_time.lock().elapsed();
        self.summary(elapsed.as_millis() as u64, |counter| counter.load(Ordering::Relaxed), false)
    }

    /// Snapshot and reset all counters
    pub fn take_report(&self) -> MetricsSummary {
        let elapsed = {
            let mut last = self.last_report_time.lock();
            let elapsed = last.elapsed();
            *last = Instant::now();
            elapsed
        };
        self.summary(elapsed.as_millis() as u64, |counter| counter.swap(0, Ordering::Relaxed), true)
    }

    fn summary(
        &self,
        interval_ms: u64,
        read: impl Fn(&AtomicU64) -> u64,
        reset: bool,
    ) -> MetricsSummary {
        let mut area_checks: Vec<(String, u64)> = {
            let mut areas = self.area_checks.lock();
            if reset {
                areas.drain().collect()
            } else {
                areas.iter().map(|(area, count)| (area.clone(), *count)).collect()
            }
        };
        area_checks.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        MetricsSummary {
            interval_ms,
            postcode_checks: read(&self.postcode_checks),
            postcode_in_region: read(&self.postcode_in_region),
            postcode_unparseable: read(&self.postcode_unparseable),
            coordinate_checks: read(&self.coordinate_checks),
            coordinate_in_region: read(&self.coordinate_in_region),
            grouping_runs: read(&self.grouping_runs),
            events_grouped: read(&self.events_grouped),
            events_skipped: read(&self.events_skipped),
            groups_emitted: read(&self.groups_emitted),
            clusters_emitted: read(&self.clusters_emitted),
            area_checks,
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub interval_ms: u64,
    pub postcode_checks: u64,
    pub postcode_in_region: u64,
    pub postcode_unparseable: u64,
    pub coordinate_checks: u64,
    pub coordinate_in_region: u64,
    pub grouping_runs: u64,
    pub events_grouped: u64,
    pub events_skipped: u64,
    pub groups_emitted: u64,
    pub clusters_emitted: u64,
    /// Checks per area prefix, busiest first
    pub area_checks: Vec<(String, u64)>,
}

impl MetricsSummary {
    /// Share of postcode checks that were in-region (0.0 when none ran)
    pub fn postcode_acceptance_rate(&self) -> f64 {
        if self.postcode_checks == 0 {
            return 0.0;
        }
        self.postcode_in_region as f64 / self.postcode_checks as f64
    }

    pub fn log(&self) {
        let top_areas: Vec<String> = self
            .area_checks
            .iter()
            .take(5)
            .map(|(area, count)| format!("{}={}", area, count))
            .collect();

        info!(
            interval_ms = %self.interval_ms,
            postcode_checks = %self.postcode_checks,
            postcode_in_region = %self.postcode_in_region,
            postcode_unparseable = %self.postcode_unparseable,
            acceptance_rate = %format!("{:.3}", self.postcode_acceptance_rate()),
            coordinate_checks = %self.coordinate_checks,
            coordinate_in_region = %self.coordinate_in_region,
            grouping_runs = %self.grouping_runs,
            events_grouped = %self.events_grouped,
            events_skipped = %self.events_skipped,
            groups = %self.groups_emitted,
            clusters = %self.clusters_emitted,
            top_areas = %top_areas.join(","),
            "metrics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_postcode() {
        let metrics = Metrics::new();
        metrics.record_postcode(Some("IV"), true);
        metrics.record_postcode(Some("IV"), true);
        metrics.record_postcode(Some("EH"), false);
        metrics.record_postcode(None, false);

        let summary = metrics.report();
        assert_eq!(summary.postcode_checks, 4);
        assert_eq!(summary.postcode_in_region, 2);
        assert_eq!(summary.postcode_unparseable, 1);
        assert_eq!(summary.area_checks, vec![("IV".to_string(), 2), ("EH".to_string(), 1)]);
        assert!((summary.postcode_acceptance_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_does_not_reset() {
        let metrics = Metrics::new();
        metrics.record_coordinate(true);
        metrics.record_coordinate(false);

        assert_eq!(metrics.report().coordinate_checks, 2);
        assert_eq!(metrics.report().coordinate_in_region, 1);
    }

    #[test]
    fn test_take_report_resets() {
        let metrics = Metrics::new();
        metrics.record_grouping(5, 2, 3, 1);
        metrics.record_postcode(Some("PH"), true);

        let first = metrics.take_report();
        assert_eq!(first.grouping_runs, 1);
        assert_eq!(first.events_grouped, 5);
        assert_eq!(first.events_skipped, 2);
        assert_eq!(first.groups_emitted, 3);
        assert_eq!(first.clusters_emitted, 1);
        assert_eq!(first.area_checks.len(), 1);

        let second = metrics.take_report();
        assert_eq!(second.grouping_runs, 0);
        assert_eq!(second.events_grouped, 0);
        assert!(second.area_checks.is_empty());
    }

    #[test]
    fn test_acceptance_rate_empty() {
        assert_eq!(Metrics::new().report().postcode_acceptance_rate(), 0.0);
    }
}
