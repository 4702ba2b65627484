//! Map marker grouping
//!
//! Events at the same physical place are merged into one marker. Positions
//! are rounded per axis (half away from zero, 4 places ≈ 11 m by default) so
//! GPS jitter and duplicate venue entries collapse together.
//!
//! Ordering guarantees:
//! - groups appear in the order their rounded position is first seen
//! - events inside a group keep their input order

use crate::domain::types::{EventGroup, Locatable};
use crate::infra::config::{Config, DEFAULT_GROUPING_PRECISION, MAX_GROUPING_PRECISION};
use crate::infra::metrics::Metrics;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::debug;

/// Round to `precision` decimal places, half away from zero
///
/// Negative zero is folded into positive zero so that e.g. -0.00001 and
/// 0.00001 share a key.
#[inline]
pub fn round_coordinate(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision.min(MAX_GROUPING_PRECISION) as i32);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Fixed-decimal key for an already rounded position
#[inline]
pub fn location_key(lat: f64, lng: f64, precision: u32) -> String {
    let precision = precision.min(MAX_GROUPING_PRECISION) as usize;
    format!("{:.*},{:.*}", precision, lat, precision, lng)
}

/// Group events by rounded position using the default 4-place precision
pub fn group_by_location<E, I>(events: I) -> Vec<EventGroup<E>>
where
    E: Locatable,
    I: IntoIterator<Item = E>,
{
    LocationGrouper::default().group(events)
}

/// Groups located events into one bucket per rounded position
#[derive(Clone)]
pub struct LocationGrouper {
    precision: u32,
    metrics: Option<Arc<Metrics>>,
}

impl Default for LocationGrouper {
    fn default() -> Self {
        Self::with_precision(DEFAULT_GROUPING_PRECISION)
    }
}

impl LocationGrouper {
    /// Precision above `MAX_GROUPING_PRECISION` is clamped
    pub fn with_precision(precision: u32) -> Self {
        Self { precision: precision.min(MAX_GROUPING_PRECISION), metrics: None }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_precision(config.grouping_precision())
    }

    /// Record every grouping pass into the given collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Partition events into groups keyed by rounded position
    ///
    /// Events missing either coordinate, or with a non-finite one, are
    /// dropped. Never fails; empty input gives an empty result.
    pub fn group<E, I>(&self, events: I) -> Vec<EventGroup<E>>
    where
        E: Locatable,
        I: IntoIterator<Item = E>,
    {
        let mut groups: Vec<EventGroup<E>> = Vec::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        let mut grouped = 0u64;
        let mut skipped = 0u64;

        for event in events {
            let (Some(lat), Some(lng)) = (event.latitude(), event.longitude()) else {
                skipped += 1;
                continue;
            };

            let lat = round_coordinate(lat, self.precision);
            let lng = round_coordinate(lng, self.precision);
            if !lat.is_finite() || !lng.is_finite() {
                debug!(lat = %lat, lng = %lng, "event_position_not_finite");
                skipped += 1;
                continue;
            }

            grouped += 1;
            match index.entry(location_key(lat, lng, self.precision)) {
                Entry::Occupied(slot) => groups[*slot.get()].events.push(event),
                Entry::Vacant(slot) => {
                    let key = slot.key().clone();
                    slot.insert(groups.len());
                    groups.push(EventGroup { key, lat, lng, events: vec![event] });
                }
            }
        }

        let clusters = groups.iter().filter(|g| g.is_cluster()).count() as u64;

        debug!(
            grouped = %grouped,
            skipped = %skipped,
            groups = %groups.len(),
            clusters = %clusters,
            precision = %self.precision,
            "events_grouped"
        );

        if let Some(ref metrics) = self.metrics {
            metrics.record_grouping(grouped, skipped, groups.len() as u64, clusters);
        }

        groups
    }
}
