//! HIE region eligibility checks
//!
//! Venue submission is limited to the Highlands & Islands Enterprise area.
//! The primary check uses the postcode's outward code against a named rule
//! table; when only a map position is known, a coarse bounding box is used.
//! Neither check fails: malformed input is simply out of region.

use crate::domain::postcode::ParsedOutwardCode;
use crate::domain::rules::{BoundingBox, DistrictRule, RegionRuleSet, HIE_BOUNDING_BOX};
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Message shown on the venue form when the postcode check fails
pub const REJECTION_MESSAGE: &str =
    "Venues must be located in the Highlands & Islands. Please check the postcode.";

/// Message shown when the postcode could not be read at all
pub const UNPARSEABLE_MESSAGE: &str =
    "That doesn't look like a UK postcode. Please check and try again.";

/// Why a postcode was (or wasn't) accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Area is in-region regardless of district (IV, HS, KW, ZE)
    WholeArea,
    /// Area is split and this district is inside
    DistrictAllowed,
    /// Area is split and this district is outside
    DistrictExcluded,
    /// Area has no rule in the table
    AreaOutsideRegion,
    /// No `[A-Z]{1,2}\d{1,2}` outward code found
    Unparseable,
}

impl Verdict {
    #[inline]
    pub fn in_region(&self) -> bool {
        matches!(self, Verdict::WholeArea | Verdict::DistrictAllowed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::WholeArea => "whole_area",
            Verdict::DistrictAllowed => "district_allowed",
            Verdict::DistrictExcluded => "district_excluded",
            Verdict::AreaOutsideRegion => "area_outside_region",
            Verdict::Unparseable => "unparseable",
        }
    }

    /// User-facing text for the venue form, None when accepted
    pub fn rejection_message(&self) -> Option<&'static str> {
        match self {
            Verdict::WholeArea | Verdict::DistrictAllowed => None,
            Verdict::DistrictExcluded | Verdict::AreaOutsideRegion => Some(REJECTION_MESSAGE),
            Verdict::Unparseable => Some(UNPARSEABLE_MESSAGE),
        }
    }
}

/// Result of classifying one postcode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub outward: Option<ParsedOutwardCode>,
    pub verdict: Verdict,
}

impl Classification {
    #[inline]
    pub fn in_region(&self) -> bool {
        self.verdict.in_region()
    }
}

/// Apply a rule table to a raw postcode
pub fn classify_with(rule_set: &RegionRuleSet, postcode: &str) -> Classification {
    let Some(outward) = ParsedOutwardCode::parse(postcode) else {
        return Classification { outward: None, verdict: Verdict::Unparseable };
    };

    let verdict = match rule_set.rule_for(&outward.area_prefix) {
        None => Verdict::AreaOutsideRegion,
        Some(rule) => match rule.districts {
            DistrictRule::All => Verdict::WholeArea,
            ref districts if districts.allows(outward.district) => Verdict::DistrictAllowed,
            _ => Verdict::DistrictExcluded,
        },
    };

    Classification { outward: Some(outward), verdict }
}

/// Is the postcode inside the HIE region, using the default (`hie-wide`) table
pub fn is_in_hie_region_by_postcode(postcode: &str) -> bool {
    classify_with(&RegionRuleSet::default(), postcode).in_region()
}

/// Is the coordinate inside the HIE bounding box (56.3..=58.7, -7.7..=-3.0)
///
/// Approximate; only meant for submissions without a postcode.
pub fn is_in_hie_region_by_coordinate(lat: f64, lng: f64) -> bool {
    HIE_BOUNDING_BOX.contains(lat, lng)
}

/// Configured classifier with optional metrics recording
#[derive(Clone)]
pub struct RegionClassifier {
    rule_set: &'static RegionRuleSet,
    bounding_box: BoundingBox,
    metrics: Option<Arc<Metrics>>,
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new(&RegionRuleSet::ALL[0])
    }
}

impl RegionClassifier {
    pub fn new(rule_set: &'static RegionRuleSet) -> Self {
        Self { rule_set, bounding_box: HIE_BOUNDING_BOX, metrics: None }
    }

    pub fn from_config(config: &Config) -> Self {
        Self { rule_set: config.rule_set(), bounding_box: config.bounding_box(), metrics: None }
    }

    /// Record every check into the given collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    pub fn rule_set(&self) -> &'static RegionRuleSet {
        self.rule_set
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn classify(&self, postcode: &str) -> Classification {
        let classification = classify_with(self.rule_set, postcode);

        debug!(
            postcode = %postcode,
            outward = ?classification.outward.as_ref().map(|o| o.to_string()),
            verdict = %classification.verdict.as_str(),
            rule_set = %self.rule_set.name,
            "postcode_classified"
        );

        if let Some(ref metrics) = self.metrics {
            metrics.record_postcode(
                classification.outward.as_ref().map(|o| o.area_prefix.as_str()),
                classification.in_region(),
            );
        }

        classification
    }

    pub fn is_in_region_by_postcode(&self, postcode: &str) -> bool {
        self.classify(postcode).in_region()
    }

    pub fn is_in_region_by_coordinate(&self, lat: f64, lng: f64) -> bool {
        let in_region = self.bounding_box.contains(lat, lng);

        debug!(lat = %lat, lng = %lng, in_region = %in_region, "coordinate_classified");

        if let Some(ref metrics) = self.metrics {
            metrics.record_coordinate(in_region);
        }

        in_region
    }
}
