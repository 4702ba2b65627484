//! HIE region rule tables
//!
//! Two historical rule sets exist for the Highlands & Islands Enterprise
//! postcode area. They disagree on Highland Perthshire, Arran and Moray, so
//! each is kept as its own named, versioned table and selected by config:
//! - `hie-narrow` (v1): PH 19-26 & 30-41, PA 20-78, KA 27
//! - `hie-wide` (v2, default): PH 19-50, PA 20-78, KA 27-28, plus AB
//!   Speyside/Moray districts
//!
//! Area prefixes within a table are disjoint, so at most one rule applies to
//! a given outward code.

use serde::Deserialize;

/// Which districts of an area count as in-region
#[derive(Debug, Clone, PartialEq)]
pub enum DistrictRule {
    /// The whole postcode area is in-region
    All,
    /// Only districts inside one of these inclusive `(low, high)` ranges
    Ranges(&'static [(u8, u8)]),
}

impl DistrictRule {
    pub fn allows(&self, district: u8) -> bool {
        match self {
            DistrictRule::All => true,
            DistrictRule::Ranges(ranges) => {
                ranges.iter().any(|&(low, high)| (low..=high).contains(&district))
            }
        }
    }
}

/// Rule for one postcode area ("PH", "IV", ...)
#[derive(Debug, Clone, PartialEq)]
pub struct AreaRule {
    pub prefix: &'static str,
    pub districts: DistrictRule,
}

/// Named, versioned table of area rules
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRuleSet {
    pub name: &'static str,
    pub version: u32,
    pub rules: &'static [AreaRule],
}

const fn whole_area(prefix: &'static str) -> AreaRule {
    AreaRule { prefix, districts: DistrictRule::All }
}

const fn districts(prefix: &'static str, ranges: &'static [(u8, u8)]) -> AreaRule {
    AreaRule { prefix, districts: DistrictRule::Ranges(ranges) }
}

/// Original table: Highland Perthshire only, Arran only
pub const HIE_NARROW: RegionRuleSet = RegionRuleSet {
    name: "hie-narrow",
    version: 1,
    rules: &[
        // Inverness, Outer Hebrides, Caithness/Sutherland, Shetland
        whole_area("IV"),
        whole_area("HS"),
        whole_area("KW"),
        whole_area("ZE"),
        districts("PH", &[(19, 26), (30, 41)]),
        districts("PA", &[(20, 78)]),
        districts("KA", &[(27, 27)]),
    ],
};

/// Later table: wider Perthshire, Cumbrae, Speyside & Moray
pub const HIE_WIDE: RegionRuleSet = RegionRuleSet {
    name: "hie-wide",
    version: 2,
    rules: &[
        // Inverness, Outer Hebrides, Caithness/Sutherland, Shetland
        whole_area("IV"),
        whole_area("HS"),
        whole_area("KW"),
        whole_area("ZE"),
        districts("PH", &[(19, 50)]),
        districts("PA", &[(20, 78)]),
        districts("KA", &[(27, 28)]),
        districts("AB", &[(37, 38), (44, 45), (51, 56)]),
    ],
};

impl RegionRuleSet {
    /// Every known table, default first
    pub const ALL: &'static [RegionRuleSet] = &[HIE_WIDE, HIE_NARROW];

    /// Look up a table by its config name (case-insensitive)
    pub fn by_name(name: &str) -> Option<&'static RegionRuleSet> {
        Self::ALL.iter().find(|set| set.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Rule for an area prefix, if the area is part of the region at all
    pub fn rule_for(&self, area_prefix: &str) -> Option<&AreaRule> {
        self.rules.iter().find(|rule| rule.prefix == area_prefix)
    }

    pub fn allows(&self, area_prefix: &str, district: u8) -> bool {
        self.rule_for(area_prefix).is_some_and(|rule| rule.districts.allows(district))
    }
}

impl Default for RegionRuleSet {
    fn default() -> Self {
        HIE_WIDE
    }
}

/// Rectangular lat/lng fallback, used when no postcode is available
///
/// Coarse approximation: it includes some points outside the true HIE
/// boundary (parts of Moray coast and Perthshire) and must not be treated
/// as authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

pub const HIE_BOUNDING_BOX: BoundingBox =
    BoundingBox { min_lat: 56.3, max_lat: 58.7, min_lng: -7.7, max_lng: -3.0 };

impl BoundingBox {
    /// Inclusive on all edges. NaN on either axis is outside.
    #[inline]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        HIE_BOUNDING_BOX
    }
}
