//! Domain models - core value types and region rule tables
//!
//! This module contains the canonical data types used throughout the crate:
//! - `Coordinate` - latitude/longitude pair
//! - `EventPoint` / `EventGroup` - grouping input and output
//! - `ParsedOutwardCode` - area letters + district of a UK postcode
//! - `RegionRuleSet` - named, versioned HIE postcode tables

pub mod postcode;
pub mod rules;
pub mod types;

// Re-export commonly used types at module level
pub use postcode::{outward_code, ParsedOutwardCode};
pub use rules::{BoundingBox, DistrictRule, RegionRuleSet, HIE_BOUNDING_BOX};
pub use types::{Coordinate, EventGroup, EventId, EventPoint, Locatable};
