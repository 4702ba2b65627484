//! Services - region checks and map grouping
//!
//! - `region_classifier` - HIE eligibility by postcode or bounding box
//! - `location_grouper` - one group per rounded map position

pub mod location_grouper;
pub mod region_classifier;

// Re-export commonly used types
pub use location_grouper::LocationGrouper;
pub use region_classifier::{Classification, RegionClassifier, Verdict};
