//! HIE geo utilities library
//!
//! Region eligibility checks and map grouping for Highland Events Hub.
//! Exposes modules for integration testing and binary reuse.

pub mod domain;
pub mod infra;
pub mod io;
pub mod services;

pub use services::location_grouper::group_by_location;
pub use services::region_classifier::{
    is_in_hie_region_by_coordinate, is_in_hie_region_by_postcode,
};
