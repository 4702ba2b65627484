//! IO modules - reading events and writing results
//!
//! - `event_source` - events from a JSON array or JSONL file / stdin
//! - `report` - JSON / JSONL output of check and grouping results

pub mod event_source;
pub mod report;

// Re-export commonly used types
pub use event_source::{parse_events, read_events};
pub use report::{CoordinateReport, OutputFormat, PostcodeReport, ReportWriter};
