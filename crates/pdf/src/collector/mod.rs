//! Collectors that turn replay events into records.

pub mod lines;
pub mod text;

pub use lines::{LineSegmentCollector, DEFAULT_CUTOFF};
pub use text::TextPositionCollector;
