mod error;
mod report;
mod tracker;
mod types;

pub use tracker::{PositionTracker, TrackerSettings};
pub use types::{ErrorPolicy, TrackerMode};
