//! Statistics for stage sessions

pub mod metrics;

pub use metrics::{StageStats, StatsTracker};
