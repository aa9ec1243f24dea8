//! Runtime metrics sampling
//!
//! Periodic background sampling of engine status into snapshots that are
//! readable at any time without blocking the sampler:
//! - RuntimeMetrics snapshot type
//! - MetricsCollector background sampling task

pub mod collector;

pub use collector::{MetricsCollector, RuntimeMetrics, DEFAULT_SAMPLE_INTERVAL};
