//! Attune Core Library
//!
//! Shared functionality for the Attune self-tracking app:
//! - Domain models for check-ins, daily metrics, and daily scores
//! - Statistics primitives (correlation, two-sample t, breakpoint search)
//! - Date-keyed grouping and series alignment
//! - The behavioral insight engine with its pluggable analyzers
//!
//! The engine is a pure, synchronous computation over caller-supplied
//! immutable inputs: no I/O, no shared state between invocations, safe to
//! run concurrently for different users. Persistence, rendering, narrative
//! generation, and paywall enforcement are external consumers of the
//! [`insights::Insight`] records it returns.

pub mod align;
pub mod error;
pub mod insights;
pub mod models;
pub mod stats;

/// Test utilities including fixture builders
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use align::{align_by_date, group_by_day, metric_series, micro_action_counts, score_series, DateSeries};
pub use error::{Error, Result};
pub use insights::{
    Confidence, EngineConfig, Insight, InsightEngine, InsightType,
};
pub use models::{
    CheckIn, ContextTag, DailyMetricRecord, DailyScore, DayPart, Metric, MicroAction, Mood,
    PurposeProgress, MEANINGFUL_DAY_THRESHOLD,
};
