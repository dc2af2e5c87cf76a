//! Insight Engine - Behavioral Insights from Self-Tracking History
//!
//! The insight engine turns a user's raw daily history (mood check-ins,
//! sleep/activity metrics, screen time, intention progress) into a ranked
//! list of human-readable statistical findings. Instead of waiting for
//! users to ask the right questions, it surfaces what their own data
//! already shows.
//!
//! ## Core Analyzers
//!
//! - **Same-Day Effect** - does a logged micro-action shift the day's mood?
//! - **Lag Correlation** - does a factor today predict a score tomorrow?
//! - **Breakpoint Detector** - where is the threshold that splits good days
//!   from bad ones? (premium)
//! - **Purpose Path** - do intention-linked actions feed the purpose score?
//!   (premium)
//! - **Secondary Factor** - do heavy screen/social days move the scores?
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attune_core::insights::InsightEngine;
//!
//! let engine = InsightEngine::new();
//! let insights = engine.generate_insights(&check_ins, &metrics, &scores, entitled);
//! ```

pub mod breakpoint;
pub mod engine;
pub mod lag;
pub mod purpose_path;
pub mod same_day;
pub mod secondary;
pub mod types;

pub use breakpoint::{
    detect_breakpoint, BreakpointAnalyzer, BreakpointRange, BreakpointResult, BreakpointSpec,
};
pub use engine::{ranking_score, AnalysisContext, Analyzer, EngineConfig, InsightEngine};
pub use lag::{lag_correlation, LagAnalyzer, LagResult};
pub use purpose_path::PurposePathAnalyzer;
pub use same_day::{factor_effect, FactorEffect, SameDayAnalyzer};
pub use secondary::{FactorDirection, SecondaryFactorAnalyzer, SecondaryFactorSpec};
pub use types::{
    insight_id, BreakpointData, Confidence, Insight, InsightType, LagData, PurposePathData,
    PurposePathKind, SameDayData, SecondaryFactorData,
};
