//! Core types for the insight engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::models::MicroAction;

/// Types of insights that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// A same-day association between a binary factor and an outcome
    SameDay,
    /// A factor on day t predicting an outcome on day t+lag
    Lag,
    /// A threshold on a continuous factor that splits an outcome
    Breakpoint,
    /// Relationship between intention-linked actions and purpose score
    PurposePath,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::SameDay => "same_day",
            InsightType::Lag => "lag",
            InsightType::Breakpoint => "breakpoint",
            InsightType::PurposePath => "purpose_path",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "same_day" => Ok(InsightType::SameDay),
            "lag" => Ok(InsightType::Lag),
            "breakpoint" => Ok(InsightType::Breakpoint),
            "purpose_path" => Ok(InsightType::PurposePath),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// Confidence level of an insight
///
/// One shared vocabulary for every insight type: correlation coefficients,
/// approximate correlations, and the breakpoint detector's numeric
/// confidence all pass through the same magnitude mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Map a statistical magnitude to a confidence level using the
    /// configured cut points (defaults: high >= 0.7, medium >= 0.5).
    pub fn from_magnitude(magnitude: f64, high_cut: f64, medium_cut: f64) -> Self {
        let magnitude = magnitude.abs();
        if magnitude >= high_cut {
            Confidence::High
        } else if magnitude >= medium_cut {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Ranking weight (higher = counts more toward the ranking score)
    pub fn weight(&self) -> f64 {
        match self {
            Confidence::High => 1.0,
            Confidence::Medium => 0.7,
            Confidence::Low => 0.4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            _ => Err(format!("Unknown confidence: {}", s)),
        }
    }
}

/// Deterministic insight id from the fields that identify a finding.
///
/// Identical inputs always produce identical ids, so external persistence
/// can deduplicate insights across runs and tests can assert on whole
/// records.
pub fn insight_id(
    insight_type: InsightType,
    source_metric: &str,
    target_metric: &str,
    span: Option<(NaiveDate, NaiveDate)>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(insight_type.as_str());
    hasher.update(":");
    hasher.update(source_metric);
    hasher.update(":");
    hasher.update(target_metric);
    hasher.update(":");
    match span {
        Some((start, end)) => hasher.update(format!("{}:{}", start, end)),
        None => hasher.update("all"),
    }
    hex::encode(hasher.finalize())[..16].to_string()
}

/// A ranked, human-readable statistical finding.
///
/// Ephemeral value object: recomputed on every engine invocation, with no
/// persistent identity beyond the deterministic id. Deduplication across
/// time is an external persistence concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    /// Deterministic id derived from (type, source, target, date range)
    pub id: String,
    pub insight_type: InsightType,
    /// Short title (e.g., "Meditation lifts your mood")
    pub title: String,
    /// One-line summary of the finding
    pub description: String,
    pub confidence: Confidence,
    pub source_metric: String,
    pub target_metric: String,
    /// Days of lag for lag-correlation insights
    pub lag_days: Option<u32>,
    /// Signed effect size in outcome points
    pub impact: i32,
    /// True for the locked placeholder shown to unentitled users
    #[serde(default)]
    pub is_premium_gate: bool,
    /// Insight-specific structured data
    pub data: serde_json::Value,
}

impl Insight {
    /// Create a new insight with a zero impact; builder methods fill in the
    /// rest.
    pub fn new(
        insight_type: InsightType,
        source_metric: &str,
        target_metric: &str,
        span: Option<(NaiveDate, NaiveDate)>,
        confidence: Confidence,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: insight_id(insight_type, source_metric, target_metric, span),
            insight_type,
            title: title.into(),
            description: description.into(),
            confidence,
            source_metric: source_metric.to_string(),
            target_metric: target_metric.to_string(),
            lag_days: None,
            impact: 0,
            is_premium_gate: false,
            data: serde_json::Value::Null,
        }
    }

    /// Set the signed effect size
    pub fn with_impact(mut self, impact: i32) -> Self {
        self.impact = impact;
        self
    }

    /// Set the lag in days
    pub fn with_lag_days(mut self, lag_days: u32) -> Self {
        self.lag_days = Some(lag_days);
        self
    }

    /// Mark as a locked premium placeholder
    pub fn with_premium_gate(mut self) -> Self {
        self.is_premium_gate = true;
        self
    }

    /// Attach a structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

/// Data for same-day effect insights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SameDayData {
    pub action: MicroAction,
    pub days_with: usize,
    pub days_without: usize,
    pub mean_with: f64,
    pub mean_without: f64,
}

/// Data for lag-correlation insights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LagData {
    pub lag_days: u32,
    pub correlation: f64,
    /// Median split point on the source metric
    pub threshold: f64,
    pub samples: usize,
}

/// Data for breakpoint insights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakpointData {
    pub threshold: f64,
    pub avg_above: f64,
    pub avg_below: f64,
    pub samples: usize,
    /// Numeric confidence score (0.6 or 0.8) before level mapping
    pub score: f64,
}

/// Which purpose-path branch produced the insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurposePathKind {
    /// Micro-action counts correlate with the purpose score
    Correlation,
    /// An active run of consecutive micro-action days
    Streak,
}

/// Data for purpose-path insights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurposePathData {
    pub kind: PurposePathKind,
    pub correlation: Option<f64>,
    pub streak_days: Option<u32>,
    /// Days with at least one completed micro-action
    pub active_days: usize,
    pub samples: usize,
}

/// Data for secondary-factor insights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryFactorData {
    pub factor_mean: f64,
    /// Half-width of the dead band around the mean
    pub band: f64,
    pub high_days: usize,
    pub low_days: usize,
    pub mean_high_outcome: f64,
    pub mean_low_outcome: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_type_round_trip() {
        assert_eq!(InsightType::SameDay.as_str(), "same_day");
        assert_eq!(
            InsightType::from_str("purpose_path").unwrap(),
            InsightType::PurposePath
        );
        assert!(InsightType::from_str("unknown").is_err());
    }

    #[test]
    fn test_confidence_mapping_cut_points() {
        assert_eq!(Confidence::from_magnitude(0.9, 0.7, 0.5), Confidence::High);
        assert_eq!(Confidence::from_magnitude(0.7, 0.7, 0.5), Confidence::High);
        assert_eq!(Confidence::from_magnitude(0.69, 0.7, 0.5), Confidence::Medium);
        assert_eq!(Confidence::from_magnitude(0.5, 0.7, 0.5), Confidence::Medium);
        assert_eq!(Confidence::from_magnitude(0.49, 0.7, 0.5), Confidence::Low);
        // Sign is irrelevant; only magnitude counts
        assert_eq!(Confidence::from_magnitude(-0.8, 0.7, 0.5), Confidence::High);
    }

    #[test]
    fn test_confidence_weights() {
        assert_eq!(Confidence::High.weight(), 1.0);
        assert_eq!(Confidence::Medium.weight(), 0.7);
        assert_eq!(Confidence::Low.weight(), 0.4);
    }

    #[test]
    fn test_insight_id_deterministic() {
        let span = Some((
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        ));
        let a = insight_id(InsightType::Lag, "sleep_hours", "mind_score", span);
        let b = insight_id(InsightType::Lag, "sleep_hours", "mind_score", span);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);

        let other = insight_id(InsightType::Lag, "sleep_hours", "body_score", span);
        assert_ne!(a, other);
        assert_ne!(a, insight_id(InsightType::Lag, "sleep_hours", "mind_score", None));
    }

    #[test]
    fn test_insight_builder() {
        let insight = Insight::new(
            InsightType::SameDay,
            "meditation",
            "mood",
            None,
            Confidence::High,
            "Meditation lifts your mood",
            "Days with meditation average 18 points higher",
        )
        .with_impact(18)
        .with_data(serde_json::json!({"days_with": 5}));

        assert_eq!(insight.impact, 18);
        assert_eq!(insight.lag_days, None);
        assert!(!insight.is_premium_gate);
        assert_eq!(insight.data["days_with"], 5);
    }
}
