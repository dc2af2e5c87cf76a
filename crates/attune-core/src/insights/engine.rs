//! Insight engine - orchestrates analysis, ranking, and truncation

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::align::group_by_day;
use crate::models::{CheckIn, DailyMetricRecord, DailyScore, Metric, MicroAction};
use crate::Result;

use super::breakpoint::{BreakpointAnalyzer, BreakpointRange, BreakpointSpec};
use super::lag::LagAnalyzer;
use super::purpose_path::PurposePathAnalyzer;
use super::same_day::SameDayAnalyzer;
use super::secondary::{FactorDirection, SecondaryFactorAnalyzer, SecondaryFactorSpec};
use super::types::{Confidence, Insight, InsightType};

/// Engine configuration
///
/// Every analyzer threshold lives here so boundary-condition tests can vary
/// them without touching analyzer code.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum daily scores before lag correlation runs
    pub min_data_points: usize,
    /// Below this many check-ins only the bootstrap insight is returned
    pub bootstrap_min_check_ins: usize,
    /// Minimum days per group for any two-group comparison
    pub min_group_days: usize,
    /// |t| gate for same-day statistical significance
    pub t_significance: f64,
    /// Minimum |impact| in outcome points for same-day practical significance
    pub same_day_min_impact: i32,
    /// Magnitude at or above which confidence maps to high
    pub confidence_high: f64,
    /// Magnitude at or above which confidence maps to medium
    pub confidence_medium: f64,
    /// Lags (in days) evaluated per metric pair, in order
    pub lag_days: Vec<u32>,
    /// |r| gate for lag-correlation significance
    pub lag_significance: f64,
    /// (factor, outcome) metric pairs evaluated by the lag analyzer
    pub lag_pairs: Vec<(Metric, Metric)>,
    /// Minimum daily scores before breakpoint detection runs
    pub breakpoint_min_scores: usize,
    /// Minimum group-mean gap in outcome points to report a breakpoint
    pub breakpoint_min_gap: f64,
    /// Aligned-sample count above which a breakpoint may score 0.8
    pub breakpoint_strong_samples: usize,
    /// gap / stddev(outcome) ratio above which a breakpoint scores 0.8
    pub breakpoint_strong_ratio: f64,
    /// Threshold scans evaluated by the breakpoint detector
    pub breakpoint_specs: Vec<BreakpointSpec>,
    /// Minimum daily scores before the purpose-path analyzer runs
    pub purpose_min_scores: usize,
    /// |r| gate for the purpose-path correlation branch
    pub purpose_correlation_threshold: f64,
    /// Consecutive micro-action days required to report a streak
    pub min_streak_days: u32,
    /// Fixed impact assigned to streak insights
    pub streak_impact: i32,
    /// Minimum metric records before the secondary-factor analyzer runs
    pub secondary_min_metrics: usize,
    /// Half-width of the high/low dead band around the factor mean
    pub secondary_band: f64,
    /// Minimum impact in outcome points to report a secondary factor
    pub secondary_min_impact: i32,
    /// Usage factors evaluated by the secondary-factor analyzer
    pub secondary_factors: Vec<SecondaryFactorSpec>,
    /// Micro-actions tested for same-day effects
    pub tracked_micro_actions: Vec<MicroAction>,
    /// Maximum insights returned per invocation
    pub max_insights: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_data_points: 7,
            bootstrap_min_check_ins: 6,
            min_group_days: 3,
            t_significance: 1.96,        // ~95% two-tailed
            same_day_min_impact: 3,      // outcome points
            confidence_high: 0.7,
            confidence_medium: 0.5,
            lag_days: vec![1, 2, 3, 7],
            lag_significance: 0.3,
            lag_pairs: vec![
                (Metric::SleepHours, Metric::MindScore),
                (Metric::ActiveMinutes, Metric::BodyScore),
                (Metric::SocialMinutes, Metric::SoulScore),
            ],
            breakpoint_min_scores: 10,
            breakpoint_min_gap: 10.0,    // outcome points
            breakpoint_strong_samples: 14,
            breakpoint_strong_ratio: 0.8,
            breakpoint_specs: vec![
                BreakpointSpec {
                    source: Metric::SleepHours,
                    target: Metric::MindScore,
                    range: BreakpointRange {
                        min: 5.0,
                        max: 9.0,
                        step: 0.5,
                    },
                },
                BreakpointSpec {
                    source: Metric::ActiveMinutes,
                    target: Metric::BodyScore,
                    range: BreakpointRange {
                        min: 10.0,
                        max: 60.0,
                        step: 10.0,
                    },
                },
            ],
            purpose_min_scores: 14,
            purpose_correlation_threshold: 0.5,
            min_streak_days: 3,
            streak_impact: 5,
            secondary_min_metrics: 5,
            secondary_band: 15.0,        // natural units (minutes)
            secondary_min_impact: 5,
            secondary_factors: vec![
                SecondaryFactorSpec {
                    factor: Metric::ScreenMinutes,
                    outcome: Metric::MindScore,
                    direction: FactorDirection::Drains,
                },
                SecondaryFactorSpec {
                    factor: Metric::SocialMinutes,
                    outcome: Metric::SoulScore,
                    direction: FactorDirection::Supports,
                },
            ],
            tracked_micro_actions: MicroAction::ALL.to_vec(),
            max_insights: 10,
        }
    }
}

/// Context provided to insight analyzers
pub struct AnalysisContext<'a> {
    pub check_ins: &'a [CheckIn],
    pub daily_metrics: &'a [DailyMetricRecord],
    pub daily_scores: &'a [DailyScore],
    pub premium_entitled: bool,
    pub config: &'a EngineConfig,
    /// Check-ins grouped by calendar day, ascending
    pub day_groups: BTreeMap<NaiveDate, Vec<&'a CheckIn>>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        check_ins: &'a [CheckIn],
        daily_metrics: &'a [DailyMetricRecord],
        daily_scores: &'a [DailyScore],
        premium_entitled: bool,
        config: &'a EngineConfig,
    ) -> Self {
        let day_groups = group_by_day(check_ins);
        Self {
            check_ins,
            daily_metrics,
            daily_scores,
            premium_entitled,
            config,
            day_groups,
        }
    }
}

/// Trait for insight analyzers
pub trait Analyzer: Send + Sync {
    /// Unique identifier for this analyzer's insight type
    fn id(&self) -> InsightType;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Whether the current data volume and entitlement allow this analyzer
    fn eligible(&self, ctx: &AnalysisContext<'_>) -> bool;

    /// Analyze data and produce candidate insights
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Insight>>;
}

/// Ranking score: |impact| weighted by confidence
pub fn ranking_score(insight: &Insight) -> f64 {
    insight.impact.unsigned_abs() as f64 * insight.confidence.weight()
}

/// The main insight engine that orchestrates analysis
pub struct InsightEngine {
    config: EngineConfig,
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with an explicit configuration.
    ///
    /// Registration order defines emission order, which the stable ranking
    /// sort preserves for equal scores.
    pub fn with_config(config: EngineConfig) -> Self {
        let mut engine = Self {
            config,
            analyzers: vec![],
        };

        engine.register(Box::new(SameDayAnalyzer));
        engine.register(Box::new(LagAnalyzer));
        engine.register(Box::new(BreakpointAnalyzer));
        engine.register(Box::new(PurposePathAnalyzer));
        engine.register(Box::new(SecondaryFactorAnalyzer));

        engine
    }

    /// Register an insight analyzer
    pub fn register(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.push(analyzer);
    }

    /// Get list of registered analyzer insight types
    pub fn analyzer_types(&self) -> Vec<InsightType> {
        self.analyzers.iter().map(|a| a.id()).collect()
    }

    /// Run every eligible analyzer over the supplied history and return the
    /// ranked top insights.
    ///
    /// Never fails: a short history returns the bootstrap placeholder, an
    /// analyzer error is logged and skipped, and empty inputs produce a
    /// well-defined (possibly empty) list.
    pub fn generate_insights(
        &self,
        check_ins: &[CheckIn],
        daily_metrics: &[DailyMetricRecord],
        daily_scores: &[DailyScore],
        premium_entitled: bool,
    ) -> Vec<Insight> {
        if check_ins.len() < self.config.bootstrap_min_check_ins {
            tracing::debug!(
                check_ins = check_ins.len(),
                required = self.config.bootstrap_min_check_ins,
                "History too short, returning bootstrap insight"
            );
            return vec![self.bootstrap_insight()];
        }

        let ctx = AnalysisContext::new(
            check_ins,
            daily_metrics,
            daily_scores,
            premium_entitled,
            &self.config,
        );

        let mut all_insights = vec![];

        for analyzer in &self.analyzers {
            if !analyzer.eligible(&ctx) {
                tracing::debug!(analyzer = analyzer.id().as_str(), "Analyzer not eligible");
                continue;
            }

            match analyzer.analyze(&ctx) {
                Ok(insights) => {
                    tracing::debug!(
                        analyzer = analyzer.id().as_str(),
                        count = insights.len(),
                        "Analysis complete"
                    );
                    all_insights.extend(insights);
                }
                Err(e) => {
                    tracing::warn!(
                        analyzer = analyzer.id().as_str(),
                        error = %e,
                        "Analysis failed"
                    );
                }
            }
        }

        // Stable sort: equal ranking scores preserve emission order
        all_insights.sort_by(|a, b| {
            ranking_score(b)
                .partial_cmp(&ranking_score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        all_insights.truncate(self.config.max_insights);

        all_insights
    }

    /// Fixed placeholder returned while the history is too short to analyze
    fn bootstrap_insight(&self) -> Insight {
        Insight::new(
            InsightType::SameDay,
            Metric::Mood.as_str(),
            Metric::FulfillmentScore.as_str(),
            None,
            Confidence::High,
            "Keep checking in",
            "A few more check-ins unlock your personal insights. Six or more \
             entries give the analyzers enough signal to work with.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::{check_in, check_in_with_action, metrics, score};
    use crate::models::Mood;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    struct StubAnalyzer {
        insights: Vec<Insight>,
    }

    impl Analyzer for StubAnalyzer {
        fn id(&self) -> InsightType {
            InsightType::SameDay
        }

        fn name(&self) -> &'static str {
            "Stub"
        }

        fn eligible(&self, _ctx: &AnalysisContext<'_>) -> bool {
            true
        }

        fn analyze(&self, _ctx: &AnalysisContext<'_>) -> Result<Vec<Insight>> {
            Ok(self.insights.clone())
        }
    }

    struct FailingAnalyzer;

    impl Analyzer for FailingAnalyzer {
        fn id(&self) -> InsightType {
            InsightType::Lag
        }

        fn name(&self) -> &'static str {
            "Failing"
        }

        fn eligible(&self, _ctx: &AnalysisContext<'_>) -> bool {
            true
        }

        fn analyze(&self, _ctx: &AnalysisContext<'_>) -> Result<Vec<Insight>> {
            Err(Error::InvalidConfig("boom".to_string()))
        }
    }

    fn stub_insight(label: &str, impact: i32, confidence: Confidence) -> Insight {
        Insight::new(
            InsightType::SameDay,
            label,
            "mood",
            None,
            confidence,
            label.to_string(),
            "stub",
        )
        .with_impact(impact)
    }

    /// Six plain check-ins: enough to pass the bootstrap gate, nothing for
    /// the default analyzers to find.
    fn quiet_history() -> Vec<crate::models::CheckIn> {
        (1..=6).map(|d| check_in(date(d), Mood::Okay)).collect()
    }

    #[test]
    fn test_engine_registers_all_analyzers() {
        let engine = InsightEngine::new();

        // Secondary-factor insights reuse the same-day type
        assert_eq!(
            engine.analyzer_types(),
            vec![
                InsightType::SameDay,
                InsightType::Lag,
                InsightType::Breakpoint,
                InsightType::PurposePath,
                InsightType::SameDay,
            ]
        );
    }

    #[test]
    fn test_bootstrap_below_minimum_check_ins() {
        let engine = InsightEngine::new();
        let check_ins: Vec<_> = (1..=5).map(|d| check_in(date(d), Mood::Good)).collect();

        // Other inputs are irrelevant below the bootstrap gate
        let scores: Vec<_> = (1..=20)
            .map(|d| score(date(d), 70.0, 70.0, 70.0, 70.0))
            .collect();
        let insights = engine.generate_insights(&check_ins, &[], &scores, true);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].insight_type, InsightType::SameDay);
        assert_eq!(insights[0].impact, 0);
        assert_eq!(insights[0].confidence, Confidence::High);
        assert!(!insights[0].is_premium_gate);
    }

    #[test]
    fn test_empty_inputs_never_panic() {
        let engine = InsightEngine::new();
        let insights = engine.generate_insights(&[], &[], &[], false);
        // Zero check-ins is below the bootstrap gate
        assert_eq!(insights.len(), 1);
    }

    #[test]
    fn test_quiet_history_with_empty_collections() {
        let engine = InsightEngine::new();
        let check_ins = quiet_history();
        let insights = engine.generate_insights(&check_ins, &[], &[], false);
        assert!(insights.is_empty());
    }

    #[test]
    fn test_ranking_is_stable_for_equal_scores() {
        let mut engine = InsightEngine::new();
        // impact 10 x high (1.0) == impact 25 x low (0.4) == 10.0
        engine.register(Box::new(StubAnalyzer {
            insights: vec![
                stub_insight("first", 10, Confidence::High),
                stub_insight("second", -25, Confidence::Low),
                stub_insight("third", 10, Confidence::High),
            ],
        }));

        let check_ins = quiet_history();
        let insights = engine.generate_insights(&check_ins, &[], &[], false);

        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].source_metric, "first");
        assert_eq!(insights[1].source_metric, "second");
        assert_eq!(insights[2].source_metric, "third");
    }

    #[test]
    fn test_ranking_orders_by_weighted_impact() {
        let mut engine = InsightEngine::new();
        engine.register(Box::new(StubAnalyzer {
            insights: vec![
                stub_insight("weak", 4, Confidence::Low),     // 1.6
                stub_insight("strong", 12, Confidence::High), // 12.0
                stub_insight("middle", 10, Confidence::Medium), // 7.0
            ],
        }));

        let check_ins = quiet_history();
        let insights = engine.generate_insights(&check_ins, &[], &[], false);

        let order: Vec<_> = insights.iter().map(|i| i.source_metric.as_str()).collect();
        assert_eq!(order, vec!["strong", "middle", "weak"]);
    }

    #[test]
    fn test_truncates_to_max_insights() {
        let mut engine = InsightEngine::new();
        let many: Vec<_> = (0..15)
            .map(|i| stub_insight(&format!("stub-{}", i), 20 - i, Confidence::High))
            .collect();
        engine.register(Box::new(StubAnalyzer { insights: many }));

        let check_ins = quiet_history();
        let insights = engine.generate_insights(&check_ins, &[], &[], false);

        assert_eq!(insights.len(), 10);
        assert_eq!(insights[0].source_metric, "stub-0");
    }

    #[test]
    fn test_analyzer_failure_is_non_fatal() {
        let mut engine = InsightEngine::new();
        engine.register(Box::new(FailingAnalyzer));
        engine.register(Box::new(StubAnalyzer {
            insights: vec![stub_insight("survivor", 8, Confidence::Medium)],
        }));

        let check_ins = quiet_history();
        let insights = engine.generate_insights(&check_ins, &[], &[], false);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].source_metric, "survivor");
    }

    #[test]
    fn test_custom_config_bootstrap_gate() {
        let config = EngineConfig {
            bootstrap_min_check_ins: 3,
            ..Default::default()
        };
        let engine = InsightEngine::with_config(config);

        let check_ins: Vec<_> = (1..=3).map(|d| check_in(date(d), Mood::Good)).collect();
        let insights = engine.generate_insights(&check_ins, &[], &[], false);
        // Three check-ins clear the lowered gate; nothing to find
        assert!(insights.is_empty());
    }

    #[test]
    fn test_bootstrap_id_is_deterministic() {
        let engine = InsightEngine::new();
        let a = engine.generate_insights(&[], &[], &[], false);
        let b = engine.generate_insights(&[], &[], &[], true);
        assert_eq!(a[0].id, b[0].id);
    }

    #[test]
    fn test_full_run_emits_same_day_insight() {
        // Mirror of the same-day scenario driven through the whole engine:
        // 5 meditation days at Good, 5 plain days at Okay.
        let mut check_ins = vec![];
        for d in 1..=5 {
            check_ins.push(check_in_with_action(
                date(d),
                Mood::Good,
                crate::models::MicroAction::Meditation,
            ));
        }
        for d in 6..=10 {
            check_ins.push(check_in(date(d), Mood::Okay));
        }

        let engine = InsightEngine::new();
        let insights = engine.generate_insights(&check_ins, &[], &[], false);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].insight_type, InsightType::SameDay);
        assert_eq!(insights[0].impact, 20);
        assert_eq!(insights[0].confidence, Confidence::High);
    }

    #[test]
    fn test_metrics_gate_secondary_analyzer() {
        // Four metric records stay under the secondary gate of five
        let check_ins = quiet_history();
        let records: Vec<_> = (1..=4)
            .map(|d| metrics(date(d)).screen(300.0).build())
            .collect();
        let scores: Vec<_> = (1..=4)
            .map(|d| score(date(d), 50.0, 30.0, 50.0, 50.0))
            .collect();

        let engine = InsightEngine::new();
        let insights = engine.generate_insights(&check_ins, &records, &scores, false);
        assert!(insights.is_empty());
    }
}
