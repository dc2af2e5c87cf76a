//! Same-day effect analyzer
//!
//! Tests whether a same-day binary factor (e.g., "did meditation") shifts an
//! outcome distribution, gated on both statistical significance (pooled
//! two-sample t) and practical significance (minimum mean shift).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::CheckIn;
use crate::stats::{mean, t_statistic};
use crate::Result;

use super::engine::{AnalysisContext, Analyzer};
use super::types::{Confidence, Insight, InsightType, SameDayData};

/// Result of a same-day factor test
#[derive(Debug, Clone)]
pub struct FactorEffect {
    pub significant: bool,
    /// Rounded mean shift in outcome points (with-factor minus without)
    pub impact: i32,
    /// t / 10, clamped to [-1, 1]: a bounded proxy used only for confidence
    /// mapping, not a true correlation
    pub approx_correlation: f64,
    pub days_with: usize,
    pub days_without: usize,
    pub mean_with: f64,
    pub mean_without: f64,
}

impl FactorEffect {
    fn insignificant(days_with: usize, days_without: usize) -> Self {
        Self {
            significant: false,
            impact: 0,
            approx_correlation: 0.0,
            days_with,
            days_without,
            mean_with: 0.0,
            mean_without: 0.0,
        }
    }
}

/// Test whether days matching `factor` differ from the rest on `outcome`.
///
/// Both groups need at least `min_group_days` days; otherwise the result is
/// insignificant with zero impact. Significance requires |t| above
/// `t_significance` and |impact| above `min_impact` outcome points.
pub fn factor_effect<F, O>(
    day_groups: &BTreeMap<NaiveDate, Vec<&CheckIn>>,
    factor: F,
    outcome: O,
    min_group_days: usize,
    t_significance: f64,
    min_impact: i32,
) -> FactorEffect
where
    F: Fn(&CheckIn) -> bool,
    O: Fn(&[&CheckIn]) -> f64,
{
    let mut with_factor = vec![];
    let mut without_factor = vec![];

    for day in day_groups.values() {
        let value = outcome(day.as_slice());
        if day.iter().any(|c| factor(c)) {
            with_factor.push(value);
        } else {
            without_factor.push(value);
        }
    }

    if with_factor.len() < min_group_days || without_factor.len() < min_group_days {
        return FactorEffect::insignificant(with_factor.len(), without_factor.len());
    }

    let mean_with = mean(&with_factor);
    let mean_without = mean(&without_factor);
    let impact = (mean_with - mean_without).round() as i32;

    let t = t_statistic(&with_factor, &without_factor);
    let significant = t.abs() > t_significance && impact.abs() > min_impact;

    FactorEffect {
        significant,
        impact,
        approx_correlation: (t / 10.0).clamp(-1.0, 1.0),
        days_with: with_factor.len(),
        days_without: without_factor.len(),
        mean_with,
        mean_without,
    }
}

/// Tests each tracked micro-action against the day's mean mood score
pub struct SameDayAnalyzer;

impl Analyzer for SameDayAnalyzer {
    fn id(&self) -> InsightType {
        InsightType::SameDay
    }

    fn name(&self) -> &'static str {
        "Same-Day Effect"
    }

    fn eligible(&self, _ctx: &AnalysisContext<'_>) -> bool {
        true
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Insight>> {
        let mut insights = vec![];

        let span = match (ctx.day_groups.keys().next(), ctx.day_groups.keys().last()) {
            (Some(&start), Some(&end)) => Some((start, end)),
            _ => None,
        };

        for &action in &ctx.config.tracked_micro_actions {
            let effect = factor_effect(
                &ctx.day_groups,
                |c| c.micro_action == Some(action),
                day_mood_mean,
                ctx.config.min_group_days,
                ctx.config.t_significance,
                ctx.config.same_day_min_impact,
            );

            if !effect.significant {
                continue;
            }

            let confidence = Confidence::from_magnitude(
                effect.approx_correlation,
                ctx.config.confidence_high,
                ctx.config.confidence_medium,
            );

            let (title, shift) = if effect.impact > 0 {
                (format!("{} lifts your mood", action.label()), "higher")
            } else {
                (format!("{} weighs on your mood", action.label()), "lower")
            };
            let description = format!(
                "Days with {} average {} mood points {} than days without.",
                action.label().to_lowercase(),
                effect.impact.abs(),
                shift
            );

            let data = SameDayData {
                action,
                days_with: effect.days_with,
                days_without: effect.days_without,
                mean_with: effect.mean_with,
                mean_without: effect.mean_without,
            };

            insights.push(
                Insight::new(
                    InsightType::SameDay,
                    action.as_str(),
                    crate::models::Metric::Mood.as_str(),
                    span,
                    confidence,
                    title,
                    description,
                )
                .with_impact(effect.impact)
                .with_data(serde_json::to_value(&data)?),
            );
        }

        Ok(insights)
    }
}

/// Mean mood score of one day's check-ins
fn day_mood_mean(day: &[&CheckIn]) -> f64 {
    let scores: Vec<f64> = day.iter().map(|c| c.mood.score()).collect();
    mean(&scores)
}
