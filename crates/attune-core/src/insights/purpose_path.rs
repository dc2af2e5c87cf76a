//! Purpose-path analyzer
//!
//! Tracks the relationship between daily completion of intention-linked
//! micro-actions and the purpose score. Two independent branches: a
//! correlation test over per-day action counts, and a streak detector over
//! the most recent consecutive action days. Both may emit in the same run.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::align::{align_by_date, micro_action_counts, score_series};
use crate::models::{CheckIn, Metric};
use crate::stats::{mean, pearson};
use crate::Result;

use super::engine::{AnalysisContext, Analyzer};
use super::types::{Confidence, Insight, InsightType, PurposePathData, PurposePathKind};

/// Correlates micro-action counts with the purpose score and detects
/// active streaks
pub struct PurposePathAnalyzer;

impl Analyzer for PurposePathAnalyzer {
    fn id(&self) -> InsightType {
        InsightType::PurposePath
    }

    fn name(&self) -> &'static str {
        "Purpose Path"
    }

    fn eligible(&self, ctx: &AnalysisContext<'_>) -> bool {
        ctx.premium_entitled && ctx.daily_scores.len() >= ctx.config.purpose_min_scores
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Insight>> {
        let mut insights = vec![];

        if let Some(insight) = self.correlation_insight(ctx)? {
            insights.push(insight);
        }
        if let Some(insight) = self.streak_insight(ctx)? {
            insights.push(insight);
        }

        Ok(insights)
    }
}

impl PurposePathAnalyzer {
    fn correlation_insight(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let counts = micro_action_counts(ctx.check_ins);
        let purpose = score_series(ctx.daily_scores, Metric::PurposeScore);
        let aligned = align_by_date(&counts, &purpose);
        if aligned.is_empty() {
            return Ok(None);
        }

        let xs: Vec<f64> = aligned.iter().map(|&(x, _, _)| x).collect();
        let ys: Vec<f64> = aligned.iter().map(|&(_, y, _)| y).collect();

        let correlation = pearson(&xs, &ys);
        if correlation.abs() <= ctx.config.purpose_correlation_threshold {
            return Ok(None);
        }

        // Impact: how far active days sit from the overall purpose mean
        let overall = mean(&ys);
        let active: Vec<f64> = aligned
            .iter()
            .filter(|&&(x, _, _)| x > 0.0)
            .map(|&(_, y, _)| y)
            .collect();
        let impact = (mean(&active) - overall).round() as i32;

        let confidence = Confidence::from_magnitude(
            correlation,
            ctx.config.confidence_high,
            ctx.config.confidence_medium,
        );

        let position = if impact >= 0 { "above" } else { "below" };
        let description = format!(
            "Days with at least one completed micro-action run {} points {} \
             your average purpose score.",
            impact.abs(),
            position
        );

        let span = Some((aligned[0].2, aligned[aligned.len() - 1].2));
        let data = PurposePathData {
            kind: PurposePathKind::Correlation,
            correlation: Some(correlation),
            streak_days: None,
            active_days: active.len(),
            samples: aligned.len(),
        };

        Ok(Some(
            Insight::new(
                InsightType::PurposePath,
                Metric::MicroActionCount.as_str(),
                Metric::PurposeScore.as_str(),
                span,
                confidence,
                "Intention actions feed your purpose",
                description,
            )
            .with_impact(impact)
            .with_data(serde_json::to_value(&data)?),
        ))
    }

    fn streak_insight(&self, ctx: &AnalysisContext<'_>) -> Result<Option<Insight>> {
        let streak = current_streak(&ctx.day_groups);
        if streak < ctx.config.min_streak_days {
            return Ok(None);
        }

        let end = *ctx.day_groups.keys().last().expect("streak implies days");
        let start = end - chrono::Duration::days(streak as i64 - 1);

        let data = PurposePathData {
            kind: PurposePathKind::Streak,
            correlation: None,
            streak_days: Some(streak),
            active_days: streak as usize,
            samples: ctx.day_groups.len(),
        };

        Ok(Some(
            Insight::new(
                InsightType::PurposePath,
                "micro_action_streak",
                Metric::PurposeScore.as_str(),
                Some((start, end)),
                Confidence::High,
                format!("{}-day intention streak", streak),
                format!(
                    "You've completed at least one micro-action {} days \
                     running. Momentum like this compounds.",
                    streak
                ),
            )
            .with_impact(ctx.config.streak_impact)
            .with_data(serde_json::to_value(&data)?),
        ))
    }
}

/// Length of the unbroken run of micro-action days ending at the most
/// recent check-in day.
///
/// Walks calendar days backward; a day with no check-ins, or with
/// check-ins but no micro-action, ends the run.
fn current_streak(day_groups: &BTreeMap<NaiveDate, Vec<&CheckIn>>) -> u32 {
    let Some(&last) = day_groups.keys().last() else {
        return 0;
    };

    let mut streak = 0;
    let mut day = last;
    loop {
        match day_groups.get(&day) {
            Some(entries) if entries.iter().any(|c| c.micro_action.is_some()) => {
                streak += 1;
            }
            _ => break,
        }
        day = match day.pred_opt() {
            Some(previous) => previous,
            None => break,
        };
    }

    streak
}
