//! Secondary-factor analyzer
//!
//! Same-day-style test for continuous usage factors (screen time, social
//! time) using a high/low split around the series mean. Days inside the
//! dead band around the mean are ignored so ordinary days never dilute the
//! comparison.

use serde::{Deserialize, Serialize};

use crate::align::{align_by_date, metric_series, score_series};
use crate::models::Metric;
use crate::stats::{mean, t_statistic};
use crate::Result;

use super::engine::{AnalysisContext, Analyzer};
use super::types::{Confidence, Insight, InsightType, SecondaryFactorData};

/// Expected direction of a usage factor's effect on its outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorDirection {
    /// Heavy days are expected to depress the outcome (e.g., screen time)
    Drains,
    /// Heavy days are expected to lift the outcome (e.g., social time)
    Supports,
}

/// One configured usage factor: metric, outcome, expected direction
#[derive(Debug, Clone)]
pub struct SecondaryFactorSpec {
    pub factor: Metric,
    pub outcome: Metric,
    pub direction: FactorDirection,
}

/// Splits each configured factor into high/low days around the mean
pub struct SecondaryFactorAnalyzer;

impl Analyzer for SecondaryFactorAnalyzer {
    fn id(&self) -> InsightType {
        InsightType::SameDay
    }

    fn name(&self) -> &'static str {
        "Secondary Factor"
    }

    fn eligible(&self, ctx: &AnalysisContext<'_>) -> bool {
        ctx.daily_metrics.len() >= ctx.config.secondary_min_metrics
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Insight>> {
        let mut insights = vec![];
        let band = ctx.config.secondary_band;

        for spec in &ctx.config.secondary_factors {
            let x_series = metric_series(ctx.daily_metrics, spec.factor);
            let y_series = score_series(ctx.daily_scores, spec.outcome);
            let aligned = align_by_date(&x_series, &y_series);
            if aligned.is_empty() {
                continue;
            }

            let factor_values: Vec<f64> = aligned.iter().map(|&(x, _, _)| x).collect();
            let factor_mean = mean(&factor_values);

            let mut high = vec![];
            let mut low = vec![];
            for &(x, y, _) in &aligned {
                if x > factor_mean + band {
                    high.push(y);
                } else if x < factor_mean - band {
                    low.push(y);
                }
            }
            if high.len() < ctx.config.min_group_days || low.len() < ctx.config.min_group_days {
                continue;
            }

            let mean_high = mean(&high);
            let mean_low = mean(&low);
            let impact = match spec.direction {
                FactorDirection::Drains => (mean_low - mean_high).round() as i32,
                FactorDirection::Supports => (mean_high - mean_low).round() as i32,
            };
            // Only effects in the expected direction, and only when they
            // clear the minimum
            if impact < ctx.config.secondary_min_impact {
                continue;
            }

            let proxy = (t_statistic(&low, &high) / 10.0).clamp(-1.0, 1.0);
            let confidence = Confidence::from_magnitude(
                proxy,
                ctx.config.confidence_high,
                ctx.config.confidence_medium,
            );

            let factor_label = spec.factor.label().to_lowercase();
            let outcome_label = spec.outcome.label().to_lowercase();
            let (title, description) = match spec.direction {
                FactorDirection::Drains => (
                    format!("Lighter {} days lift your {}", factor_label, outcome_label),
                    format!(
                        "Days well below your average {} score {} points higher \
                         on {} than heavy days.",
                        factor_label, impact, outcome_label
                    ),
                ),
                FactorDirection::Supports => (
                    format!("More {} lifts your {}", factor_label, outcome_label),
                    format!(
                        "Days well above your average {} score {} points higher \
                         on {} than light days.",
                        factor_label, impact, outcome_label
                    ),
                ),
            };

            let span = Some((aligned[0].2, aligned[aligned.len() - 1].2));
            let data = SecondaryFactorData {
                factor_mean,
                band,
                high_days: high.len(),
                low_days: low.len(),
                mean_high_outcome: mean_high,
                mean_low_outcome: mean_low,
            };

            insights.push(
                Insight::new(
                    InsightType::SameDay,
                    spec.factor.as_str(),
                    spec.outcome.as_str(),
                    span,
                    confidence,
                    title,
                    description,
                )
                .with_impact(impact)
                .with_data(serde_json::to_value(&data)?),
            );
        }

        Ok(insights)
    }
}
