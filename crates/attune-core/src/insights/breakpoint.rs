//! Breakpoint detector
//!
//! Finds the threshold on a continuous factor that best separates an
//! outcome into two groups by mean difference. Breakpoint insights are a
//! premium feature: unentitled callers get a single locked placeholder in
//! the same slot.

use crate::align::{align_by_date, metric_series, score_series, DateSeries};
use crate::models::Metric;
use crate::stats::{mean, stddev};
use crate::{Error, Result};

use super::engine::{AnalysisContext, Analyzer, EngineConfig};
use super::types::{BreakpointData, Confidence, Insight, InsightType};

/// Candidate threshold scan range
#[derive(Debug, Clone, Copy)]
pub struct BreakpointRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// One configured breakpoint scan: factor metric, outcome metric, range
#[derive(Debug, Clone)]
pub struct BreakpointSpec {
    pub source: Metric,
    pub target: Metric,
    pub range: BreakpointRange,
}

/// Result of a breakpoint scan
#[derive(Debug, Clone)]
pub struct BreakpointResult {
    pub detected: bool,
    pub threshold: f64,
    pub avg_above: f64,
    pub avg_below: f64,
    /// Numeric confidence score (0.6 or 0.8) before level mapping
    pub confidence: f64,
    /// Aligned samples the scan ran over
    pub samples: usize,
}

/// Scan candidate thresholds over date-aligned series.
///
/// For each candidate `t` ascending from `range.min`, days split into
/// `above` (x >= t) and `below` (x < t); candidates leaving either group
/// under three members are skipped. The threshold with the maximum absolute
/// mean difference wins, first encountered on ties. Detection requires the
/// winning gap to exceed the configured minimum in outcome points.
pub fn detect_breakpoint(
    xs: &DateSeries,
    ys: &DateSeries,
    range: &BreakpointRange,
    config: &EngineConfig,
) -> Result<BreakpointResult> {
    if range.step <= 0.0 || range.min > range.max {
        return Err(Error::InvalidConfig(format!(
            "breakpoint range {}..{} step {}",
            range.min, range.max, range.step
        )));
    }

    let aligned = align_by_date(xs, ys);
    let outcomes: Vec<f64> = aligned.iter().map(|&(_, y, _)| y).collect();

    let mut best: Option<(f64, f64, f64)> = None; // (threshold, avg_above, avg_below)
    let mut best_gap = 0.0;

    let steps = ((range.max - range.min) / range.step).round() as usize;
    for i in 0..=steps {
        let candidate = range.min + i as f64 * range.step;
        if candidate > range.max + 1e-9 {
            break;
        }

        let mut above = vec![];
        let mut below = vec![];
        for &(x, y, _) in &aligned {
            if x >= candidate {
                above.push(y);
            } else {
                below.push(y);
            }
        }
        if above.len() < config.min_group_days || below.len() < config.min_group_days {
            continue;
        }

        let avg_above = mean(&above);
        let avg_below = mean(&below);
        let gap = (avg_above - avg_below).abs();
        if gap > best_gap {
            best_gap = gap;
            best = Some((candidate, avg_above, avg_below));
        }
    }

    let (threshold, avg_above, avg_below) = best.unwrap_or((0.0, 0.0, 0.0));
    let spread = stddev(&outcomes);
    let confidence = if aligned.len() > config.breakpoint_strong_samples
        && spread > 0.0
        && best_gap / spread > config.breakpoint_strong_ratio
    {
        0.8
    } else {
        0.6
    };

    Ok(BreakpointResult {
        detected: best_gap > config.breakpoint_min_gap,
        threshold,
        avg_above,
        avg_below,
        confidence,
        samples: aligned.len(),
    })
}

/// Runs each configured threshold scan; substitutes the locked premium
/// placeholder for unentitled callers
pub struct BreakpointAnalyzer;

impl Analyzer for BreakpointAnalyzer {
    fn id(&self) -> InsightType {
        InsightType::Breakpoint
    }

    fn name(&self) -> &'static str {
        "Breakpoint Detector"
    }

    fn eligible(&self, ctx: &AnalysisContext<'_>) -> bool {
        ctx.daily_scores.len() >= ctx.config.breakpoint_min_scores
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Insight>> {
        if !ctx.premium_entitled {
            return Ok(vec![Self::locked_placeholder()]);
        }

        let mut insights = vec![];

        for spec in &ctx.config.breakpoint_specs {
            let x_series = metric_series(ctx.daily_metrics, spec.source);
            let y_series = score_series(ctx.daily_scores, spec.target);
            let result = detect_breakpoint(&x_series, &y_series, &spec.range, ctx.config)?;

            if !result.detected {
                continue;
            }

            let impact = (result.avg_above - result.avg_below).round() as i32;
            let confidence = Confidence::from_magnitude(
                result.confidence,
                ctx.config.confidence_high,
                ctx.config.confidence_medium,
            );

            let threshold_text = match spec.source.unit() {
                Some(unit) => format!("{} {}", result.threshold, unit),
                None => result.threshold.to_string(),
            };
            let title = format!(
                "{} tipping point at {} of {}",
                spec.target.label(),
                threshold_text,
                spec.source.label().to_lowercase()
            );
            let description = format!(
                "{} averages {:.0} when {} is at or above {}, versus {:.0} below.",
                spec.target.label(),
                result.avg_above,
                spec.source.label().to_lowercase(),
                threshold_text,
                result.avg_below
            );

            let span = first_last_date(&x_series, &y_series);
            let data = BreakpointData {
                threshold: result.threshold,
                avg_above: result.avg_above,
                avg_below: result.avg_below,
                samples: result.samples,
                score: result.confidence,
            };

            insights.push(
                Insight::new(
                    InsightType::Breakpoint,
                    spec.source.as_str(),
                    spec.target.as_str(),
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

impl BreakpointAnalyzer {
    /// The single locked insight shown in place of real breakpoints
    fn locked_placeholder() -> Insight {
        Insight::new(
            InsightType::Breakpoint,
            "premium_gate",
            "premium_gate",
            None,
            Confidence::High,
            "Your tipping points are ready",
            "Upgrade to see the thresholds where your days change - like the \
             sleep level below which your clarity drops.",
        )
        .with_premium_gate()
    }
}

/// Date span of the aligned overlap of two series
fn first_last_date(
    xs: &DateSeries,
    ys: &DateSeries,
) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
    let aligned = align_by_date(xs, ys);
    match (aligned.first(), aligned.last()) {
        (Some(&(_, _, start)), Some(&(_, _, end))) => Some((start, end)),
        _ => None,
    }
}
