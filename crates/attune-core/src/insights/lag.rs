//! Lag correlation analyzer
//!
//! Tests whether a factor on day t predicts an outcome on day t+lag.
//! Each configured metric pair is scanned over the lag set in order, and
//! the scan stops at the first significant lag so one relationship never
//! produces a pile of near-duplicate insights.

use crate::align::{align_by_date, metric_series, score_series};
use crate::stats::{mean, median, pearson};
use crate::Result;

use super::engine::{AnalysisContext, Analyzer};
use super::types::{Confidence, Insight, InsightType, LagData};

/// Result of a single lag-correlation test
#[derive(Debug, Clone)]
pub struct LagResult {
    pub significant: bool,
    pub correlation: f64,
    /// Rounded mean shift in outcome points between high and low factor days
    pub impact: i32,
    /// Median split point on the shifted factor series
    pub threshold: f64,
}

impl LagResult {
    fn insignificant() -> Self {
        Self {
            significant: false,
            correlation: 0.0,
            impact: 0,
            threshold: 0.0,
        }
    }
}

/// Correlate `xs[t]` against `ys[t + lag_days]`.
///
/// The series must already be aligned by date. Histories shorter than
/// `min_data_points + lag_days` return an insignificant result with zero
/// impact. The impact is the mean outcome shift between days at or above
/// the median factor value and days below it (ties go to the high group).
pub fn lag_correlation(
    xs: &[f64],
    ys: &[f64],
    lag_days: usize,
    min_data_points: usize,
    significance: f64,
) -> LagResult {
    let n = xs.len().min(ys.len());
    if n < min_data_points + lag_days {
        return LagResult::insignificant();
    }

    let x_shifted = &xs[..n - lag_days];
    let y_shifted = &ys[lag_days..n];

    let correlation = pearson(x_shifted, y_shifted);
    let significant = correlation.abs() > significance;

    let threshold = median(x_shifted).round();
    let mut high = vec![];
    let mut low = vec![];
    for (x, y) in x_shifted.iter().zip(y_shifted.iter()) {
        if *x >= threshold {
            high.push(*y);
        } else {
            low.push(*y);
        }
    }
    let impact = (mean(&high) - mean(&low)).round() as i32;

    LagResult {
        significant,
        correlation,
        impact,
        threshold,
    }
}

/// Scans configured (factor, outcome) metric pairs over the lag set
pub struct LagAnalyzer;

impl Analyzer for LagAnalyzer {
    fn id(&self) -> InsightType {
        InsightType::Lag
    }

    fn name(&self) -> &'static str {
        "Lag Correlation"
    }

    fn eligible(&self, ctx: &AnalysisContext<'_>) -> bool {
        ctx.daily_scores.len() >= ctx.config.min_data_points
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Insight>> {
        let mut insights = vec![];

        for &(source, target) in &ctx.config.lag_pairs {
            let x_series = metric_series(ctx.daily_metrics, source);
            let y_series = score_series(ctx.daily_scores, target);
            let aligned = align_by_date(&x_series, &y_series);
            if aligned.is_empty() {
                continue;
            }

            let xs: Vec<f64> = aligned.iter().map(|&(x, _, _)| x).collect();
            let ys: Vec<f64> = aligned.iter().map(|&(_, y, _)| y).collect();
            let span = Some((aligned[0].2, aligned[aligned.len() - 1].2));

            for &lag in &ctx.config.lag_days {
                let result = lag_correlation(
                    &xs,
                    &ys,
                    lag as usize,
                    ctx.config.min_data_points,
                    ctx.config.lag_significance,
                );

                if !result.significant {
                    continue;
                }

                let confidence = Confidence::from_magnitude(
                    result.correlation,
                    ctx.config.confidence_high,
                    ctx.config.confidence_medium,
                );

                let lag_phrase = if lag == 1 {
                    "a day later".to_string()
                } else {
                    format!("{} days later", lag)
                };
                let direction = if result.impact >= 0 { "rise" } else { "dip" };
                let title = format!(
                    "{} today shapes your {} {}",
                    source.label(),
                    target.label().to_lowercase(),
                    lag_phrase
                );
                let description = format!(
                    "{} at or above {} predicts a {}-point {} in {} {}.",
                    source.label(),
                    result.threshold,
                    result.impact.abs(),
                    direction,
                    target.label().to_lowercase(),
                    lag_phrase
                );

                let data = LagData {
                    lag_days: lag,
                    correlation: result.correlation,
                    threshold: result.threshold,
                    samples: aligned.len(),
                };

                insights.push(
                    Insight::new(
                        InsightType::Lag,
                        source.as_str(),
                        target.as_str(),
                        span,
                        confidence,
                        title,
                        description,
                    )
                    .with_impact(result.impact)
                    .with_lag_days(lag)
                    .with_data(serde_json::to_value(&data)?),
                );

                // First significant lag wins for this pair
                break;
            }
        }

        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::engine::{AnalysisContext, EngineConfig};
    use crate::test_utils::{check_in, metrics, score};
    use crate::models::Mood;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn test_short_history_is_insignificant() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let ys = xs;

        // 7 points with lag 1 needs at least 8
        let result = lag_correlation(&xs, &ys, 1, 7, 0.3);
        assert!(!result.significant);
        assert_eq!(result.impact, 0);
        assert_eq!(result.correlation, 0.0);
    }

    #[test]
    fn test_perfect_one_day_lag() {
        // y[i + 1] = 2 * x[i] over a clean 14-day series
        let xs: Vec<f64> = (0..14).map(|i| 4.0 + (i % 5) as f64).collect();
        let mut ys = vec![0.0; 14];
        for i in 0..13 {
            ys[i + 1] = 2.0 * xs[i];
        }

        let result = lag_correlation(&xs, &ys, 1, 7, 0.3);
        assert!(result.significant);
        assert!((result.correlation - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_median_split_impact() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        // y[i] = 10 * x[i - 1]
        let ys = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0];

        let result = lag_correlation(&xs, &ys, 1, 7, 0.3);
        assert!(result.significant);
        // Shifted xs are 1..=9, median 5; >= 5 averages 70, < 5 averages 25
        assert_eq!(result.threshold, 5.0);
        assert_eq!(result.impact, 45);
    }

    #[test]
    fn test_uncorrelated_series_insignificant() {
        // Both factor levels see the same outcome mean one day later
        let xs = [5.0, 8.0, 5.0, 8.0, 5.0, 8.0, 5.0, 8.0, 5.0, 8.0];
        let ys = [60.0, 50.0, 80.0, 80.0, 50.0, 65.0, 65.0, 50.0, 65.0, 80.0];

        let result = lag_correlation(&xs, &ys, 1, 7, 0.3);
        assert!(!result.significant);
        assert_eq!(result.correlation, 0.0);
    }

    #[test]
    fn test_analyzer_stops_at_first_significant_lag() {
        // Sleep on day d drives the mind score on day d + 1
        let sleep: Vec<f64> = (0..14).map(|i| [4.0, 8.0, 5.0, 9.0][i % 4]).collect();
        let mut check_ins = vec![];
        let mut records = vec![];
        let mut scores = vec![];
        for d in 0..14u32 {
            check_ins.push(check_in(date(d + 1), Mood::Okay));
            records.push(metrics(date(d + 1)).sleep(sleep[d as usize]).build());
            let mind = if d == 0 { 50.0 } else { 10.0 * sleep[d as usize - 1] };
            scores.push(score(date(d + 1), 50.0, mind, 50.0, 50.0));
        }

        let config = EngineConfig::default();
        let ctx = AnalysisContext::new(&check_ins, &records, &scores, true, &config);
        assert!(LagAnalyzer.eligible(&ctx));

        let insights = LagAnalyzer.analyze(&ctx).unwrap();

        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert_eq!(insight.insight_type, InsightType::Lag);
        assert_eq!(insight.source_metric, "sleep_hours");
        assert_eq!(insight.target_metric, "mind_score");
        assert_eq!(insight.lag_days, Some(1));
        assert_eq!(insight.confidence, Confidence::High);

        let data: LagData = serde_json::from_value(insight.data.clone()).unwrap();
        assert_eq!(data.lag_days, 1);
        assert!(data.correlation > 0.9);
    }

    #[test]
    fn test_analyzer_gate_requires_min_scores() {
        let check_ins: Vec<_> = (1..=6).map(|d| check_in(date(d), Mood::Okay)).collect();
        let scores: Vec<_> = (1..=6)
            .map(|d| score(date(d), 50.0, 50.0, 50.0, 50.0))
            .collect();
        let config = EngineConfig::default();
        let ctx = AnalysisContext::new(&check_ins, &[], &scores, true, &config);

        // 6 daily scores stay under min_data_points = 7
        assert!(!LagAnalyzer.eligible(&ctx));
    }
}
