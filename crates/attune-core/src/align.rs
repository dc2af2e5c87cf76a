//! Date-keyed grouping and series alignment
//!
//! Check-ins arrive with full timestamps while metrics and scores are
//! per-day records from different sources, so every analyzer first reduces
//! its inputs to calendar-day series and joins them on shared dates.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{CheckIn, DailyMetricRecord, DailyScore, Metric};

/// One value per calendar day, ascending by date where produced internally
pub type DateSeries = Vec<(NaiveDate, f64)>;

/// Group check-ins by the calendar day of their timestamp.
///
/// BTreeMap keeps iteration in ascending date order, which makes every
/// downstream computation deterministic.
pub fn group_by_day(check_ins: &[CheckIn]) -> BTreeMap<NaiveDate, Vec<&CheckIn>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&CheckIn>> = BTreeMap::new();
    for check_in in check_ins {
        groups.entry(check_in.day()).or_default().push(check_in);
    }
    groups
}

/// Inner-join two date-keyed series on shared dates.
///
/// Returns `(x, y, date)` triples in the date order of `xs`. Dates present
/// in only one series are silently dropped.
pub fn align_by_date(xs: &[(NaiveDate, f64)], ys: &[(NaiveDate, f64)]) -> Vec<(f64, f64, NaiveDate)> {
    let y_by_date: BTreeMap<NaiveDate, f64> = ys.iter().copied().collect();

    xs.iter()
        .filter_map(|&(date, x)| y_by_date.get(&date).map(|&y| (x, y, date)))
        .collect()
}

/// Extract one metric as a date series, ascending by date.
///
/// Records without a value for `metric` contribute 0.0: missing optional
/// numeric fields default to zero for computation purposes throughout the
/// engine.
pub fn metric_series(records: &[DailyMetricRecord], metric: Metric) -> DateSeries {
    let mut series: DateSeries = records
        .iter()
        .map(|r| (r.date, r.value(metric).unwrap_or(0.0)))
        .collect();
    series.sort_by_key(|&(date, _)| date);
    series
}

/// Extract one score dimension as a date series, ascending by date.
pub fn score_series(scores: &[DailyScore], metric: Metric) -> DateSeries {
    let mut series: DateSeries = scores
        .iter()
        .filter_map(|s| s.dimension(metric).map(|v| (s.date, v)))
        .collect();
    series.sort_by_key(|&(date, _)| date);
    series
}

/// Per-day count of check-ins carrying a micro-action.
///
/// Days with check-ins but no logged action count as 0.0; days with no
/// check-ins at all are absent from the series.
pub fn micro_action_counts(check_ins: &[CheckIn]) -> DateSeries {
    group_by_day(check_ins)
        .iter()
        .map(|(&date, day)| {
            let count = day.iter().filter(|c| c.micro_action.is_some()).count();
            (date, count as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{check_in, check_in_with_action, score};
    use crate::models::MicroAction;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn test_group_by_day_buckets_by_calendar_day() {
        let check_ins = vec![
            check_in(date(1), crate::models::Mood::Good),
            check_in(date(1), crate::models::Mood::Okay),
            check_in(date(3), crate::models::Mood::Low),
        ];

        let groups = group_by_day(&check_ins);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&date(1)].len(), 2);
        assert_eq!(groups[&date(3)].len(), 1);
    }

    #[test]
    fn test_align_by_date_drops_unmatched() {
        let xs = vec![(date(1), 1.0), (date(2), 2.0), (date(4), 4.0)];
        let ys = vec![(date(2), 20.0), (date(3), 30.0), (date(4), 40.0)];

        let aligned = align_by_date(&xs, &ys);
        assert_eq!(aligned, vec![(2.0, 20.0, date(2)), (4.0, 40.0, date(4))]);
    }

    #[test]
    fn test_align_by_date_empty_side() {
        let xs = vec![(date(1), 1.0)];
        assert!(align_by_date(&xs, &[]).is_empty());
        assert!(align_by_date(&[], &xs).is_empty());
    }

    #[test]
    fn test_metric_series_defaults_missing_to_zero() {
        let records = vec![
            crate::test_utils::metrics(date(2)).sleep(7.0).build(),
            crate::test_utils::metrics(date(1)).build(),
        ];

        let series = metric_series(&records, Metric::SleepHours);
        // Sorted ascending, missing value contributes 0.0
        assert_eq!(series, vec![(date(1), 0.0), (date(2), 7.0)]);
    }

    #[test]
    fn test_score_series_selects_dimension() {
        let scores = vec![score(date(2), 50.0, 80.0, 50.0, 50.0), score(date(1), 50.0, 40.0, 50.0, 50.0)];
        let series = score_series(&scores, Metric::MindScore);
        assert_eq!(series, vec![(date(1), 40.0), (date(2), 80.0)]);

        // Non-dimension metrics produce an empty series
        assert!(score_series(&scores, Metric::SleepHours).is_empty());
    }

    #[test]
    fn test_micro_action_counts_include_zero_days() {
        let check_ins = vec![
            check_in_with_action(date(1), crate::models::Mood::Good, MicroAction::Meditation),
            check_in_with_action(date(1), crate::models::Mood::Good, MicroAction::Gratitude),
            check_in(date(2), crate::models::Mood::Okay),
        ];

        let counts = micro_action_counts(&check_ins);
        assert_eq!(counts, vec![(date(1), 2.0), (date(2), 0.0)]);
    }
}
