//! Test utilities
//!
//! Fixture builders for check-ins, metric records, and daily scores, shared
//! by the per-module test suites. Available to downstream crates via the
//! `test-utils` feature.

use chrono::NaiveDate;

use crate::models::{
    CheckIn, DailyMetricRecord, DailyScore, DayPart, MicroAction, Mood, PurposeProgress,
};

/// A check-in at midday on `date` with no micro-action
pub fn check_in(date: NaiveDate, mood: Mood) -> CheckIn {
    CheckIn {
        id: format!("ci-{}-{}", date, mood.as_str()),
        timestamp: date.and_hms_opt(12, 0, 0).unwrap().and_utc(),
        day_part: DayPart::Day,
        mood,
        tags: vec![],
        micro_action: None,
        purpose_progress: None,
    }
}

/// A check-in carrying a micro-action
pub fn check_in_with_action(date: NaiveDate, mood: Mood, action: MicroAction) -> CheckIn {
    CheckIn {
        id: format!("ci-{}-{}", date, action.as_str()),
        micro_action: Some(action),
        ..check_in(date, mood)
    }
}

/// A check-in reporting progress on the day's intention
pub fn check_in_with_progress(date: NaiveDate, mood: Mood, progress: PurposeProgress) -> CheckIn {
    CheckIn {
        id: format!("ci-{}-{}", date, progress.as_str()),
        purpose_progress: Some(progress),
        ..check_in(date, mood)
    }
}

/// A daily score with the given dimension values
pub fn score(date: NaiveDate, body: f64, mind: f64, soul: f64, purpose: f64) -> DailyScore {
    DailyScore::new(date, body, mind, soul, purpose)
}

/// Start building a sparse metric record for `date`
pub fn metrics(date: NaiveDate) -> MetricsBuilder {
    MetricsBuilder {
        record: DailyMetricRecord {
            date,
            ..Default::default()
        },
    }
}

/// Builder for sparse [`DailyMetricRecord`] fixtures
pub struct MetricsBuilder {
    record: DailyMetricRecord,
}

impl MetricsBuilder {
    pub fn sleep(mut self, hours: f64) -> Self {
        self.record.sleep_hours = Some(hours);
        self
    }

    pub fn active(mut self, minutes: f64) -> Self {
        self.record.active_minutes = Some(minutes);
        self
    }

    pub fn screen(mut self, minutes: f64) -> Self {
        self.record.screen_minutes = Some(minutes);
        self
    }

    pub fn social(mut self, minutes: f64) -> Self {
        self.record.social_minutes = Some(minutes);
        self
    }

    pub fn food_quality(mut self, rating: f64) -> Self {
        self.record.food_quality = Some(rating);
        self
    }

    pub fn hydration(mut self, liters: f64) -> Self {
        self.record.hydration_liters = Some(liters);
        self
    }

    pub fn build(self) -> DailyMetricRecord {
        self.record
    }
}
