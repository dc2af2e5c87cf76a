//! Domain models for Attune
//!
//! All engine inputs are immutable value objects: check-ins are append-only,
//! metric records and daily scores exist at most once per calendar day, and
//! the engine only ever reads them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Fulfillment score at or above this marks a meaningful day.
pub const MEANINGFUL_DAY_THRESHOLD: f64 = 65.0;

/// Part of the day a check-in was logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Day,
    Evening,
    Night,
}

impl DayPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Day => "day",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl std::str::FromStr for DayPart {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "day" => Ok(Self::Day),
            "evening" => Ok(Self::Evening),
            "night" => Ok(Self::Night),
            _ => Err(format!("Unknown day part: {}", s)),
        }
    }
}

impl std::fmt::Display for DayPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordinal mood rating on a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    VeryLow,
    Low,
    Okay,
    Good,
    Great,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "very_low",
            Self::Low => "low",
            Self::Okay => "okay",
            Self::Good => "good",
            Self::Great => "great",
        }
    }

    /// Numeric value on the same 0-100 scale as the dimension scores.
    pub fn score(&self) -> f64 {
        match self {
            Self::VeryLow => 20.0,
            Self::Low => 40.0,
            Self::Okay => 60.0,
            Self::Good => 80.0,
            Self::Great => 100.0,
        }
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "very_low" => Ok(Self::VeryLow),
            "low" => Ok(Self::Low),
            "okay" => Ok(Self::Okay),
            "good" => Ok(Self::Good),
            "great" => Ok(Self::Great),
            _ => Err(format!("Unknown mood: {}", s)),
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Context tag attached to a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextTag {
    Work,
    Family,
    Friends,
    Outdoors,
    Travel,
    Rest,
}

impl ContextTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Family => "family",
            Self::Friends => "friends",
            Self::Outdoors => "outdoors",
            Self::Travel => "travel",
            Self::Rest => "rest",
        }
    }
}

impl std::str::FromStr for ContextTag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "work" => Ok(Self::Work),
            "family" => Ok(Self::Family),
            "friends" => Ok(Self::Friends),
            "outdoors" => Ok(Self::Outdoors),
            "travel" => Ok(Self::Travel),
            "rest" => Ok(Self::Rest),
            _ => Err(format!("Unknown context tag: {}", s)),
        }
    }
}

impl std::fmt::Display for ContextTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A small, optionally-logged behavior tied to a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MicroAction {
    Meditation,
    Gratitude,
    Journaling,
    Breathwork,
    NatureWalk,
    ActOfKindness,
}

impl MicroAction {
    pub const ALL: [MicroAction; 6] = [
        Self::Meditation,
        Self::Gratitude,
        Self::Journaling,
        Self::Breathwork,
        Self::NatureWalk,
        Self::ActOfKindness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meditation => "meditation",
            Self::Gratitude => "gratitude",
            Self::Journaling => "journaling",
            Self::Breathwork => "breathwork",
            Self::NatureWalk => "nature_walk",
            Self::ActOfKindness => "act_of_kindness",
        }
    }

    /// Human form used in insight titles
    pub fn label(&self) -> &'static str {
        match self {
            Self::Meditation => "Meditation",
            Self::Gratitude => "Gratitude",
            Self::Journaling => "Journaling",
            Self::Breathwork => "Breathwork",
            Self::NatureWalk => "Nature walks",
            Self::ActOfKindness => "Acts of kindness",
        }
    }
}

impl std::str::FromStr for MicroAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "meditation" => Ok(Self::Meditation),
            "gratitude" => Ok(Self::Gratitude),
            "journaling" => Ok(Self::Journaling),
            "breathwork" => Ok(Self::Breathwork),
            "nature_walk" => Ok(Self::NatureWalk),
            "act_of_kindness" => Ok(Self::ActOfKindness),
            _ => Err(format!("Unknown micro-action: {}", s)),
        }
    }
}

impl std::fmt::Display for MicroAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Self-reported progress on the day's intention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurposeProgress {
    Yes,
    Partly,
    No,
}

impl PurposeProgress {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::Partly => "partly",
            Self::No => "no",
        }
    }
}

impl std::str::FromStr for PurposeProgress {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "partly" => Ok(Self::Partly),
            "no" => Ok(Self::No),
            _ => Err(format!("Unknown purpose progress: {}", s)),
        }
    }
}

impl std::fmt::Display for PurposeProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single mood check-in. Append-only; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub day_part: DayPart,
    pub mood: Mood,
    #[serde(default)]
    pub tags: Vec<ContextTag>,
    pub micro_action: Option<MicroAction>,
    pub purpose_progress: Option<PurposeProgress>,
}

impl CheckIn {
    /// Calendar day this check-in belongs to
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Per-day tracked metrics. Sparse; at most one record per date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyMetricRecord {
    pub date: NaiveDate,
    pub sleep_hours: Option<f64>,
    pub active_minutes: Option<f64>,
    pub screen_minutes: Option<f64>,
    pub social_minutes: Option<f64>,
    pub food_quality: Option<f64>,
    pub hydration_liters: Option<f64>,
}

impl DailyMetricRecord {
    /// Raw value for a metric, if it was tracked that day
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::SleepHours => self.sleep_hours,
            Metric::ActiveMinutes => self.active_minutes,
            Metric::ScreenMinutes => self.screen_minutes,
            Metric::SocialMinutes => self.social_minutes,
            Metric::FoodQuality => self.food_quality,
            Metric::Hydration => self.hydration_liters,
            _ => None,
        }
    }
}

/// Computed dimension scores for one day. At most one per date; superseded
/// (not appended) on recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyScore {
    pub date: NaiveDate,
    pub body: f64,
    pub mind: f64,
    pub soul: f64,
    pub purpose: f64,
    /// Rounded mean of the four dimension scores
    pub fulfillment: f64,
    pub is_meaningful_day: bool,
}

impl DailyScore {
    /// Build a daily score, clamping each dimension to [0, 100] and deriving
    /// the fulfillment score and meaningful-day flag.
    pub fn new(date: NaiveDate, body: f64, mind: f64, soul: f64, purpose: f64) -> Self {
        let body = body.clamp(0.0, 100.0);
        let mind = mind.clamp(0.0, 100.0);
        let soul = soul.clamp(0.0, 100.0);
        let purpose = purpose.clamp(0.0, 100.0);
        let fulfillment = ((body + mind + soul + purpose) / 4.0).round();

        Self {
            date,
            body,
            mind,
            soul,
            purpose,
            fulfillment,
            is_meaningful_day: fulfillment >= MEANINGFUL_DAY_THRESHOLD,
        }
    }

    /// Value of a score dimension, if `metric` names one
    pub fn dimension(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::BodyScore => Some(self.body),
            Metric::MindScore => Some(self.mind),
            Metric::SoulScore => Some(self.soul),
            Metric::PurposeScore => Some(self.purpose),
            Metric::FulfillmentScore => Some(self.fulfillment),
            _ => None,
        }
    }
}

/// Every per-day series the analyzers can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SleepHours,
    ActiveMinutes,
    ScreenMinutes,
    SocialMinutes,
    FoodQuality,
    Hydration,
    Mood,
    MicroActionCount,
    BodyScore,
    MindScore,
    SoulScore,
    PurposeScore,
    FulfillmentScore,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SleepHours => "sleep_hours",
            Self::ActiveMinutes => "active_minutes",
            Self::ScreenMinutes => "screen_minutes",
            Self::SocialMinutes => "social_minutes",
            Self::FoodQuality => "food_quality",
            Self::Hydration => "hydration",
            Self::Mood => "mood",
            Self::MicroActionCount => "micro_action_count",
            Self::BodyScore => "body_score",
            Self::MindScore => "mind_score",
            Self::SoulScore => "soul_score",
            Self::PurposeScore => "purpose_score",
            Self::FulfillmentScore => "fulfillment_score",
        }
    }

    /// Natural unit for threshold formatting, if the metric has one
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::SleepHours => Some("hours"),
            Self::ActiveMinutes | Self::ScreenMinutes | Self::SocialMinutes => Some("minutes"),
            Self::Hydration => Some("liters"),
            _ => None,
        }
    }

    /// Human form used in insight titles and descriptions
    pub fn label(&self) -> &'static str {
        match self {
            Self::SleepHours => "Sleep",
            Self::ActiveMinutes => "Activity",
            Self::ScreenMinutes => "Screen time",
            Self::SocialMinutes => "Social time",
            Self::FoodQuality => "Food quality",
            Self::Hydration => "Hydration",
            Self::Mood => "Mood",
            Self::MicroActionCount => "Intention actions",
            Self::BodyScore => "Body score",
            Self::MindScore => "Mind score",
            Self::SoulScore => "Soul score",
            Self::PurposeScore => "Purpose score",
            Self::FulfillmentScore => "Fulfillment",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sleep_hours" => Ok(Self::SleepHours),
            "active_minutes" => Ok(Self::ActiveMinutes),
            "screen_minutes" => Ok(Self::ScreenMinutes),
            "social_minutes" => Ok(Self::SocialMinutes),
            "food_quality" => Ok(Self::FoodQuality),
            "hydration" => Ok(Self::Hydration),
            "mood" => Ok(Self::Mood),
            "micro_action_count" => Ok(Self::MicroActionCount),
            "body_score" => Ok(Self::BodyScore),
            "mind_score" => Ok(Self::MindScore),
            "soul_score" => Ok(Self::SoulScore),
            "purpose_score" => Ok(Self::PurposeScore),
            "fulfillment_score" => Ok(Self::FulfillmentScore),
            _ => Err(format!("Unknown metric: {}", s)),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
