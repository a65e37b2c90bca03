use crate::RoundNumber;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_TIMER_ROUND1: u32 = 45;
pub const DEFAULT_TIMER_ROUND2: u32 = 30;
pub const DEFAULT_TIMER_ROUND3: u32 = 20;
pub const DEFAULT_DECK_SIZE: usize = 60;

/// User-tunable values owned by the settings store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub timer_round1: u32,
    pub timer_round2: u32,
    pub timer_round3: u32,
    /// Empty selection means every category is in play.
    pub selected_categories: BTreeSet<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer_round1: DEFAULT_TIMER_ROUND1,
            timer_round2: DEFAULT_TIMER_ROUND2,
            timer_round3: DEFAULT_TIMER_ROUND3,
            selected_categories: BTreeSet::new(),
        }
    }
}

impl Settings {
    pub fn timer_for(&self, round: RoundNumber) -> u32 {
        match round {
            RoundNumber::One => self.timer_round1,
            RoundNumber::Two => self.timer_round2,
            RoundNumber::Three => self.timer_round3,
        }
    }
}

/// Read-only access to settings; implemented by whatever persists them.
pub trait SettingsStore {
    fn settings(&self) -> Settings;
}

impl SettingsStore for Settings {
    fn settings(&self) -> Settings {
        self.clone()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Feedback {
    Poor,
    Fair,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreBand {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl ScoreBand {
    pub const fn between(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn up_to(max: i64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub const fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn contains(&self, score: i64) -> bool {
        self.min.is_none_or(|min| score >= min) && self.max.is_none_or(|max| score <= max)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreThresholds {
    pub poor: ScoreBand,
    pub fair: ScoreBand,
    pub good: ScoreBand,
    pub excellent: ScoreBand,
}

impl ScoreThresholds {
    /// Scores outside every band fall back to the nearest end of the scale.
    pub fn classify(&self, score: i64) -> Feedback {
        if self.excellent.contains(score) {
            Feedback::Excellent
        } else if self.good.contains(score) {
            Feedback::Good
        } else if self.fair.contains(score) {
            Feedback::Fair
        } else if self.poor.contains(score) {
            Feedback::Poor
        } else if self.excellent.min.is_some_and(|min| score >= min) {
            Feedback::Excellent
        } else {
            Feedback::Poor
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundConfig {
    pub round: RoundNumber,
    pub title: String,
    pub turns_per_player: u32,
    pub timer_seconds: u32,
    pub deck_size: usize,
    pub thresholds: ScoreThresholds,
}

impl RoundConfig {
    pub fn for_round(round: RoundNumber, settings: &Settings) -> Self {
        let (title, turns_per_player, thresholds) = match round {
            RoundNumber::One => (
                "Speed",
                1,
                ScoreThresholds {
                    poor: ScoreBand::up_to(3),
                    fair: ScoreBand::between(4, 7),
                    good: ScoreBand::between(8, 11),
                    excellent: ScoreBand::at_least(12),
                },
            ),
            RoundNumber::Two => (
                "Word Count",
                3,
                ScoreThresholds {
                    poor: ScoreBand::up_to(0),
                    fair: ScoreBand::between(1, 20),
                    good: ScoreBand::between(21, 45),
                    excellent: ScoreBand::at_least(46),
                },
            ),
            RoundNumber::Three => (
                "Hot Seat",
                1,
                ScoreThresholds {
                    poor: ScoreBand::up_to(0),
                    fair: ScoreBand::between(1, 3),
                    good: ScoreBand::between(4, 9),
                    excellent: ScoreBand::at_least(10),
                },
            ),
        };
        Self {
            round,
            title: title.to_string(),
            turns_per_player,
            timer_seconds: settings.timer_for(round),
            deck_size: DEFAULT_DECK_SIZE,
            thresholds,
        }
    }

    pub fn feedback(&self, score: i64) -> Feedback {
        self.thresholds.classify(score)
    }
}
