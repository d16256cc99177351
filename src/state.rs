use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PredictError;

pub const DRAW_LABEL: &str = "Draw";

/// Decimal betting odds for the three full-time outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl Coefficients {
    pub fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    /// Rejects zero, negative and non-finite odds, in home/draw/away order.
    pub fn validate(&self) -> Result<(), PredictError> {
        for (outcome, value) in [("home", self.home), ("draw", self.draw), ("away", self.away)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PredictError::InvalidCoefficient { outcome, value });
            }
        }
        Ok(())
    }
}

/// The fixture under evaluation. Only the team names and coefficients feed the engine;
/// the scheduling fields travel along for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    pub coefficients: Coefficients,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub league: Option<String>,
}

impl MatchRequest {
    pub fn new(home_team: &str, away_team: &str, coefficients: Coefficients) -> Self {
        Self {
            id: None,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            coefficients,
            date: None,
            time: None,
            league: None,
        }
    }

    /// Trimmed (home, away) names, or the first missing one.
    pub fn teams(&self) -> Result<(&str, &str), PredictError> {
        let home = self.home_team.trim();
        if home.is_empty() {
            return Err(PredictError::MissingMatchContext("home_team"));
        }
        let away = self.away_team.trim();
        if away.is_empty() {
            return Err(PredictError::MissingMatchContext("away_team"));
        }
        Ok((home, away))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

/// A (home, away) goal pair, rendered as `h-a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

impl Scoreline {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    pub fn total(&self) -> u32 {
        self.home + self.away
    }
}

impl fmt::Display for Scoreline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub match_id: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub outcome: Outcome,
    // Team name of the predicted winner, or "Draw".
    pub winner: String,
    pub confidence: u8,
    pub first_half_score: Scoreline,
    pub full_time_score: Scoreline,
    pub total_goals: u32,
    pub analysis_factors: BTreeMap<String, String>,
}
