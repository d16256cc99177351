use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PredictError;
use crate::state::DRAW_LABEL;

/// One past meeting between two teams. The winner is derived from the score at
/// construction time and the record cannot be edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordInput")]
pub struct HeadToHeadRecord {
    date: NaiveDate,
    home_team: String,
    away_team: String,
    home_score: u32,
    away_score: u32,
    winner: String,
}

#[derive(Debug, Deserialize)]
struct RecordInput {
    date: NaiveDate,
    home_team: String,
    away_team: String,
    home_score: u32,
    away_score: u32,
}

impl TryFrom<RecordInput> for HeadToHeadRecord {
    type Error = PredictError;

    fn try_from(raw: RecordInput) -> Result<Self, Self::Error> {
        HeadToHeadRecord::new(
            raw.date,
            &raw.home_team,
            &raw.away_team,
            raw.home_score,
            raw.away_score,
        )
    }
}

impl HeadToHeadRecord {
    pub fn new(
        date: NaiveDate,
        home_team: &str,
        away_team: &str,
        home_score: u32,
        away_score: u32,
    ) -> Result<Self, PredictError> {
        let home_team = home_team.trim();
        let away_team = away_team.trim();
        if home_team.is_empty() {
            return Err(PredictError::MissingMatchContext("home_team"));
        }
        if away_team.is_empty() {
            return Err(PredictError::MissingMatchContext("away_team"));
        }
        let winner = if home_score > away_score {
            home_team
        } else if away_score > home_score {
            away_team
        } else {
            DRAW_LABEL
        };
        Ok(Self {
            date,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_score,
            away_score,
            winner: winner.to_string(),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn home_team(&self) -> &str {
        &self.home_team
    }

    pub fn away_team(&self) -> &str {
        &self.away_team
    }

    pub fn home_score(&self) -> u32 {
        self.home_score
    }

    pub fn away_score(&self) -> u32 {
        self.away_score
    }

    /// Winning team name, or "Draw".
    pub fn winner(&self) -> &str {
        &self.winner
    }

    pub fn is_draw(&self) -> bool {
        self.home_score == self.away_score
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct H2hTally {
    pub home_wins: usize,
    pub away_wins: usize,
    pub draws: usize,
}

/// Counts wins by team name, so meetings played at the other venue still credit the
/// right side of the upcoming fixture.
pub fn tally(records: &[HeadToHeadRecord], home_team: &str, away_team: &str) -> H2hTally {
    let mut out = H2hTally::default();
    for r in records {
        if r.is_draw() {
            if r.involves(home_team) && r.involves(away_team) {
                out.draws += 1;
            }
            continue;
        }
        // Independent checks: identical names credit both sides.
        if r.winner() == home_team {
            out.home_wins += 1;
        }
        if r.winner() == away_team {
            out.away_wins += 1;
        }
    }
    out
}

/// Coarse three-way bias: 1.1 favours home, 0.9 favours away, 1.0 otherwise.
pub fn h2h_weight(records: &[HeadToHeadRecord], home_team: &str, away_team: &str) -> f64 {
    let t = tally(records, home_team, away_team);
    if t.home_wins > t.away_wins {
        1.1
    } else if t.away_wins > t.home_wins {
        0.9
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(home: &str, away: &str, hs: u32, aws: u32) -> HeadToHeadRecord {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        HeadToHeadRecord::new(date, home, away, hs, aws).unwrap()
    }

    #[test]
    fn winner_follows_score() {
        assert_eq!(rec("PSG", "Lens", 3, 1).winner(), "PSG");
        assert_eq!(rec("PSG", "Lens", 0, 2).winner(), "Lens");
        let d = rec("PSG", "Lens", 1, 1);
        assert_eq!(d.winner(), DRAW_LABEL);
        assert!(d.is_draw());
    }

    #[test]
    fn empty_team_name_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let err = HeadToHeadRecord::new(date, "PSG", " ", 1, 0).unwrap_err();
        assert_eq!(err, PredictError::MissingMatchContext("away_team"));
    }

    #[test]
    fn serialized_winner_is_rederived() {
        let raw = r#"{"date":"2023-10-01","home_team":"Lens","away_team":"PSG","home_score":2,"away_score":0,"winner":"PSG"}"#;
        let r: HeadToHeadRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(r.winner(), "Lens");
    }

    #[test]
    fn reversed_venue_credits_by_name() {
        let records = vec![rec("Lens", "PSG", 0, 1), rec("PSG", "Lens", 2, 2)];
        let t = tally(&records, "PSG", "Lens");
        assert_eq!(
            t,
            H2hTally {
                home_wins: 1,
                away_wins: 0,
                draws: 1
            }
        );
    }

    #[test]
    fn weight_is_three_way() {
        assert_eq!(h2h_weight(&[], "PSG", "Lens"), 1.0);
        let home_heavy = vec![
            rec("PSG", "Lens", 5, 0),
            rec("PSG", "Lens", 1, 0),
            rec("PSG", "Lens", 0, 1),
        ];
        assert_eq!(h2h_weight(&home_heavy, "PSG", "Lens"), 1.1);
        assert_eq!(h2h_weight(&home_heavy, "Lens", "PSG"), 0.9);
        let level = vec![rec("PSG", "Lens", 1, 0), rec("PSG", "Lens", 0, 1)];
        assert_eq!(h2h_weight(&level, "PSG", "Lens"), 1.0);
    }

    #[test]
    fn identical_names_stay_neutral() {
        let records = vec![rec("PSG", "PSG", 2, 0)];
        let t = tally(&records, "PSG", "PSG");
        assert_eq!(t.home_wins, 1);
        assert_eq!(t.away_wins, 1);
        assert_eq!(h2h_weight(&records, "PSG", "PSG"), 1.0);
    }

    #[test]
    fn unrelated_meetings_are_ignored() {
        let records = vec![rec("Nice", "Brest", 3, 0), rec("Nice", "Brest", 1, 1)];
        assert_eq!(tally(&records, "PSG", "Lens"), H2hTally::default());
        assert_eq!(h2h_weight(&records, "PSG", "Lens"), 1.0);
    }
}
