use rand::Rng;
use tracing::debug;

use crate::state::{Outcome, Scoreline};

const GOALS_PER_BASE_UNIT: f64 = 30.0;
const NOISE_MAX_GOALS: f64 = 2.0;
const HALF_TIME_SHARE_LO: f64 = 0.4;
const HALF_TIME_SHARE_HI: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorelinePair {
    pub first_half: Scoreline,
    pub full_time: Scoreline,
}

// Draw order: home base, away base, home half share, away half share.
pub fn generate_scoreline<R: Rng + ?Sized>(
    outcome: Outcome,
    home_goals_scored: f64,
    away_goals_scored: f64,
    rng: &mut R,
) -> ScorelinePair {
    let home_base = base_goals(home_goals_scored, rng);
    let away_base = base_goals(away_goals_scored, rng);
    debug!(home_base, away_base, "base goal estimates");

    let full_time = match outcome {
        Outcome::Home => Scoreline::new(home_base.max(away_base + 1), away_base),
        Outcome::Away => Scoreline::new(home_base, away_base.max(home_base + 1)),
        Outcome::Draw => {
            let goals = home_base.max(1);
            Scoreline::new(goals, goals)
        }
    };

    let first_half = Scoreline::new(
        half_time_goals(full_time.home, rng),
        half_time_goals(full_time.away, rng),
    );

    ScorelinePair {
        first_half,
        full_time,
    }
}

fn base_goals<R: Rng + ?Sized>(goals_scored: f64, rng: &mut R) -> u32 {
    let raw = goals_scored / GOALS_PER_BASE_UNIT + rng.gen_range(0.0..NOISE_MAX_GOALS);
    raw.round().max(0.0) as u32
}

fn half_time_goals<R: Rng + ?Sized>(full_time: u32, rng: &mut R) -> u32 {
    let share = rng.gen_range(HALF_TIME_SHARE_LO..HALF_TIME_SHARE_HI);
    let goals = (f64::from(full_time) * share).round() as u32;
    goals.min(full_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn winner_side_always_leads() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let home = generate_scoreline(Outcome::Home, 10.0, 90.0, &mut rng);
            assert!(home.full_time.home > home.full_time.away);
            let away = generate_scoreline(Outcome::Away, 90.0, 10.0, &mut rng);
            assert!(away.full_time.away > away.full_time.home);
        }
    }

    #[test]
    fn draw_is_level_with_at_least_one_goal() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..1000 {
            let s = generate_scoreline(Outcome::Draw, 0.0, 120.0, &mut rng);
            assert_eq!(s.full_time.home, s.full_time.away);
            assert!(s.full_time.home >= 1);
        }
    }

    #[test]
    fn half_time_never_exceeds_full_time() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for outcome in [Outcome::Home, Outcome::Draw, Outcome::Away] {
            for _ in 0..1000 {
                let s = generate_scoreline(outcome, 55.0, 35.0, &mut rng);
                assert!(s.first_half.home <= s.full_time.home);
                assert!(s.first_half.away <= s.full_time.away);
            }
        }
    }

    #[test]
    fn zero_noise_gives_metric_driven_base() {
        // StepRng(0, 0) yields the low end of every range.
        let mut rng = StepRng::new(0, 0);
        let s = generate_scoreline(Outcome::Home, 40.0, 40.0, &mut rng);
        // 40/30 rounds to 1 for both sides, home is lifted above away.
        assert_eq!(s.full_time, Scoreline::new(2, 1));
        // Half share 0.4: round(0.8) = 1, round(0.4) = 0.
        assert_eq!(s.first_half, Scoreline::new(1, 0));
    }
}
