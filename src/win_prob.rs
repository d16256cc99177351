use crate::odds::NormalizedProbs;
use crate::state::Outcome;

const DECISIVE_MIN: f64 = 60.0;
const DECISIVE_MAX: f64 = 95.0;
const DRAW_MIN: f64 = 45.0;
const DRAW_MAX: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeDecision {
    pub outcome: Outcome,
    // Unrounded; rounding happens when the prediction is assembled.
    pub confidence: f64,
    pub adjusted_home: f64,
    pub adjusted_away: f64,
}

/// Home/away shares reweighted by the h2h and metrics biases. The away side uses the
/// mirror of each weight around 2; the draw share is left as-is.
pub fn adjusted_probs(probs: &NormalizedProbs, h2h_weight: f64, metrics_weight: f64) -> (f64, f64) {
    let home = probs.home * h2h_weight * metrics_weight;
    let away = probs.away * (2.0 - h2h_weight) * (2.0 - metrics_weight);
    (home, away)
}

pub fn select_outcome(probs: &NormalizedProbs, h2h_weight: f64, metrics_weight: f64) -> OutcomeDecision {
    let (adjusted_home, adjusted_away) = adjusted_probs(probs, h2h_weight, metrics_weight);

    // An exact home/away tie falls through to Draw.
    let (outcome, confidence) = if adjusted_home > adjusted_away && adjusted_home > probs.draw {
        (Outcome::Home, clamp(adjusted_home, DECISIVE_MIN, DECISIVE_MAX))
    } else if adjusted_away > adjusted_home && adjusted_away > probs.draw {
        (Outcome::Away, clamp(adjusted_away, DECISIVE_MIN, DECISIVE_MAX))
    } else {
        (Outcome::Draw, clamp(probs.draw, DRAW_MIN, DRAW_MAX))
    };

    OutcomeDecision {
        outcome,
        confidence,
        adjusted_home,
        adjusted_away,
    }
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}
