use serde::Serialize;

use crate::error::PredictError;
use crate::state::Coefficients;

/// Outcome probabilities in percent, bookmaker margin removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedProbs {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

pub fn normalize_coefficients(coef: &Coefficients) -> Result<NormalizedProbs, PredictError> {
    coef.validate()?;
    let ih = 1.0 / coef.home;
    let id = 1.0 / coef.draw;
    let ia = 1.0 / coef.away;
    let sum = ih + id + ia;
    Ok(NormalizedProbs {
        home: ih / sum * 100.0,
        draw: id / sum * 100.0,
        away: ia / sum * 100.0,
    })
}

/// Overround in percent: how far the implied probabilities exceed 100.
pub fn bookmaker_margin(coef: &Coefficients) -> Result<f64, PredictError> {
    coef.validate()?;
    Ok((1.0 / coef.home + 1.0 / coef.draw + 1.0 / coef.away - 1.0) * 100.0)
}
