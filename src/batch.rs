use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Deserialize;
use tracing::warn;

use crate::h2h::HeadToHeadRecord;
use crate::metrics::{MetricsCatalog, TeamMetricsPair, compute_team_metrics};
use crate::prediction::generate_prediction;
use crate::state::{MatchRequest, Prediction};

/// One fixture to predict, with whatever enrichment data the caller already has.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictCase {
    #[serde(rename = "match")]
    pub fixture: MatchRequest,
    #[serde(default)]
    pub h2h: Option<Vec<HeadToHeadRecord>>,
    #[serde(default)]
    pub metrics: Option<TeamMetricsPair>,
}

impl PredictCase {
    pub fn label(&self) -> String {
        match &self.fixture.id {
            Some(id) => format!("{id} {} v {}", self.fixture.home_team, self.fixture.away_team),
            None => format!("{} v {}", self.fixture.home_team, self.fixture.away_team),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchRow {
    pub index: usize,
    pub label: String,
    pub seed: u64,
    pub result: Result<Prediction, String>,
}

pub fn parse_case_json(raw: &str) -> Result<PredictCase> {
    serde_json::from_str::<PredictCase>(raw).context("parse prediction case")
}

pub fn parse_cases_json(raw: &str) -> Result<Vec<PredictCase>> {
    serde_json::from_str::<Vec<PredictCase>>(raw).context("parse prediction cases")
}

pub fn load_cases(path: &Path) -> Result<Vec<PredictCase>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_cases_json(&raw)
}

/// Metrics supplied by the case, otherwise looked up (or generated) with `rng`.
pub fn resolve_metrics<R: Rng + ?Sized>(
    case: &PredictCase,
    catalog: &MetricsCatalog,
    rng: &mut R,
) -> TeamMetricsPair {
    match &case.metrics {
        Some(m) => m.clone(),
        None => compute_team_metrics(
            &case.fixture.home_team,
            &case.fixture.away_team,
            catalog,
            rng,
        ),
    }
}

// One generator drives both the metrics lookup and the scoreline, so the seed fixes the run.
pub fn predict_case(
    case: &PredictCase,
    h2h: &[HeadToHeadRecord],
    catalog: &MetricsCatalog,
    seed: u64,
) -> Result<Prediction> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let metrics = resolve_metrics(case, catalog, &mut rng);
    let prediction = generate_prediction(&case.fixture, h2h, &metrics, &mut rng)?;
    Ok(prediction)
}

/// Runs every case on a pool of `parallelism` threads. Case `i` is seeded with
/// `seed + i`, so results do not depend on scheduling. Output keeps input order.
pub fn run_batch(
    cases: &[PredictCase],
    catalog: &MetricsCatalog,
    seed: u64,
    parallelism: usize,
) -> Vec<BatchRow> {
    let predict_all = || {
        cases
            .par_iter()
            .enumerate()
            .map(|(index, case)| {
                let seed = seed.wrapping_add(index as u64);
                let h2h = case.h2h.as_deref().unwrap_or_default();
                BatchRow {
                    index,
                    label: case.label(),
                    seed,
                    result: predict_case(case, h2h, catalog, seed).map_err(|err| format!("{err:#}")),
                }
            })
            .collect::<Vec<_>>()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism.max(1))
        .build()
    {
        Ok(pool) => pool.install(predict_all),
        Err(err) => {
            warn!("batch pool unavailable, using global rayon pool: {err}");
            predict_all()
        }
    }
}
