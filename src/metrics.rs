use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamMetrics {
    #[serde(default)]
    pub attack_pattern: Option<String>,
    #[serde(default)]
    pub defense_quality: Option<f64>,
    #[serde(default)]
    pub first_half_goals: Option<f64>,
    #[serde(default)]
    pub victories: Option<u32>,
    #[serde(default)]
    pub goals_scored: Option<u32>,
    #[serde(default)]
    pub goals_conceded: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamMetricsPair {
    #[serde(default)]
    pub home: Option<TeamMetrics>,
    #[serde(default)]
    pub away: Option<TeamMetrics>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsDefaults {
    pub defense_quality: f64,
    pub goals_scored: f64,
}

impl Default for MetricsDefaults {
    fn default() -> Self {
        Self {
            defense_quality: 70.0,
            goals_scored: 40.0,
        }
    }
}

impl MetricsDefaults {
    pub fn defense_quality(&self, metrics: Option<&TeamMetrics>) -> f64 {
        metrics
            .and_then(|m| m.defense_quality)
            .unwrap_or(self.defense_quality)
    }

    pub fn goals_scored(&self, metrics: Option<&TeamMetrics>) -> f64 {
        metrics
            .and_then(|m| m.goals_scored)
            .map(f64::from)
            .unwrap_or(self.goals_scored)
    }

    pub fn strength(&self, metrics: Option<&TeamMetrics>) -> f64 {
        (self.defense_quality(metrics) + self.goals_scored(metrics)) / 2.0
    }
}

/// 1.05 when the home side is stronger, 0.95 when the away side is, 1.0 on a tie.
pub fn metrics_weight(pair: &TeamMetricsPair, defaults: &MetricsDefaults) -> f64 {
    let home = defaults.strength(pair.home.as_ref());
    let away = defaults.strength(pair.away.as_ref());
    if home > away {
        1.05
    } else if away > home {
        0.95
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsCatalog {
    pub teams: HashMap<String, TeamMetrics>,
}

impl MetricsCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read metrics catalog {}", path.display()))?;
        parse_catalog_json(&raw)
    }

    pub fn get(&self, team: &str) -> Option<&TeamMetrics> {
        self.teams.get(team.trim())
    }
}

pub fn parse_catalog_json(raw: &str) -> Result<MetricsCatalog> {
    serde_json::from_str::<MetricsCatalog>(raw).context("parse metrics catalog")
}

// Home is resolved before away; unknown teams consume rng draws in that order.
pub fn compute_team_metrics<R: Rng + ?Sized>(
    home_team: &str,
    away_team: &str,
    catalog: &MetricsCatalog,
    rng: &mut R,
) -> TeamMetricsPair {
    TeamMetricsPair {
        home: Some(lookup_or_generate(home_team, catalog, rng)),
        away: Some(lookup_or_generate(away_team, catalog, rng)),
    }
}

fn lookup_or_generate<R: Rng + ?Sized>(
    team: &str,
    catalog: &MetricsCatalog,
    rng: &mut R,
) -> TeamMetrics {
    if let Some(known) = catalog.get(team) {
        return known.clone();
    }
    warn!(team, "team not in metrics catalog, generating fallback profile");
    fallback_metrics(rng)
}

pub fn fallback_metrics<R: Rng + ?Sized>(rng: &mut R) -> TeamMetrics {
    TeamMetrics {
        attack_pattern: Some("Balanced".to_string()),
        defense_quality: Some(f64::from(rng.gen_range(50u32..90))),
        first_half_goals: Some(rng.gen_range(0.0..1.5)),
        victories: Some(rng.gen_range(10..25)),
        goals_scored: Some(rng.gen_range(30..60)),
        goals_conceded: Some(rng.gen_range(15..35)),
    }
}
