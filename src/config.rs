use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::h2h_store;

const DATA_DIR: &str = "match_oracle";
const DEFAULT_BATCH_PARALLELISM: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub seed: Option<u64>,
    pub metrics_path: Option<PathBuf>,
    pub h2h_db_path: Option<PathBuf>,
    pub batch_parallelism: usize,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("PREDICT_SEED").and_then(|v| v.trim().parse::<u64>().ok());
        let metrics_path = path_from(&lookup, "TEAM_METRICS_PATH");
        let h2h_db_path = path_from(&lookup, "H2H_DB_PATH")
            .or_else(|| data_dir_from(&lookup).map(|dir| dir.join(h2h_store::DB_FILE)));
        let batch_parallelism = lookup("BATCH_PARALLELISM")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_BATCH_PARALLELISM)
            .clamp(1, 32);

        Self {
            seed,
            metrics_path,
            h2h_db_path,
            batch_parallelism,
        }
    }

    /// Configured seed, or a fresh one from the thread RNG.
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

// Existing variables win over `.env.local`, which wins over `.env`.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn app_data_dir() -> Option<PathBuf> {
    data_dir_from(&|key: &str| env::var(key).ok())
}

fn data_dir_from(lookup: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(dir) = path_from(lookup, "MATCH_ORACLE_HOME") {
        return Some(dir);
    }
    path_from(lookup, "HOME").map(|home| home.join(".cache").join(DATA_DIR))
}

fn path_from(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<PathBuf> {
    lookup(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = config_with(&[]);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.metrics_path, None);
        assert_eq!(cfg.h2h_db_path, None);
        assert_eq!(cfg.batch_parallelism, 4);
    }

    #[test]
    fn seed_parses_and_ignores_garbage() {
        assert_eq!(config_with(&[("PREDICT_SEED", " 42 ")]).seed, Some(42));
        assert_eq!(config_with(&[("PREDICT_SEED", "-3")]).seed, None);
        assert_eq!(config_with(&[("PREDICT_SEED", "abc")]).seed, None);
        assert_eq!(config_with(&[("PREDICT_SEED", "7")]).seed_or_random(), 7);
    }

    #[test]
    fn parallelism_is_clamped() {
        assert_eq!(config_with(&[("BATCH_PARALLELISM", "0")]).batch_parallelism, 1);
        assert_eq!(config_with(&[("BATCH_PARALLELISM", "12")]).batch_parallelism, 12);
        assert_eq!(config_with(&[("BATCH_PARALLELISM", "500")]).batch_parallelism, 32);
        assert_eq!(config_with(&[("BATCH_PARALLELISM", "many")]).batch_parallelism, 4);
    }

    #[test]
    fn db_path_falls_back_through_data_dirs() {
        let cfg = config_with(&[("HOME", "/home/fan")]);
        assert_eq!(
            cfg.h2h_db_path,
            Some(PathBuf::from("/home/fan/.cache/match_oracle/h2h.sqlite"))
        );

        let cfg = config_with(&[("HOME", "/home/fan"), ("MATCH_ORACLE_HOME", "/srv/oracle")]);
        assert_eq!(cfg.h2h_db_path, Some(PathBuf::from("/srv/oracle/h2h.sqlite")));

        let cfg = config_with(&[("MATCH_ORACLE_HOME", "/srv/oracle"), ("H2H_DB_PATH", "/tmp/x.db")]);
        assert_eq!(cfg.h2h_db_path, Some(PathBuf::from("/tmp/x.db")));
    }

    #[test]
    fn blank_paths_count_as_unset() {
        let cfg = config_with(&[("TEAM_METRICS_PATH", "  "), ("MATCH_ORACLE_HOME", "")]);
        assert_eq!(cfg.metrics_path, None);
        assert_eq!(cfg.h2h_db_path, None);
    }
}
