use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use match_oracle::batch::{parse_case_json, resolve_metrics};
use match_oracle::config::{EngineConfig, init_tracing, load_dotenv};
use match_oracle::h2h::{HeadToHeadRecord, h2h_weight, tally};
use match_oracle::h2h_store;
use match_oracle::metrics::{
    MetricsCatalog, MetricsDefaults, TeamMetrics, compute_team_metrics, metrics_weight,
};
use match_oracle::odds::{bookmaker_margin, normalize_coefficients};
use match_oracle::prediction::generate_prediction;
use match_oracle::state::Prediction;

#[derive(Parser)]
#[command(name = "match_oracle")]
#[command(about = "Match outcome predictions from betting coefficients, head-to-head and team metrics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite file holding head-to-head records
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a single fixture from a JSON case file
    Predict {
        case: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        /// JSON catalog of known team metrics
        #[arg(long)]
        metrics: Option<PathBuf>,
        /// Print the prediction record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Head-to-head history
    H2h {
        #[command(subcommand)]
        action: H2hAction,
    },
    /// Show the metrics the engine would use for a fixture
    Metrics {
        #[arg(long)]
        home: String,
        #[arg(long)]
        away: String,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        metrics: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum H2hAction {
    /// Record a past meeting
    Add {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        home: String,
        #[arg(long)]
        away: String,
        #[arg(long)]
        home_score: u32,
        #[arg(long)]
        away_score: u32,
    },
    /// List stored meetings between two teams
    List {
        #[arg(long)]
        home: String,
        #[arg(long)]
        away: String,
    },
}

fn main() -> Result<()> {
    load_dotenv();
    init_tracing();

    let cli = Cli::parse();
    let mut config = EngineConfig::from_env();
    if let Some(db) = cli.db {
        config.h2h_db_path = Some(db);
    }

    match cli.command {
        Commands::Predict {
            case,
            seed,
            metrics,
            json,
        } => run_predict(&config, case, seed, metrics, json),
        Commands::H2h { action } => run_h2h(&config, action),
        Commands::Metrics {
            home,
            away,
            seed,
            metrics,
        } => run_metrics(&config, &home, &away, seed, metrics),
    }
}

fn run_predict(
    config: &EngineConfig,
    case_path: PathBuf,
    seed: Option<u64>,
    metrics_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let raw = fs::read_to_string(&case_path)
        .with_context(|| format!("read {}", case_path.display()))?;
    let case = parse_case_json(&raw)?;
    let catalog = load_catalog(metrics_path.as_ref().or(config.metrics_path.as_ref()))?;

    let h2h = match &case.h2h {
        Some(records) => records.clone(),
        None => stored_meetings(config, &case.fixture.home_team, &case.fixture.away_team)?,
    };

    let seed = seed.unwrap_or_else(|| config.seed_or_random());
    info!(seed, "predicting {}", case.label());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let metrics = resolve_metrics(&case, &catalog, &mut rng);
    let prediction = generate_prediction(&case.fixture, &h2h, &metrics, &mut rng)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    let coef = &case.fixture.coefficients;
    let probs = normalize_coefficients(coef)?;
    let margin = bookmaker_margin(coef)?;
    let t = tally(&h2h, &prediction.home_team, &prediction.away_team);
    println!("{} v {}", prediction.home_team, prediction.away_team);
    println!(
        "Market:     home {:.1}% | draw {:.1}% | away {:.1}% (margin {:.1}%)",
        probs.home, probs.draw, probs.away, margin
    );
    println!(
        "H2H:        {}-{}-{} (weight {:.2})",
        t.home_wins,
        t.draws,
        t.away_wins,
        h2h_weight(&h2h, &prediction.home_team, &prediction.away_team)
    );
    println!(
        "Metrics:    weight {:.2}",
        metrics_weight(&metrics, &MetricsDefaults::default())
    );
    print_prediction(&prediction, seed);
    Ok(())
}

fn run_h2h(config: &EngineConfig, action: H2hAction) -> Result<()> {
    let path = config
        .h2h_db_path
        .as_ref()
        .ok_or_else(|| anyhow!("no h2h database path (set H2H_DB_PATH or --db)"))?;
    let conn = h2h_store::open_db(path)?;

    match action {
        H2hAction::Add {
            date,
            home,
            away,
            home_score,
            away_score,
        } => {
            let record = HeadToHeadRecord::new(date, &home, &away, home_score, away_score)?;
            let id = h2h_store::insert_record(&conn, &record)?;
            println!(
                "#{id} {} {} {}-{} {} (winner: {})",
                record.date(),
                record.home_team(),
                record.home_score(),
                record.away_score(),
                record.away_team(),
                record.winner()
            );
        }
        H2hAction::List { home, away } => {
            let records = h2h_store::load_between(&conn, &home, &away)?;
            if records.is_empty() {
                println!("No meetings stored for {home} v {away}");
                return Ok(());
            }
            for r in &records {
                println!(
                    "{} {} {}-{} {} ({})",
                    r.date(),
                    r.home_team(),
                    r.home_score(),
                    r.away_score(),
                    r.away_team(),
                    r.winner()
                );
            }
            let t = tally(&records, home.trim(), away.trim());
            println!(
                "{} wins: {} | draws: {} | {} wins: {}",
                home.trim(),
                t.home_wins,
                t.draws,
                away.trim(),
                t.away_wins
            );
        }
    }
    Ok(())
}

fn run_metrics(
    config: &EngineConfig,
    home: &str,
    away: &str,
    seed: Option<u64>,
    metrics_path: Option<PathBuf>,
) -> Result<()> {
    let catalog = load_catalog(metrics_path.as_ref().or(config.metrics_path.as_ref()))?;
    let seed = seed.unwrap_or_else(|| config.seed_or_random());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let pair = compute_team_metrics(home, away, &catalog, &mut rng);
    let defaults = MetricsDefaults::default();
    print_metrics(home, pair.home.as_ref(), &defaults);
    print_metrics(away, pair.away.as_ref(), &defaults);
    println!("Metrics weight: {:.2}", metrics_weight(&pair, &defaults));
    Ok(())
}

fn load_catalog(path: Option<&PathBuf>) -> Result<MetricsCatalog> {
    match path {
        Some(path) => MetricsCatalog::load(path),
        None => Ok(MetricsCatalog::default()),
    }
}

fn stored_meetings(config: &EngineConfig, home: &str, away: &str) -> Result<Vec<HeadToHeadRecord>> {
    let Some(path) = config.h2h_db_path.as_ref().filter(|p| p.exists()) else {
        return Ok(Vec::new());
    };
    let conn = h2h_store::open_db(path)?;
    h2h_store::load_between(&conn, home, away)
}

fn print_metrics(team: &str, metrics: Option<&TeamMetrics>, defaults: &MetricsDefaults) {
    let pattern = metrics
        .and_then(|m| m.attack_pattern.as_deref())
        .unwrap_or("-");
    println!(
        "{team}: defense {:.0} | goals scored {:.0} | strength {:.1} | pattern {pattern}",
        defaults.defense_quality(metrics),
        defaults.goals_scored(metrics),
        defaults.strength(metrics),
    );
}

fn print_prediction(p: &Prediction, seed: u64) {
    println!("Winner:     {} ({}% confidence)", p.winner, p.confidence);
    println!("Half-time:  {}", p.first_half_score);
    println!("Full-time:  {} ({} goals)", p.full_time_score, p.total_goals);
    for (factor, label) in &p.analysis_factors {
        println!("  {factor}: {label}");
    }
    println!("Seed:       {seed}");
}
