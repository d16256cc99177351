use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use match_oracle::batch::{load_cases, run_batch};
use match_oracle::config::{EngineConfig, init_tracing, load_dotenv};
use match_oracle::metrics::MetricsCatalog;
use match_oracle::report_export::export_predictions_xlsx;

#[derive(Parser)]
#[command(name = "batch_predict")]
#[command(about = "Predict every fixture in a JSON case list")]
struct Args {
    /// JSON array of prediction cases
    #[arg(default_value = "tests/fixtures/batch_cases.json")]
    cases: PathBuf,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    metrics: Option<PathBuf>,
    #[arg(long)]
    threads: Option<usize>,
    /// Also write the results to an XLSX workbook
    #[arg(long)]
    xlsx: Option<PathBuf>,
}

fn main() -> Result<()> {
    load_dotenv();
    init_tracing();

    let args = Args::parse();
    let config = EngineConfig::from_env();

    let cases = load_cases(&args.cases)?;
    let catalog = match args.metrics.as_ref().or(config.metrics_path.as_ref()) {
        Some(path) => MetricsCatalog::load(path)?,
        None => MetricsCatalog::default(),
    };
    let seed = args.seed.unwrap_or_else(|| config.seed_or_random());
    let threads = args
        .threads
        .map(|t| t.clamp(1, 32))
        .unwrap_or(config.batch_parallelism);
    info!(cases = cases.len(), seed, threads, "running batch");

    let rows = run_batch(&cases, &catalog, seed, threads);
    for row in &rows {
        match &row.result {
            Ok(p) => println!(
                "{:>3} {:<32} {:<16} {:>3}%  HT {}  FT {}",
                row.index, row.label, p.winner, p.confidence, p.first_half_score, p.full_time_score
            ),
            Err(err) => println!("{:>3} {:<32} ERROR {err}", row.index, row.label),
        }
    }

    if let Some(path) = args.xlsx {
        let report = export_predictions_xlsx(&path, &rows)?;
        println!(
            "Wrote {} predictions ({} failed) to {}",
            report.predictions,
            report.failures,
            path.display()
        );
    }
    Ok(())
}
