use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::batch::BatchRow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub predictions: usize,
    pub failures: usize,
}

const HEADER: [&str; 12] = [
    "Index",
    "Fixture",
    "Seed",
    "Home",
    "Away",
    "Winner",
    "Confidence",
    "First Half",
    "Full Time",
    "Total Goals",
    "H2H History",
    "Error",
];

pub fn prediction_rows(rows: &[BatchRow]) -> Vec<Vec<String>> {
    let mut out = Vec::with_capacity(rows.len() + 1);
    out.push(HEADER.iter().map(|h| h.to_string()).collect());
    for row in rows {
        let mut cells = vec![row.index.to_string(), row.label.clone(), row.seed.to_string()];
        match &row.result {
            Ok(p) => {
                cells.extend([
                    p.home_team.clone(),
                    p.away_team.clone(),
                    p.winner.clone(),
                    p.confidence.to_string(),
                    p.first_half_score.to_string(),
                    p.full_time_score.to_string(),
                    p.total_goals.to_string(),
                    p.analysis_factors
                        .get("H2H History")
                        .cloned()
                        .unwrap_or_default(),
                    String::new(),
                ]);
            }
            Err(err) => {
                cells.extend(std::iter::repeat_n(String::new(), 8));
                cells.push(err.clone());
            }
        }
        out.push(cells);
    }
    out
}

pub fn export_predictions_xlsx(path: &Path, rows: &[BatchRow]) -> Result<ExportReport> {
    let table = prediction_rows(rows);
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Predictions")?;
        write_rows(sheet, &table)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    let failures = rows.iter().filter(|r| r.result.is_err()).count();
    Ok(ExportReport {
        predictions: rows.len() - failures,
        failures,
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
