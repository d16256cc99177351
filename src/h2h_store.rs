use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, params};
use tracing::info;

use crate::config::app_data_dir;
use crate::h2h::HeadToHeadRecord;

pub const DB_FILE: &str = "h2h.sqlite";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn default_db_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(DB_FILE))
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS h2h_matches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            match_date TEXT NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            home_score INTEGER NOT NULL,
            away_score INTEGER NOT NULL,
            winner TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_h2h_teams ON h2h_matches(home_team, away_team);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

pub fn insert_record(conn: &Connection, record: &HeadToHeadRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO h2h_matches(match_date, home_team, away_team, home_score, away_score, winner, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.date().format(DATE_FORMAT).to_string(),
            record.home_team(),
            record.away_team(),
            record.home_score(),
            record.away_score(),
            record.winner(),
            Utc::now().to_rfc3339(),
        ],
    )
    .context("insert h2h record")?;
    let id = conn.last_insert_rowid();
    info!(
        id,
        home = record.home_team(),
        away = record.away_team(),
        "stored h2h record"
    );
    Ok(id)
}

/// Every stored meeting between the two teams, either venue, oldest first.
pub fn load_between(conn: &Connection, team_a: &str, team_b: &str) -> Result<Vec<HeadToHeadRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT match_date, home_team, away_team, home_score, away_score
             FROM h2h_matches
             WHERE (home_team = ?1 AND away_team = ?2) OR (home_team = ?2 AND away_team = ?1)
             ORDER BY match_date, id",
        )
        .context("prepare h2h query")?;
    let rows = stmt
        .query_map(params![team_a.trim(), team_b.trim()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, u32>(4)?,
            ))
        })
        .context("query h2h records")?;

    let mut out = Vec::new();
    for row in rows {
        let (date, home, away, home_score, away_score) = row.context("read h2h row")?;
        let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .with_context(|| format!("bad stored date {date}"))?;
        out.push(HeadToHeadRecord::new(date, &home, &away, home_score, away_score)?);
    }
    Ok(out)
}
