use std::fs;
use std::path::PathBuf;

use match_oracle::batch::{parse_case_json, parse_cases_json, predict_case, run_batch};
use match_oracle::metrics::{MetricsCatalog, parse_catalog_json};
use match_oracle::state::Outcome;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture file should be readable")
}

#[test]
fn parses_single_case_fixture() {
    let case = parse_case_json(&read_fixture("predict_case.json")).expect("fixture should parse");
    assert_eq!(case.fixture.id.as_deref(), Some("l1-2026-r12-ol-om"));
    assert_eq!(case.fixture.league.as_deref(), Some("Ligue 1"));
    let h2h = case.h2h.as_ref().expect("h2h present");
    assert_eq!(h2h.len(), 4);
    assert_eq!(h2h[0].winner(), "Lyon");
    assert_eq!(h2h[1].winner(), "Marseille");
    assert!(h2h[3].is_draw());
    let metrics = case.metrics.as_ref().expect("metrics present");
    assert_eq!(metrics.away.as_ref().and_then(|m| m.goals_conceded), None);
}

#[test]
fn single_case_predicts_home_win() {
    let case = parse_case_json(&read_fixture("predict_case.json")).expect("fixture should parse");
    let h2h = case.h2h.clone().unwrap_or_default();
    let p = predict_case(&case, &h2h, &MetricsCatalog::default(), 2026).expect("prediction");
    assert_eq!(p.outcome, Outcome::Home);
    assert_eq!(p.winner, "Lyon");
    assert_eq!(p.confidence, 60);
    assert_eq!(p.match_id.as_deref(), Some("l1-2026-r12-ol-om"));
    assert_eq!(p.analysis_factors["H2H History"], "Analyzed");
}

#[test]
fn parses_metrics_catalog_fixture() {
    let catalog = parse_catalog_json(&read_fixture("team_metrics.json")).expect("catalog");
    assert_eq!(catalog.teams.len(), 2);
    let lille = catalog.get("Lille").expect("Lille present");
    assert_eq!(lille.victories, Some(19));
    assert!(catalog.get("Lens").is_none());
}

#[test]
fn loads_metrics_catalog_from_disk() {
    let catalog = MetricsCatalog::load(&fixture_path("team_metrics.json")).expect("catalog");
    let rennes = catalog.get(" Rennes ").expect("lookup trims names");
    assert_eq!(rennes.attack_pattern.as_deref(), Some("Counter"));
    assert_eq!(rennes.goals_scored, Some(44));
}

#[test]
fn missing_metrics_catalog_names_the_path() {
    let path = fixture_path("no_such_catalog.json");
    let err = MetricsCatalog::load(&path).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("read metrics catalog"));
    assert!(msg.contains("no_such_catalog.json"));
}

#[test]
fn batch_fixture_reports_bad_case_in_place() {
    let cases = parse_cases_json(&read_fixture("batch_cases.json")).expect("cases");
    let catalog = parse_catalog_json(&read_fixture("team_metrics.json")).expect("catalog");
    let rows = run_batch(&cases, &catalog, 9, 2);
    assert_eq!(rows.len(), 4);

    let winners: Vec<_> = rows
        .iter()
        .take(3)
        .map(|r| r.result.as_ref().expect("valid case").outcome)
        .collect();
    assert_eq!(winners, vec![Outcome::Home, Outcome::Away, Outcome::Draw]);
    assert_eq!(
        rows[2].result.as_ref().expect("valid").analysis_factors["H2H History"],
        "Analyzed"
    );
    assert!(rows[3].result.as_ref().unwrap_err().contains("draw coefficient"));
}

#[test]
fn malformed_case_is_an_error() {
    assert!(parse_case_json(r#"{"match":{"home_team":"Lyon"}}"#).is_err());
    assert!(parse_cases_json("{}").is_err());
}
