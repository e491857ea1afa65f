use std::path::PathBuf;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;

use club_compare::clubs::ClubIndex;
use club_compare::dataset::{DEFAULT_RECENT_DAYS, Dataset};
use club_compare::density::{CurveKind, DensityPlot};
use club_compare::error::CompareError;
use club_compare::export::export_comparison;
use club_compare::report::{compare, render_report};

const MADRID: &str = "Real Madrid";
const BARCA: &str = "Futbol Club Barcelona";

fn load() -> (Dataset, ClubIndex) {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let dataset = Dataset::load_dir(&dir, today, DEFAULT_RECENT_DAYS).unwrap();
    let index = ClubIndex::new(&dataset.clubs);
    (dataset, index)
}

#[test]
fn all_time_head_to_head() {
    let (dataset, index) = load();
    let c = compare(&dataset, &index, Some(MADRID), Some(BARCA)).unwrap();

    assert_eq!(c.overall.matches, 10);
    assert_eq!(c.overall.wins_a, 5);
    assert_eq!(c.overall.wins_b, 4);
    assert_eq!(c.overall.draws, 1);
    assert_eq!(c.overall.goals_a, 13);
    assert_eq!(c.overall.goals_b, 18);
    assert!((c.overall.proba_a - 6.0 / 12.0).abs() < 1e-12);
    assert!((c.overall.proba_b - 5.0 / 12.0).abs() < 1e-12);
}

#[test]
fn recent_head_to_head() {
    let (dataset, index) = load();
    let c = compare(&dataset, &index, Some(MADRID), Some(BARCA)).unwrap();

    assert_eq!(c.recent.matches, 7);
    assert_eq!(c.recent.wins_a, 4);
    assert_eq!(c.recent.wins_b, 2);
    assert_eq!(c.recent.draws, 1);
    assert_eq!(c.recent.goals_a, 10);
    assert_eq!(c.recent.goals_b, 9);
    assert!((c.recent.proba_a - 5.0 / 9.0).abs() < 1e-12);
    assert!((c.recent.proba_b - 3.0 / 9.0).abs() < 1e-12);
    assert!((c.recent.proba_draw - 2.0 / 9.0).abs() < 1e-12);
}

#[test]
fn club_profiles_cover_both_windows() {
    let (dataset, index) = load();
    let c = compare(&dataset, &index, Some(MADRID), Some(BARCA)).unwrap();

    assert_eq!(c.club_a.id, 418);
    assert_eq!(c.club_a.players, 3);
    assert_eq!(c.club_a.overall.played, 12);
    assert_eq!(c.club_a.overall.wins, 6);
    assert_eq!(c.club_a.overall.goals, 16);
    assert_eq!(c.club_a.recent.played, 9);
    assert_eq!(c.club_a.recent.wins, 5);
    assert_eq!(c.club_a.recent.goals, 13);

    assert_eq!(c.club_b.id, 131);
    assert_eq!(c.club_b.overall.played, 11);
    assert_eq!(c.club_b.overall.wins, 4);
    assert_eq!(c.club_b.overall.goals, 19);
    assert_eq!(c.club_b.total_market_value, Some(812.5));
}

#[test]
fn report_lists_every_section() {
    let (dataset, index) = load();
    let c = compare(&dataset, &index, Some(MADRID), Some(BARCA)).unwrap();
    let text = render_report(&c);

    assert!(text.starts_with("Comparison: Real Madrid vs Futbol Club Barcelona"));
    assert!(text.contains("===== General statistics ====="));
    assert!(text.contains("Total market value (M€): N/A"));
    assert!(text.contains("Total market value (M€): 812.5"));
    assert!(text.contains("Win%: 50.00%"));
    assert!(text.contains("--- Head-to-head (all time) ---"));
    assert!(text.contains("Meetings: 10"));
    assert!(text.contains("Real Madrid wins (Laplace): 0.50"));
    assert!(text.contains("===== Last 5 years (since 2019-06-03) ====="));
    assert!(text.contains("--- Head-to-head (last 5 years) ---"));
    assert!(text.contains("Draws: 1"));
    assert!(text.contains("Draw (Laplace): 0.22"));
    // The draw probability is only reported for the recent window.
    assert_eq!(text.matches("Draw (Laplace)").count(), 1);
}

#[test]
fn clubs_that_never_met() {
    let (dataset, index) = load();
    let c = compare(&dataset, &index, Some("Real Sociedad"), Some("Villarreal CF")).unwrap();
    assert_eq!(c.overall.matches, 0);
    assert_eq!(c.overall.proba_a, 0.5);
    assert_eq!(c.recent.proba_draw, 0.5);
    let text = render_report(&c);
    assert!(text.contains("Meetings: 0"));
    assert!(text.contains("Average goals per match Real Sociedad: 0.00"));
}

#[test]
fn selection_errors_are_not_fatal() {
    let (dataset, index) = load();

    let err = compare(&dataset, &index, Some(MADRID), None).unwrap_err();
    assert!(matches!(err, CompareError::Validation(_)));
    assert!(!err.is_fatal());

    let err = compare(&dataset, &index, Some(MADRID), Some(MADRID)).unwrap_err();
    assert_eq!(err.to_string(), "select two different clubs");

    let err = compare(&dataset, &index, Some(MADRID), Some("Atletico")).unwrap_err();
    assert!(matches!(err, CompareError::NotFound(_)));
    assert!(!err.is_fatal());
}

#[test]
fn density_from_recent_window() {
    let (dataset, index) = load();
    let c = compare(&dataset, &index, Some(MADRID), Some(BARCA)).unwrap();
    let plot = DensityPlot::from_head_to_head(&c.recent, &mut StdRng::seed_from_u64(1));

    assert_eq!(plot.matches, 7);
    assert_eq!(plot.curves.len(), 3);
    let win_a = plot.curve(CurveKind::WinA).unwrap();
    let mu = 4.0 / 7.0;
    assert!((win_a.mu - mu).abs() < 1e-12);
    assert!((win_a.sigma - (mu * (1.0 - mu) / 7.0_f64).sqrt()).abs() < 1e-12);
    assert_eq!(win_a.points.first().unwrap().0, 0.0);
    assert_eq!(win_a.points.last().unwrap().0, 1.0);
}

#[test]
fn workbook_export_writes_three_sheets() {
    let (dataset, index) = load();
    let c = compare(&dataset, &index, Some(MADRID), Some(BARCA)).unwrap();
    let plot = DensityPlot::from_head_to_head(&c.recent, &mut StdRng::seed_from_u64(5));

    let path = std::env::temp_dir().join(format!(
        "club_compare_export_{}.xlsx",
        std::process::id()
    ));
    let summary = export_comparison(&path, &c, Some(&plot)).unwrap();
    assert_eq!(summary.club_rows, 4);
    assert_eq!(summary.head_to_head_rows, 2);
    assert_eq!(summary.density_rows, 100);
    assert!(path.exists());
    let _ = std::fs::remove_file(&path);
}
