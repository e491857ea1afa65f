use chrono::NaiveDate;

use club_compare::dataset::Match;
use club_compare::density::{CurveKind, DensityPlot, sigma_for};
use club_compare::head_to_head::analyze;
use rand::SeedableRng;
use rand::rngs::StdRng;

const A: u32 = 10;
const B: u32 = 20;
const C: u32 = 30;

fn game(id: u64, home_id: u32, away_id: u32, home_goals: u32, away_goals: u32) -> Match {
    Match {
        id,
        date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap() + chrono::Days::new(id * 7),
        home_id,
        away_id,
        home_goals,
        away_goals,
    }
}

// A wins 6 (3 home, 3 away), B wins 3, one draw, plus noise against a third club.
fn ten_meetings() -> Vec<Match> {
    vec![
        game(1, A, B, 2, 0),
        game(2, A, B, 1, 0),
        game(3, A, B, 3, 1),
        game(4, B, A, 0, 1),
        game(5, B, A, 1, 2),
        game(6, B, A, 2, 4),
        game(7, B, A, 2, 1),
        game(8, A, B, 0, 1),
        game(9, B, A, 3, 0),
        game(10, A, B, 1, 1),
        game(11, A, C, 5, 0),
        game(12, C, B, 0, 2),
    ]
}

#[test]
fn ten_meetings_follow_add_one_formula() {
    let h2h = analyze(A, B, &ten_meetings());
    assert_eq!(h2h.matches, 10);
    assert_eq!(h2h.wins_a, 6);
    assert_eq!(h2h.wins_b, 3);
    assert_eq!(h2h.draws, 1);
    assert!((h2h.proba_a - 7.0 / 12.0).abs() < 1e-12);
    assert!((h2h.proba_b - 4.0 / 12.0).abs() < 1e-12);
    assert!((h2h.proba_draw - 2.0 / 12.0).abs() < 1e-12);
}

#[test]
fn smoothed_probabilities_are_not_renormalised() {
    let h2h = analyze(A, B, &ten_meetings());
    let total = h2h.proba_a + h2h.proba_b + h2h.proba_draw;
    // (7 + 4 + 2) / 12
    assert!((total - 13.0 / 12.0).abs() < 1e-12);
}

#[test]
fn goals_are_each_sides_own() {
    let h2h = analyze(A, B, &ten_meetings());
    // A: 2+1+3+1+2+4+1+0+0+1, B: 0+0+1+0+1+2+2+1+3+1
    assert_eq!(h2h.goals_a, 15);
    assert_eq!(h2h.goals_b, 11);
    assert!((h2h.avg_goals_a() - 1.5).abs() < 1e-12);
    assert!((h2h.avg_goals_b() - 1.1).abs() < 1e-12);
}

#[test]
fn swapping_clubs_mirrors_the_result() {
    let matches = ten_meetings();
    let ab = analyze(A, B, &matches);
    let ba = analyze(B, A, &matches);
    assert_eq!(ba, ab.swapped());
    assert_eq!(ba.wins_a, ab.wins_b);
    assert_eq!(ba.goals_b, ab.goals_a);
    assert_eq!(ba.proba_a, ab.proba_b);
}

#[test]
fn no_meetings_pins_probabilities_at_half() {
    // Both clubs have plenty of other results; none between them.
    let matches = vec![game(1, A, C, 3, 0), game(2, C, B, 0, 4), game(3, B, C, 1, 1)];
    let h2h = analyze(A, B, &matches);
    assert_eq!(h2h.matches, 0);
    assert_eq!(h2h.proba_a, 0.5);
    assert_eq!(h2h.proba_b, 0.5);
    assert_eq!(h2h.proba_draw, 0.5);
    assert_eq!(h2h.avg_goals_a(), 0.0);
    assert_eq!(h2h.win_rate_a(), 0.0);
}

#[test]
fn empty_history_is_the_no_information_case() {
    let h2h = analyze(A, B, &[]);
    assert_eq!(h2h.matches, 0);
    assert_eq!(h2h.proba_a, 0.5);
    assert_eq!(h2h.proba_b, 0.5);
}

#[test]
fn density_sigma_is_floored_for_a_club_that_never_won() {
    let matches = vec![
        game(1, A, B, 0, 1),
        game(2, B, A, 2, 0),
        game(3, A, B, 1, 3),
        game(4, B, A, 1, 0),
        game(5, A, B, 0, 0),
    ];
    let h2h = analyze(A, B, &matches);
    assert_eq!(h2h.matches, 5);
    assert_eq!(h2h.wins_a, 0);

    let mut rng = StdRng::seed_from_u64(42);
    let plot = DensityPlot::from_head_to_head(&h2h, &mut rng);
    let win_a = plot.curve(CurveKind::WinA).unwrap();
    assert_eq!(win_a.mu, 0.0);
    assert_eq!(win_a.sigma, 0.1);
    assert_eq!(win_a.sigma, sigma_for(0.0, 5));
    assert_eq!(win_a.points.len(), 100);

    // Draw curve sits on the smoothed draw probability, not the raw rate.
    let draw = plot.curve(CurveKind::Draw).unwrap();
    assert!((draw.mu - 2.0 / 7.0).abs() < 1e-12);

    let win_b = plot.curve(CurveKind::WinB).unwrap();
    assert!((win_b.mu - 0.8).abs() < 1e-12);
    assert!((win_b.sigma - (0.8_f64 * 0.2 / 5.0).sqrt()).abs() < 1e-12);
}

#[test]
fn density_marker_depends_only_on_the_seed() {
    let h2h = analyze(A, B, &ten_meetings());
    let p1 = DensityPlot::from_head_to_head(&h2h, &mut StdRng::seed_from_u64(9));
    let p2 = DensityPlot::from_head_to_head(&h2h, &mut StdRng::seed_from_u64(9));
    assert_eq!(p1.marker, p2.marker);
    assert!((0.0..1.0).contains(&p1.marker));
    assert!(p1.y_max() > 0.0);
}
