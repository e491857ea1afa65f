use serde::Serialize;

use crate::dataset::{Match, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadToHead {
    pub club_a: u32,
    pub club_b: u32,
    pub matches: usize,
    pub wins_a: usize,
    pub wins_b: usize,
    pub draws: usize,
    pub goals_a: u64,
    pub goals_b: u64,
    pub proba_a: f64,
    pub proba_b: f64,
    pub proba_draw: f64,
}

impl HeadToHead {
    pub fn avg_goals_a(&self) -> f64 {
        per_match(self.goals_a as f64, self.matches)
    }

    pub fn avg_goals_b(&self) -> f64 {
        per_match(self.goals_b as f64, self.matches)
    }

    // Raw (unsmoothed) win rates, zero when the clubs never met.
    pub fn win_rate_a(&self) -> f64 {
        per_match(self.wins_a as f64, self.matches)
    }

    pub fn win_rate_b(&self) -> f64 {
        per_match(self.wins_b as f64, self.matches)
    }

    pub fn swapped(&self) -> Self {
        Self {
            club_a: self.club_b,
            club_b: self.club_a,
            matches: self.matches,
            wins_a: self.wins_b,
            wins_b: self.wins_a,
            draws: self.draws,
            goals_a: self.goals_b,
            goals_b: self.goals_a,
            proba_a: self.proba_b,
            proba_b: self.proba_a,
            proba_draw: self.proba_draw,
        }
    }
}

/// Add-one estimate of an outcome seen `count` times in `n` meetings.
///
/// Each outcome is smoothed on its own with the two-outcome denominator, so
/// the three probabilities of a fixture do not sum to one. With no meetings
/// every outcome is pinned at exactly 0.5.
pub fn laplace(count: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.5;
    }
    (count as f64 + 1.0) / (n as f64 + 2.0)
}

pub fn analyze(club_a: u32, club_b: u32, matches: &[Match]) -> HeadToHead {
    let mut n = 0usize;
    let mut wins_a = 0usize;
    let mut wins_b = 0usize;
    let mut draws = 0usize;
    let mut goals_a = 0u64;
    let mut goals_b = 0u64;

    for m in matches.iter().filter(|m| m.is_between(club_a, club_b)) {
        n += 1;
        let a_is_home = m.home_id == club_a;
        let (own_a, own_b) = if a_is_home {
            (m.home_goals, m.away_goals)
        } else {
            (m.away_goals, m.home_goals)
        };
        goals_a += u64::from(own_a);
        goals_b += u64::from(own_b);

        match m.outcome() {
            Outcome::Draw => draws += 1,
            Outcome::HomeWin if a_is_home => wins_a += 1,
            Outcome::AwayWin if !a_is_home => wins_a += 1,
            _ => wins_b += 1,
        }
    }

    HeadToHead {
        club_a,
        club_b,
        matches: n,
        wins_a,
        wins_b,
        draws,
        goals_a,
        goals_b,
        proba_a: laplace(wins_a, n),
        proba_b: laplace(wins_b, n),
        proba_draw: laplace(draws, n),
    }
}

fn per_match(total: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    total / n as f64
}
