use serde::Serialize;

use crate::dataset::{Match, Outcome};

pub fn wins(club_id: u32, matches: &[Match]) -> usize {
    matches
        .iter()
        .filter(|m| match m.outcome() {
            Outcome::HomeWin => m.home_id == club_id,
            Outcome::AwayWin => m.away_id == club_id,
            Outcome::Draw => false,
        })
        .count()
}

pub fn losses(club_id: u32, matches: &[Match]) -> usize {
    matches
        .iter()
        .filter(|m| match m.outcome() {
            Outcome::HomeWin => m.away_id == club_id && m.home_id != club_id,
            Outcome::AwayWin => m.home_id == club_id && m.away_id != club_id,
            Outcome::Draw => false,
        })
        .count()
}

pub fn draws(club_id: u32, matches: &[Match]) -> usize {
    matches
        .iter()
        .filter(|m| m.involves(club_id) && m.outcome() == Outcome::Draw)
        .count()
}

pub fn matches_involving(club_id: u32, matches: &[Match]) -> usize {
    matches.iter().filter(|m| m.involves(club_id)).count()
}

pub fn involving(club_id: u32, matches: &[Match]) -> Vec<Match> {
    matches
        .iter()
        .filter(|m| m.involves(club_id))
        .cloned()
        .collect()
}

pub fn goals(club_id: u32, matches: &[Match]) -> u64 {
    matches
        .iter()
        .map(|m| {
            if m.home_id == club_id {
                u64::from(m.home_goals)
            } else if m.away_id == club_id {
                u64::from(m.away_goals)
            } else {
                0
            }
        })
        .sum()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClubRecord {
    pub played: usize,
    pub wins: usize,
    pub goals: u64,
}

impl ClubRecord {
    pub fn compute(club_id: u32, matches: &[Match]) -> Self {
        let own = involving(club_id, matches);
        Self {
            played: own.len(),
            wins: wins(club_id, &own),
            goals: goals(club_id, &own),
        }
    }

    pub fn win_pct(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        self.wins as f64 / self.played as f64 * 100.0
    }

    pub fn avg_goals(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        self.goals as f64 / self.played as f64
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn game(home_id: u32, away_id: u32, home_goals: u32, away_goals: u32) -> Match {
        Match {
            id: 0,
            date: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
            home_id,
            away_id,
            home_goals,
            away_goals,
        }
    }

    #[test]
    fn empty_record_has_zero_rates() {
        let record = ClubRecord::compute(7, &[]);
        assert_eq!(record, ClubRecord::default());
        assert_eq!(record.win_pct(), 0.0);
        assert_eq!(record.avg_goals(), 0.0);
    }

    #[test]
    fn record_only_counts_own_matches() {
        let matches = vec![game(1, 2, 3, 0), game(3, 1, 1, 1), game(2, 3, 4, 4)];
        let record = ClubRecord::compute(1, &matches);
        assert_eq!(record.played, 2);
        assert_eq!(record.wins, 1);
        assert_eq!(record.goals, 4);
        assert!((record.win_pct() - 50.0).abs() < 1e-12);
        assert!((record.avg_goals() - 2.0).abs() < 1e-12);
    }
}
