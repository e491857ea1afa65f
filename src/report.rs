use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::clubs::ClubIndex;
use crate::dataset::Dataset;
use crate::error::{CompareError, Result};
use crate::head_to_head::{self, HeadToHead};
use crate::stats::ClubRecord;

#[derive(Debug, Clone, Serialize)]
pub struct ClubProfile {
    pub id: u32,
    pub name: String,
    pub players: usize,
    pub total_market_value: Option<f64>,
    pub squad_size: u32,
    pub overall: ClubRecord,
    pub recent: ClubRecord,
}

impl ClubProfile {
    fn build(dataset: &Dataset, id: u32, name: &str) -> Self {
        let club = dataset.club(id);
        Self {
            id,
            name: name.to_string(),
            players: dataset.player_count(id),
            total_market_value: club.and_then(|c| c.total_market_value),
            squad_size: club.map(|c| c.squad_size).unwrap_or_default(),
            overall: ClubRecord::compute(id, &dataset.matches),
            recent: ClubRecord::compute(id, &dataset.recent),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub club_a: ClubProfile,
    pub club_b: ClubProfile,
    pub overall: HeadToHead,
    pub recent: HeadToHead,
    pub cutoff: NaiveDate,
    pub recent_days: u32,
}

pub fn validate_selection<'a>(
    name_a: Option<&'a str>,
    name_b: Option<&'a str>,
) -> Result<(&'a str, &'a str)> {
    let name_a = name_a.map(str::trim).filter(|s| !s.is_empty());
    let name_b = name_b.map(str::trim).filter(|s| !s.is_empty());
    let (Some(a), Some(b)) = (name_a, name_b) else {
        return Err(CompareError::Validation("select two clubs".to_string()));
    };
    if a == b {
        return Err(CompareError::Validation(
            "select two different clubs".to_string(),
        ));
    }
    Ok((a, b))
}

pub fn compare(
    dataset: &Dataset,
    index: &ClubIndex,
    name_a: Option<&str>,
    name_b: Option<&str>,
) -> Result<Comparison> {
    let (name_a, name_b) = validate_selection(name_a, name_b)?;
    let id_a = index.resolve(name_a)?;
    let id_b = index.resolve(name_b)?;

    let comparison = Comparison {
        club_a: ClubProfile::build(dataset, id_a, name_a),
        club_b: ClubProfile::build(dataset, id_b, name_b),
        overall: head_to_head::analyze(id_a, id_b, &dataset.matches),
        recent: head_to_head::analyze(id_a, id_b, &dataset.recent),
        cutoff: dataset.cutoff,
        recent_days: dataset.recent_days,
    };
    tracing::debug!(
        club_a = id_a,
        club_b = id_b,
        meetings = comparison.overall.matches,
        recent_meetings = comparison.recent.matches,
        "comparison computed"
    );
    Ok(comparison)
}

pub fn render_report(c: &Comparison) -> String {
    let a = &c.club_a.name;
    let b = &c.club_b.name;
    let mut out = String::new();

    let _ = writeln!(out, "Comparison: {a} vs {b}");
    let _ = writeln!(out);
    let _ = writeln!(out, "===== General statistics =====");
    write_profile(&mut out, &c.club_a, &c.club_a.overall, true);
    write_profile(&mut out, &c.club_b, &c.club_b.overall, true);

    let _ = writeln!(out, "--- Head-to-head (all time) ---");
    write_head_to_head(&mut out, a, b, &c.overall, false);
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "===== {} (since {}) =====",
        window_label(c.recent_days),
        c.cutoff.format("%Y-%m-%d")
    );
    write_profile(&mut out, &c.club_a, &c.club_a.recent, false);
    write_profile(&mut out, &c.club_b, &c.club_b.recent, false);

    let _ = writeln!(out, "--- Head-to-head ({}) ---", window_label(c.recent_days).to_lowercase());
    write_head_to_head(&mut out, a, b, &c.recent, true);
    out
}

pub fn window_label(days: u32) -> String {
    if days > 0 && days % 365 == 0 {
        let years = days / 365;
        if years == 1 {
            return "Last year".to_string();
        }
        return format!("Last {years} years");
    }
    format!("Last {days} days")
}

fn write_profile(out: &mut String, club: &ClubProfile, record: &ClubRecord, full: bool) {
    let _ = writeln!(out, "--- {} ---", club.name);
    if full {
        let _ = writeln!(out, "Players: {}", club.players);
    }
    let _ = writeln!(out, "Matches played: {}", record.played);
    let _ = writeln!(out, "Matches won: {}", record.wins);
    let _ = writeln!(out, "Win%: {:.2}%", record.win_pct());
    let _ = writeln!(out, "Goals scored: {}", record.goals);
    let _ = writeln!(out, "Average goals per match: {:.2}", record.avg_goals());
    if full {
        let value = club
            .total_market_value
            .map(|v| format!("{v}"))
            .unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(out, "Total market value (M€): {value}");
        let _ = writeln!(out, "Squad size: {}", club.squad_size);
    }
    let _ = writeln!(out);
}

fn write_head_to_head(out: &mut String, a: &str, b: &str, h2h: &HeadToHead, with_draws: bool) {
    let _ = writeln!(out, "Meetings: {}", h2h.matches);
    let _ = writeln!(out, "Wins {a}: {}", h2h.wins_a);
    let _ = writeln!(out, "Wins {b}: {}", h2h.wins_b);
    if with_draws {
        let _ = writeln!(out, "Draws: {}", h2h.draws);
    }
    let _ = writeln!(out, "Goals {a}: {}", h2h.goals_a);
    let _ = writeln!(out, "Goals {b}: {}", h2h.goals_b);
    let _ = writeln!(out, "Average goals per match {a}: {:.2}", h2h.avg_goals_a());
    let _ = writeln!(out, "Average goals per match {b}: {:.2}", h2h.avg_goals_b());
    let _ = writeln!(out, "{a} wins (Laplace): {:.2}", h2h.proba_a);
    let _ = writeln!(out, "{b} wins (Laplace): {:.2}", h2h.proba_b);
    if with_draws {
        let _ = writeln!(out, "Draw (Laplace): {:.2}", h2h.proba_draw);
    }
}
