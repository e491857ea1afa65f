use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::density::{CurveKind, DensityPlot};
use crate::error::{CompareError, Result};
use crate::head_to_head::HeadToHead;
use crate::report::{ClubProfile, Comparison};
use crate::stats::ClubRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub club_rows: usize,
    pub head_to_head_rows: usize,
    pub density_rows: usize,
}

pub fn export_comparison(
    path: &Path,
    comparison: &Comparison,
    plot: Option<&DensityPlot>,
) -> Result<ExportReport> {
    let mut club_rows = vec![vec![
        "Club ID".to_string(),
        "Club".to_string(),
        "Window".to_string(),
        "Players".to_string(),
        "Market Value".to_string(),
        "Squad Size".to_string(),
        "Played".to_string(),
        "Won".to_string(),
        "Win %".to_string(),
        "Goals".to_string(),
        "Avg Goals".to_string(),
    ]];
    for club in [&comparison.club_a, &comparison.club_b] {
        club_rows.push(club_row(club, "all", &club.overall));
        club_rows.push(club_row(club, "recent", &club.recent));
    }

    let mut h2h_rows = vec![vec![
        "Window".to_string(),
        "Meetings".to_string(),
        format!("Wins {}", comparison.club_a.name),
        format!("Wins {}", comparison.club_b.name),
        "Draws".to_string(),
        format!("Goals {}", comparison.club_a.name),
        format!("Goals {}", comparison.club_b.name),
        format!("P({} wins)", comparison.club_a.name),
        format!("P({} wins)", comparison.club_b.name),
        "P(draw)".to_string(),
    ]];
    h2h_rows.push(head_to_head_row("all", &comparison.overall));
    h2h_rows.push(head_to_head_row(
        &format!("since {}", comparison.cutoff.format("%Y-%m-%d")),
        &comparison.recent,
    ));

    let mut density_rows = vec![vec![
        "x".to_string(),
        format!("Win rate {}", comparison.club_a.name),
        format!("Win rate {}", comparison.club_b.name),
        "Draw".to_string(),
    ]];
    if let Some(plot) = plot {
        density_rows.extend(density_table(plot));
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Clubs").map_err(xlsx_err)?;
        write_rows(sheet, &club_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("HeadToHead").map_err(xlsx_err)?;
        write_rows(sheet, &h2h_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Density").map_err(xlsx_err)?;
        write_rows(sheet, &density_rows)?;
    }

    workbook.save(path).map_err(|err| {
        CompareError::Export(format!("failed writing workbook to {}: {err}", path.display()))
    })?;

    Ok(ExportReport {
        club_rows: club_rows.len().saturating_sub(1),
        head_to_head_rows: h2h_rows.len().saturating_sub(1),
        density_rows: density_rows.len().saturating_sub(1),
    })
}

fn club_row(club: &ClubProfile, window: &str, record: &ClubRecord) -> Vec<String> {
    vec![
        club.id.to_string(),
        club.name.clone(),
        window.to_string(),
        club.players.to_string(),
        opt_to_string(club.total_market_value),
        club.squad_size.to_string(),
        record.played.to_string(),
        record.wins.to_string(),
        format!("{:.2}", record.win_pct()),
        record.goals.to_string(),
        format!("{:.2}", record.avg_goals()),
    ]
}

fn head_to_head_row(window: &str, h2h: &HeadToHead) -> Vec<String> {
    vec![
        window.to_string(),
        h2h.matches.to_string(),
        h2h.wins_a.to_string(),
        h2h.wins_b.to_string(),
        h2h.draws.to_string(),
        h2h.goals_a.to_string(),
        h2h.goals_b.to_string(),
        format!("{:.4}", h2h.proba_a),
        format!("{:.4}", h2h.proba_b),
        format!("{:.4}", h2h.proba_draw),
    ]
}

fn density_table(plot: &DensityPlot) -> Vec<Vec<String>> {
    let (Some(a), Some(b), Some(draw)) = (
        plot.curve(CurveKind::WinA),
        plot.curve(CurveKind::WinB),
        plot.curve(CurveKind::Draw),
    ) else {
        return Vec::new();
    };
    a.points
        .iter()
        .zip(&b.points)
        .zip(&draw.points)
        .map(|((&(x, ya), &(_, yb)), &(_, yd))| {
            vec![
                format!("{x:.4}"),
                format!("{ya:.6}"),
                format!("{yb:.6}"),
                format!("{yd:.6}"),
            ]
        })
        .collect()
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn xlsx_err(err: XlsxError) -> CompareError {
    CompareError::Export(err.to_string())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .map_err(|err| {
                    CompareError::Export(format!("write cell ({row_idx},{col_idx}): {err}"))
                })?;
        }
    }
    Ok(())
}
