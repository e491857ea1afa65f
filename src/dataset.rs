use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};

pub const CLUBS_FILE: &str = "clubs.csv";
pub const GAMES_FILE: &str = "games.csv";
pub const PLAYERS_FILE: &str = "players.csv";

const CLUB_COLUMNS: &[&str] = &["club_id", "name", "total_market_value", "squad_size"];
const GAME_COLUMNS: &[&str] = &[
    "date",
    "home_club_id",
    "away_club_id",
    "home_club_goals",
    "away_club_goals",
];
const PLAYER_COLUMNS: &[&str] = &["current_club_id"];

// Roughly five years, counted the same way every year.
pub const DEFAULT_RECENT_DAYS: u32 = 5 * 365;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Club {
    pub id: u32,
    pub name: String,
    pub total_market_value: Option<f64>,
    pub squad_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub id: u64,
    pub date: NaiveDate,
    pub home_id: u32,
    pub away_id: u32,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl Match {
    pub fn outcome(&self) -> Outcome {
        if self.home_goals > self.away_goals {
            Outcome::HomeWin
        } else if self.home_goals < self.away_goals {
            Outcome::AwayWin
        } else {
            Outcome::Draw
        }
    }

    pub fn involves(&self, club_id: u32) -> bool {
        self.home_id == club_id || self.away_id == club_id
    }

    pub fn is_between(&self, a: u32, b: u32) -> bool {
        (self.home_id == a && self.away_id == b) || (self.home_id == b && self.away_id == a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: Option<u64>,
    pub current_club_id: u32,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub clubs: Vec<Club>,
    pub matches: Vec<Match>,
    pub players: Vec<Player>,
    pub recent: Vec<Match>,
    pub today: NaiveDate,
    pub recent_days: u32,
    pub cutoff: NaiveDate,
    pub skipped_matches: usize,
}

impl Dataset {
    pub fn load_dir(dir: &Path, today: NaiveDate, recent_days: u32) -> Result<Self> {
        let clubs = open_data_file(dir, CLUBS_FILE)?;
        let games = open_data_file(dir, GAMES_FILE)?;
        let players = open_data_file(dir, PLAYERS_FILE)?;
        let dataset = Self::from_readers(clubs, games, players, today, recent_days)?;

        tracing::info!(dir = %dir.display(), "dataset loaded");
        tracing::info!("today: {}", today.format("%Y-%m-%d"));
        tracing::info!(
            "cutoff ({recent_days} days back): {}",
            dataset.cutoff.format("%Y-%m-%d")
        );
        tracing::info!("matches total: {}", dataset.matches.len());
        tracing::info!("matches in recent window: {}", dataset.recent.len());
        Ok(dataset)
    }

    pub fn from_readers<C: Read, G: Read, P: Read>(
        clubs: C,
        games: G,
        players: P,
        today: NaiveDate,
        recent_days: u32,
    ) -> Result<Self> {
        let clubs = parse_clubs(clubs)?;
        let (matches, skipped_matches) = parse_games(games)?;
        let players = parse_players(players)?;
        if skipped_matches > 0 {
            tracing::warn!("skipped {skipped_matches} game rows with blank club ids or goals");
        }

        let cutoff = recent_cutoff(today, recent_days);
        let recent = recent_window(&matches, cutoff);
        Ok(Self {
            clubs,
            matches,
            players,
            recent,
            today,
            recent_days,
            cutoff,
            skipped_matches,
        })
    }

    pub fn club(&self, id: u32) -> Option<&Club> {
        self.clubs.iter().find(|c| c.id == id)
    }

    pub fn player_count(&self, club_id: u32) -> usize {
        self.players
            .iter()
            .filter(|p| p.current_club_id == club_id)
            .count()
    }
}

pub fn recent_cutoff(today: NaiveDate, recent_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(recent_days)))
        .unwrap_or(NaiveDate::MIN)
}

// The cutoff day itself is excluded: the window opens at load time minus the
// window length, which is always past midnight of that day.
pub fn recent_window(matches: &[Match], cutoff: NaiveDate) -> Vec<Match> {
    matches
        .iter()
        .filter(|m| m.date > cutoff)
        .cloned()
        .collect()
}

pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

fn open_data_file(dir: &Path, name: &str) -> Result<File> {
    let path = dir.join(name);
    File::open(&path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => CompareError::MissingFile(path.clone()),
        _ => CompareError::data_format(name, format!("open {}: {err}", path.display())),
    })
}

#[derive(Debug, Deserialize)]
struct ClubRow {
    club_id: String,
    name: String,
    #[serde(default)]
    total_market_value: Option<String>,
    #[serde(default)]
    squad_size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GameRow {
    #[serde(default)]
    game_id: Option<String>,
    date: String,
    home_club_id: Option<String>,
    away_club_id: Option<String>,
    home_club_goals: Option<String>,
    away_club_goals: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlayerRow {
    #[serde(default)]
    player_id: Option<String>,
    current_club_id: Option<String>,
}

fn read_rows<T: DeserializeOwned, R: Read>(
    file: &str,
    required: &[&str],
    reader: R,
) -> Result<Vec<(usize, T)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|err| CompareError::data_format(file, format!("header: {err}")))?
        .clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(CompareError::data_format(
                file,
                format!("missing column '{column}'"),
            ));
        }
    }
    let mut out = Vec::new();
    for (idx, row) in rdr.deserialize::<T>().enumerate() {
        // Line 1 is the header.
        let line = idx + 2;
        let row = row.map_err(|err| CompareError::data_format(file, format!("line {line}: {err}")))?;
        out.push((line, row));
    }
    Ok(out)
}

fn parse_clubs<R: Read>(reader: R) -> Result<Vec<Club>> {
    let rows = read_rows::<ClubRow, _>(CLUBS_FILE, CLUB_COLUMNS, reader)?;
    let mut out = Vec::with_capacity(rows.len());
    for (line, row) in rows {
        let id = parse_id(&row.club_id)
            .ok_or_else(|| bad_value(CLUBS_FILE, line, "club_id", &row.club_id))?;
        if row.name.is_empty() {
            return Err(CompareError::data_format(
                CLUBS_FILE,
                format!("line {line}: empty club name"),
            ));
        }
        let total_market_value = match non_blank(row.total_market_value.as_deref()) {
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| bad_value(CLUBS_FILE, line, "total_market_value", raw))
                .map(|v| Some(v).filter(|v| v.is_finite()))?,
            None => None,
        };
        let squad_size = match non_blank(row.squad_size.as_deref()) {
            Some(raw) => {
                parse_count(raw).ok_or_else(|| bad_value(CLUBS_FILE, line, "squad_size", raw))?
            }
            None => 0,
        };
        out.push(Club {
            id,
            name: row.name,
            total_market_value,
            squad_size,
        });
    }
    Ok(out)
}

fn parse_games<R: Read>(reader: R) -> Result<(Vec<Match>, usize)> {
    let rows = read_rows::<GameRow, _>(GAMES_FILE, GAME_COLUMNS, reader)?;
    let mut out = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for (line, row) in rows {
        let date = parse_match_date(&row.date)
            .ok_or_else(|| bad_value(GAMES_FILE, line, "date", &row.date))?;

        let (Some(home), Some(away), Some(hg), Some(ag)) = (
            non_blank(row.home_club_id.as_deref()),
            non_blank(row.away_club_id.as_deref()),
            non_blank(row.home_club_goals.as_deref()),
            non_blank(row.away_club_goals.as_deref()),
        ) else {
            skipped += 1;
            continue;
        };

        let id = match non_blank(row.game_id.as_deref()) {
            Some(raw) => parse_u64(raw).ok_or_else(|| bad_value(GAMES_FILE, line, "game_id", raw))?,
            None => out.len() as u64,
        };
        out.push(Match {
            id,
            date,
            home_id: parse_id(home).ok_or_else(|| bad_value(GAMES_FILE, line, "home_club_id", home))?,
            away_id: parse_id(away).ok_or_else(|| bad_value(GAMES_FILE, line, "away_club_id", away))?,
            home_goals: parse_count(hg)
                .ok_or_else(|| bad_value(GAMES_FILE, line, "home_club_goals", hg))?,
            away_goals: parse_count(ag)
                .ok_or_else(|| bad_value(GAMES_FILE, line, "away_club_goals", ag))?,
        });
    }
    Ok((out, skipped))
}

fn parse_players<R: Read>(reader: R) -> Result<Vec<Player>> {
    let rows = read_rows::<PlayerRow, _>(PLAYERS_FILE, PLAYER_COLUMNS, reader)?;
    let mut out = Vec::with_capacity(rows.len());
    for (line, row) in rows {
        let Some(club) = non_blank(row.current_club_id.as_deref()) else {
            continue;
        };
        let current_club_id =
            parse_id(club).ok_or_else(|| bad_value(PLAYERS_FILE, line, "current_club_id", club))?;
        let id = match non_blank(row.player_id.as_deref()) {
            Some(raw) => {
                Some(parse_u64(raw).ok_or_else(|| bad_value(PLAYERS_FILE, line, "player_id", raw))?)
            }
            None => None,
        };
        out.push(Player {
            id,
            current_club_id,
        });
    }
    Ok(out)
}

fn bad_value(file: &str, line: usize, column: &str, raw: &str) -> CompareError {
    CompareError::data_format(file, format!("line {line}: invalid {column} '{raw}'"))
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

// Exports from dataframes sometimes write integer columns as "12.0".
fn parse_u64(raw: &str) -> Option<u64> {
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    if f < 0.0 || f.fract() != 0.0 || f > u64::MAX as f64 {
        return None;
    }
    Some(f as u64)
}

fn parse_id(raw: &str) -> Option<u32> {
    parse_u64(raw).and_then(|n| u32::try_from(n).ok())
}

fn parse_count(raw: &str) -> Option<u32> {
    parse_id(raw)
}
