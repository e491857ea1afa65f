use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;

use crate::dataset::DEFAULT_RECENT_DAYS;

pub const DATA_DIR_ENV: &str = "CLUB_COMPARE_DATA_DIR";
pub const RECENT_DAYS_ENV: &str = "CLUB_COMPARE_RECENT_DAYS";
pub const EXPORT_PATH_ENV: &str = "CLUB_COMPARE_EXPORT_PATH";
pub const LOG_PATH_ENV: &str = "CLUB_COMPARE_LOG_PATH";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_EXPORT_PATH: &str = "club_comparison.xlsx";
const DEFAULT_LOG_PATH: &str = "club_compare.log";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub recent_days: u32,
    pub export_path: PathBuf,
    pub log_path: PathBuf,
    pub today: Option<NaiveDate>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            recent_days: DEFAULT_RECENT_DAYS,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            today: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(days) = lookup(RECENT_DAYS_ENV).and_then(|v| v.trim().parse::<u32>().ok()) {
            cfg.recent_days = days.max(1);
        }
        if let Some(path) = lookup(EXPORT_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.export_path = PathBuf::from(path.trim());
        }
        if let Some(path) = lookup(LOG_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.log_path = PathBuf::from(path.trim());
        }
        cfg
    }

    /// Applies `--data`, `--recent-days`, `--export`, `--log` and `--today` overrides.
    ///
    /// Both `--flag value` and `--flag=value` are accepted. Arguments that are
    /// not recognised are returned untouched for the caller.
    pub fn apply_args(&mut self, args: &[String]) -> Result<Vec<String>> {
        let mut rest = Vec::new();
        let mut idx = 0;
        while idx < args.len() {
            let arg = &args[idx];
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
                _ => (arg.as_str(), None),
            };
            if !matches!(
                flag,
                "--data" | "--recent-days" | "--export" | "--log" | "--today"
            ) {
                rest.push(arg.clone());
                idx += 1;
                continue;
            }
            let value = match inline {
                Some(value) => value,
                None => {
                    idx += 1;
                    args.get(idx)
                        .cloned()
                        .ok_or_else(|| anyhow!("{flag} expects a value"))?
                }
            };
            let value = value.trim();
            match flag {
                "--data" => self.data_dir = PathBuf::from(value),
                "--recent-days" => {
                    let days = value
                        .parse::<u32>()
                        .with_context(|| format!("invalid --recent-days '{value}'"))?;
                    self.recent_days = days.max(1);
                }
                "--export" => self.export_path = PathBuf::from(value),
                "--log" => self.log_path = PathBuf::from(value),
                _ => {
                    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                        .with_context(|| format!("invalid --today '{value}', expected YYYY-MM-DD"))?;
                    self.today = Some(date);
                }
            }
            idx += 1;
        }
        Ok(rest)
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
