use std::collections::HashMap;

use crate::dataset::Club;
use crate::error::{CompareError, Result};

#[derive(Debug, Clone)]
struct IndexEntry {
    name: String,
    id: u32,
    acronym: String,
}

/// Name lookup and search over the loaded clubs.
///
/// Entries keep dataset order so filtered lists match what the user saw before
/// typing. When a name appears twice the first row wins.
#[derive(Debug, Clone, Default)]
pub struct ClubIndex {
    entries: Vec<IndexEntry>,
    by_name: HashMap<String, usize>,
}

impl ClubIndex {
    pub fn new(clubs: &[Club]) -> Self {
        let mut index = Self::default();
        for club in clubs {
            if index.by_name.contains_key(&club.name) {
                tracing::warn!(club_id = club.id, "duplicate club name '{}' ignored", club.name);
                continue;
            }
            index.by_name.insert(club.name.clone(), index.entries.len());
            index.entries.push(IndexEntry {
                name: club.name.clone(),
                id: club.id,
                acronym: acronym(&club.name),
            });
        }
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn resolve(&self, name: &str) -> Result<u32> {
        self.by_name
            .get(name)
            .map(|&idx| self.entries[idx].id)
            .ok_or_else(|| CompareError::NotFound(name.to_string()))
    }

    pub fn acronym_of(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&idx| self.entries[idx].acronym.as_str())
    }

    /// Filters the whole index, in dataset order.
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| matches_query(&e.name, &e.acronym, &needle))
            .map(|e| e.name.clone())
            .collect()
    }
}

pub fn acronym(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn filter<S: AsRef<str>>(query: &str, candidates: &[S]) -> Vec<String> {
    let needle = query.to_lowercase();
    candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| matches_query(name, &acronym(name), &needle))
        .map(str::to_string)
        .collect()
}

fn matches_query(name: &str, acronym: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle) || acronym.to_lowercase().contains(needle)
}
