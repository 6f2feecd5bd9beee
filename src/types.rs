use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// OAuth token as returned by the token endpoint and stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token_type: String,
    pub expires_in: u64,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeasonName {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl SeasonName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonName::Winter => "winter",
            SeasonName::Spring => "spring",
            SeasonName::Summer => "summer",
            SeasonName::Fall => "fall",
        }
    }

    pub fn next(&self) -> SeasonName {
        match self {
            SeasonName::Winter => SeasonName::Spring,
            SeasonName::Spring => SeasonName::Summer,
            SeasonName::Summer => SeasonName::Fall,
            SeasonName::Fall => SeasonName::Winter,
        }
    }
}

/// An anime broadcast season such as "spring 2025".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Season {
    pub name: SeasonName,
    pub year: i32,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => write!(f, "{}{} {}", first.to_ascii_uppercase(), chars.as_str(), self.year),
            None => write!(f, "{}", self.year),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Node<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimeListResponse {
    pub data: Vec<Node<ListEntry>>,
    pub paging: Paging,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListEntry {
    pub title: String,
    pub start_season: Option<StartSeason>,
}

/// Season as reported by the list API. The name is kept as a string so an
/// unexpected value filters the entry out instead of failing the page.
#[derive(Debug, Clone, Deserialize)]
pub struct StartSeason {
    pub year: i32,
    pub season: String,
}

impl ListEntry {
    pub fn aired_in(&self, season: &Season) -> bool {
        self.start_season
            .as_ref()
            .is_some_and(|s| s.year == season.year && s.season == season.name.as_str())
    }
}

/// One line of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub search_term: String,
    pub title: Option<String>,
    pub save_path: Option<String>,
}

#[derive(Tabled)]
pub struct RuleTableRow {
    pub title: String,
    pub search_term: String,
    pub save_path: String,
}
