use std::path::{Path, PathBuf};

use serde::{
    Serialize, Serializer,
    ser::SerializeMap,
};

use crate::{Result, config::RulesConfig, types::ManifestEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
}

impl Platform {
    pub fn separator(&self) -> char {
        match self {
            Platform::Linux => '/',
            Platform::Windows => '\\',
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
        }
    }

    pub fn default_download_dir<'a>(&self, config: &'a RulesConfig) -> &'a str {
        match self {
            Platform::Linux => &config.linux_download_dir,
            Platform::Windows => &config.windows_download_dir,
        }
    }
}

/// A manifest entry with its defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub title: String,
    pub search_term: String,
    pub save_path: String,
}

/// One qBittorrent RSS download rule. Field order matches what qBittorrent
/// exports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub add_paused: Option<bool>,
    pub affected_feeds: Vec<String>,
    pub assigned_category: String,
    pub enabled: bool,
    pub episode_filter: String,
    pub ignore_days: u32,
    pub last_match: String,
    pub must_contain: String,
    pub must_not_contain: String,
    pub previously_matched_episodes: Vec<String>,
    pub save_path: String,
    pub smart_filter: bool,
    pub torrent_content_layout: Option<String>,
    pub use_regex: bool,
}

impl Rule {
    pub fn new(must_contain: &str, save_path: &str, feed_url: &str) -> Self {
        Rule {
            add_paused: None,
            affected_feeds: vec![feed_url.to_string()],
            assigned_category: String::new(),
            enabled: true,
            episode_filter: String::new(),
            ignore_days: 0,
            last_match: String::new(),
            must_contain: must_contain.to_string(),
            must_not_contain: String::new(),
            previously_matched_episodes: Vec::new(),
            save_path: save_path.to_string(),
            smart_filter: true,
            torrent_content_layout: None,
            use_regex: false,
        }
    }
}

/// Rules keyed by title, serialized as a JSON object in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(String, Rule)>,
}

impl RuleSet {
    /// Adds a rule. A rule with the same title is replaced in place, so the
    /// later definition wins while the key keeps its first position.
    pub fn insert(&mut self, title: String, rule: Rule) {
        match self.rules.iter().position(|(t, _)| *t == title) {
            Some(idx) => self.rules[idx].1 = rule,
            None => self.rules.push((title, rule)),
        }
    }
}

impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for (title, rule) in &self.rules {
            map.serialize_entry(title, rule)?;
        }
        map.end()
    }
}

/// Fills in the title and save path defaults.
pub fn resolve(entries: &[ManifestEntry], download_dir: &str, platform: Platform) -> Vec<ResolvedEntry> {
    let sep = platform.separator();
    let base = download_dir.trim_end_matches(['/', '\\']);

    entries
        .iter()
        .map(|entry| {
            let title = entry
                .title
                .clone()
                .unwrap_or_else(|| entry.search_term.clone());
            let save_path = entry
                .save_path
                .clone()
                .unwrap_or_else(|| format!("{base}{sep}{title}"));

            ResolvedEntry {
                title,
                search_term: entry.search_term.clone(),
                save_path,
            }
        })
        .collect()
}

/// Renders the rule file for one platform as pretty printed JSON with a
/// trailing newline.
pub fn render(
    entries: &[ManifestEntry],
    download_dir: &str,
    platform: Platform,
    feed_url: &str,
) -> Result<String> {
    let mut rules = RuleSet::default();
    for entry in resolve(entries, download_dir, platform) {
        let rule = Rule::new(&entry.search_term, &entry.save_path, feed_url);
        rules.insert(entry.title, rule);
    }

    let mut json = serde_json::to_string_pretty(&rules)?;
    json.push('\n');
    Ok(json)
}

/// A rule file to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    pub path: PathBuf,
    pub platform: Platform,
    pub download_dir: String,
}

/// Decides which rule files to write for `input`.
///
/// Without a platform both a `<stem>_linux.json` and a `<stem>_windows.json`
/// are written next to the input. With one, a single `<stem>.json`. An
/// explicit `download_dir` replaces the platform default in every file.
pub fn plan_outputs(
    input: &Path,
    platform: Option<Platform>,
    download_dir: Option<&str>,
    config: &RulesConfig,
) -> Vec<OutputPlan> {
    let stem = input.with_extension("");
    let output = |suffix: &str, platform: Platform| {
        let mut name = stem.clone().into_os_string();
        name.push(suffix);
        OutputPlan {
            path: PathBuf::from(name),
            platform,
            download_dir: download_dir
                .unwrap_or_else(|| platform.default_download_dir(config))
                .to_string(),
        }
    };

    match platform {
        Some(p) => vec![output(".json", p)],
        None => [Platform::Linux, Platform::Windows]
            .into_iter()
            .map(|p| output(&format!("_{}.json", p.suffix()), p))
            .collect(),
    }
}
