use crate::{Error, Result, types::ManifestEntry};

/// Parses manifest text into entries.
///
/// Lines may end in `\n` or `\r\n`. Blank lines are skipped, every field is
/// trimmed and an empty field counts as not given.
///
/// # Errors
///
/// Returns [`Error::Manifest`] with the 1-based line number when a line has
/// no search term.
pub fn parse_manifest(contents: &str) -> Result<Vec<ManifestEntry>> {
    let mut entries = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.splitn(3, '|').map(str::trim);
        let search_term = parts.next().unwrap_or_default();
        if search_term.is_empty() {
            return Err(Error::Manifest {
                line: idx + 1,
                reason: "missing search term".to_string(),
            });
        }

        let mut optional = || {
            parts
                .next()
                .filter(|p| !p.is_empty())
                .map(str::to_string)
        };
        let title = optional();
        let save_path = optional();

        entries.push(ManifestEntry {
            search_term: search_term.to_string(),
            title,
            save_path,
        });
    }

    Ok(entries)
}

/// Formats titles as a manifest with one search term per line.
///
/// A `|` inside a title would start a new field, so it is replaced by a
/// space. Titles that end up blank are left out.
pub fn format_manifest(titles: &[String]) -> String {
    titles
        .iter()
        .map(|t| t.replace('|', " ").trim().to_string())
        .filter(|t| !t.is_empty())
        .map(|t| t + "\n")
        .collect()
}
