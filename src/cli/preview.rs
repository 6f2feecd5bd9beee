use std::path::Path;

use tabled::Table;

use crate::{
    Result,
    config::Config,
    rules::{self, Platform},
    types::RuleTableRow,
};

use super::{platform_from_flags, read_manifest};

/// Prints the resolved manifest entries as a table without writing any rule
/// file. Shows the Linux paths unless `--windows` is given.
pub async fn preview(
    config: &Config,
    input: &Path,
    linux: bool,
    windows: bool,
    download_dir: Option<String>,
) -> Result<()> {
    let entries = read_manifest(input).await?;
    let platform = platform_from_flags(linux, windows).unwrap_or(Platform::Linux);
    let download_dir = download_dir
        .as_deref()
        .unwrap_or_else(|| platform.default_download_dir(&config.rules));

    let rows: Vec<RuleTableRow> = rules::resolve(&entries, download_dir, platform)
        .into_iter()
        .map(|e| RuleTableRow {
            title: e.title,
            search_term: e.search_term,
            save_path: e.save_path,
        })
        .collect();

    println!("Feed: {}\n{}", config.rules.feed_url, Table::new(rows));
    Ok(())
}
