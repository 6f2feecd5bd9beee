use std::path::Path;

use reqwest::Url;

use crate::{Error, Result, config::Config, info, rules, success, warning};

use super::{platform_from_flags, read_manifest};

/// Generates qBittorrent rule files from a manifest.
///
/// Without `--linux`/`--windows` one file per platform is written next to
/// the input (`<stem>_linux.json`, `<stem>_windows.json`); with one of them a
/// single `<stem>.json`. `download_dir` replaces the configured platform
/// directory and `rss_url` the configured feed.
///
/// # Errors
///
/// Fails on an unreadable manifest, a malformed manifest line, an invalid
/// feed URL, or an output path that would overwrite the manifest itself.
pub async fn generate(
    config: &Config,
    input: &Path,
    linux: bool,
    windows: bool,
    download_dir: Option<String>,
    rss_url: Option<String>,
) -> Result<()> {
    let feed_url = match rss_url {
        Some(url) => {
            Url::parse(&url).map_err(|e| Error::Config(format!("invalid rss url {url}: {e}")))?;
            url
        }
        None => config.rules.feed_url.clone(),
    };

    info!("Reading from file: {}", input.display());
    let entries = read_manifest(input).await?;
    if entries.is_empty() {
        warning!("{} contains no entries", input.display());
    }

    let plans = rules::plan_outputs(
        input,
        platform_from_flags(linux, windows),
        download_dir.as_deref(),
        &config.rules,
    );

    for plan in plans {
        if plan.path == input {
            return Err(Error::Config(format!(
                "refusing to overwrite the manifest {}; rename it to a non-.json extension",
                input.display()
            )));
        }

        let json = rules::render(&entries, &plan.download_dir, plan.platform, &feed_url)?;
        async_fs::write(&plan.path, json)
            .await
            .map_err(|e| Error::io(&plan.path, e))?;
        success!("Successfully Generated: {}", plan.path.display());
    }

    Ok(())
}
