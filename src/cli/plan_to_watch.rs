use std::path::{Path, PathBuf};

use crate::{
    Error, Result,
    clock::SystemClock,
    config::Config,
    mal::{AnimeListClient, StdinCodeProvider},
    rules, success, utils, warning,
};

use super::token_manager;

/// Builds a manifest from the MyAnimeList plan to watch list.
///
/// Authorizes on first use and refreshes an expired token before fetching.
/// The list is filtered to the next season unless `current_season` is set.
/// Titles are written one per line to `output`, replacing its contents, or
/// printed to stdout.
pub async fn plan_to_watch(
    config: &Config,
    current_season: bool,
    output: Option<PathBuf>,
    open_browser: bool,
) -> Result<()> {
    let mut provider = StdinCodeProvider { open_browser };
    let access_token = token_manager(config).get_valid_token(&mut provider).await?;

    let season = utils::season_from_clock(&SystemClock, current_season);

    let titles = AnimeListClient::new(&config.mal)
        .fetch_plan_to_watch(&access_token, &season)
        .await?;
    if titles.is_empty() {
        warning!("No plan to watch entries start in {}", season);
    }

    write_manifest(&titles, output.as_deref()).await
}

/// Writes `titles` as a manifest to `output`, or to stdout when there is none.
pub async fn write_manifest(titles: &[String], output: Option<&Path>) -> Result<()> {
    let manifest = rules::format_manifest(titles);
    match output {
        Some(path) => {
            async_fs::write(path, manifest)
                .await
                .map_err(|e| Error::io(path, e))?;
            success!("Wrote {} titles to {}", titles.len(), path.display());
        }
        None => print!("{manifest}"),
    }

    Ok(())
}
