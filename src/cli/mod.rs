//! # CLI Module
//!
//! This module provides the command-line interface layer. Each public
//! function backs one subcommand of the `rss-download-rules` binary and
//! returns a [`Result`](crate::Result) to the single top-level handler in
//! `main`, which prints the error and maps it to an exit code.
//!
//! ## Command Categories
//!
//! ### Rule Generation
//!
//! - [`generate`] - Renders one or two qBittorrent rule files from a manifest
//! - [`preview`] - Shows how the manifest resolves without writing anything
//!
//! ### MyAnimeList
//!
//! - [`auth`] - Runs the OAuth 2.0 PKCE authorization and stores the token
//! - [`plan_to_watch`] - Writes a manifest from the plan to watch list
//!
//! ## Data Flow
//!
//! ```text
//! plan-to-watch:  TokenManager → AnimeListClient → manifest file
//! generate:       manifest file → rules::parse_manifest → rules::render → *.json
//! ```
//!
//! ## Usage Patterns
//!
//! ```bash
//! rss-download-rules auth                                   # authorize once
//! rss-download-rules plan-to-watch --output anime.txt       # next season
//! rss-download-rules plan-to-watch --current-season         # print to stdout
//! rss-download-rules generate anime.txt                     # anime_linux.json + anime_windows.json
//! rss-download-rules generate anime.txt --linux -d /srv/anime
//! ```

mod auth;
mod generate;
mod plan_to_watch;
mod preview;

pub use auth::auth;
pub use generate::generate;
pub use plan_to_watch::{plan_to_watch, write_manifest};
pub use preview::preview;

use std::path::Path;

use crate::{
    Error, Result,
    clock::SystemClock,
    config::Config,
    mal::OAuthClient,
    management::{TokenManager, TokenStore},
    rules::{self, Platform},
    types::ManifestEntry,
};

fn token_manager(config: &Config) -> TokenManager {
    TokenManager::new(
        TokenStore::new(&config.token_path),
        OAuthClient::new(&config.mal),
        Box::new(SystemClock),
    )
}

async fn read_manifest(input: &Path) -> Result<Vec<ManifestEntry>> {
    let contents = async_fs::read_to_string(input)
        .await
        .map_err(|e| Error::io(input, e))?;
    rules::parse_manifest(&contents)
}

/// Picks the platform from the mutually exclusive `--linux`/`--windows` flags.
fn platform_from_flags(linux: bool, windows: bool) -> Option<Platform> {
    match (linux, windows) {
        (true, false) => Some(Platform::Linux),
        (false, true) => Some(Platform::Windows),
        _ => None,
    }
}
