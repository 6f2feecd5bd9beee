//! Configuration management for the rule generator.
//!
//! Every setting has a built-in default matching the public MyAnimeList
//! endpoints and the registered client id. Defaults can be overridden through
//! environment variables, which in turn may come from a `.env` file in the
//! per-user configuration directory:
//!
//! 1. Environment variables (highest priority)
//! 2. `.env` file in `<config-dir>/rss_download_rules/`
//! 3. Application defaults
//!
//! The resolved values are collected once into an immutable [`Config`] that is
//! passed down by reference; nothing below `main` reads the environment.

use std::{env, path::PathBuf};

use reqwest::Url;

use crate::{Error, Result};

/// Directory name used below the platform configuration directory.
pub const PROGRAM_NAME: &str = "rss_download_rules";

pub const TOKEN_PATH_ENV: &str = "RSS_DOWNLOAD_RULES_TOKEN_PATH";
pub const CLIENT_ID_ENV: &str = "RSS_DOWNLOAD_RULES_CLIENT_ID";
pub const API_URL_ENV: &str = "RSS_DOWNLOAD_RULES_API_URL";
pub const OAUTH_URL_ENV: &str = "RSS_DOWNLOAD_RULES_OAUTH_URL";
pub const FEED_URL_ENV: &str = "RSS_DOWNLOAD_RULES_FEED_URL";
pub const LINUX_DIR_ENV: &str = "RSS_DOWNLOAD_RULES_LINUX_DIR";
pub const WINDOWS_DIR_ENV: &str = "RSS_DOWNLOAD_RULES_WINDOWS_DIR";

pub const DEFAULT_API_URL: &str = "https://api.myanimelist.net/v2";
pub const DEFAULT_OAUTH_URL: &str = "https://myanimelist.net/v1/oauth2";
pub const DEFAULT_CLIENT_ID: &str = "f0329e8fef42bf30a44e42dd24e25675";
pub const DEFAULT_STATE: &str = "RequestID2235";
pub const DEFAULT_FEED_URL: &str = "https://subsplease.org/rss/?r=1080";
pub const DEFAULT_WINDOWS_DIR: &str = r"D:\Libraries\Videos\Anime";

/// Settings for talking to MyAnimeList.
#[derive(Debug, Clone)]
pub struct MalConfig {
    /// Base of the list API, e.g. `https://api.myanimelist.net/v2`.
    pub api_url: String,
    /// Base of the OAuth endpoints; `/authorize` and `/token` are appended.
    pub oauth_url: String,
    pub client_id: String,
    /// Fixed `state` value sent with the authorization request.
    pub state: String,
}

/// Settings for rendering rule files.
#[derive(Debug, Clone)]
pub struct RulesConfig {
    pub feed_url: String,
    pub linux_download_dir: String,
    pub windows_download_dir: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mal: MalConfig,
    pub rules: RulesConfig,
    pub token_path: PathBuf,
}

impl Config {
    /// Builds the configuration from the process environment and defaults.
    ///
    /// Call [`load_env`] first if a `.env` file should be honoured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if one of the URL settings does not parse or
    /// there is no user config directory to keep the token in.
    pub fn from_env() -> Result<Self> {
        let config = Config {
            mal: MalConfig {
                api_url: env_or(API_URL_ENV, DEFAULT_API_URL),
                oauth_url: env_or(OAUTH_URL_ENV, DEFAULT_OAUTH_URL),
                client_id: env_or(CLIENT_ID_ENV, DEFAULT_CLIENT_ID),
                state: DEFAULT_STATE.to_string(),
            },
            rules: RulesConfig {
                feed_url: env_or(FEED_URL_ENV, DEFAULT_FEED_URL),
                linux_download_dir: env::var(LINUX_DIR_ENV)
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(default_linux_dir),
                windows_download_dir: env_or(WINDOWS_DIR_ENV, DEFAULT_WINDOWS_DIR),
            },
            token_path: token_path()?,
        };

        for (name, value) in [
            (API_URL_ENV, &config.mal.api_url),
            (OAUTH_URL_ENV, &config.mal.oauth_url),
            (FEED_URL_ENV, &config.rules.feed_url),
        ] {
            Url::parse(value).map_err(|e| Error::Config(format!("{name}={value}: {e}")))?;
        }

        Ok(config)
    }
}

/// Loads environment variables from a `.env` file in the user config directory.
///
/// The file is optional. Variables already present in the process environment
/// are not overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.config/rss_download_rules/.env`
/// - macOS: `~/Library/Application Support/rss_download_rules/.env`
/// - Windows: `%APPDATA%/rss_download_rules/.env`
///
/// # Errors
///
/// Returns [`Error::Config`] if the file exists but cannot be parsed.
pub async fn load_env() -> Result<()> {
    let Ok(dir) = config_dir() else {
        return Ok(());
    };
    let path = dir.join(".env");
    if async_fs::metadata(&path).await.is_err() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| Error::Config(format!("cannot load {}: {}", path.display(), e)))
}

/// Resolves where the OAuth token is stored.
///
/// `RSS_DOWNLOAD_RULES_TOKEN_PATH` wins when set and non-empty, otherwise
/// `<config-dir>/rss_download_rules/token.json`.
///
/// # Errors
///
/// Returns [`Error::Config`] if no override is set and the platform has no
/// user config directory.
pub fn token_path() -> Result<PathBuf> {
    match env::var(TOKEN_PATH_ENV) {
        Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(config_dir()?.join("token.json")),
    }
}

fn config_dir() -> Result<PathBuf> {
    config_dir_from(dirs::config_dir())
}

/// Appends the program directory to a platform config directory.
pub fn config_dir_from(base: Option<PathBuf>) -> Result<PathBuf> {
    let mut path = base.ok_or_else(|| Error::Config("no user config directory".to_string()))?;
    path.push(PROGRAM_NAME);
    Ok(path)
}

fn default_linux_dir() -> String {
    let user = env::var("USER").unwrap_or_else(|_| "user".to_string());
    format!("/home/{user}/Videos/Anime")
}

fn env_or(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}
