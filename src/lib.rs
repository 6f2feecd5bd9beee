//! qBittorrent RSS Download Rules Library
//!
//! This library turns a pipe-delimited manifest of anime titles into
//! qBittorrent RSS auto-download rule files. The manifest can be written by
//! hand or seeded from a MyAnimeList "plan to watch" list, which requires an
//! OAuth 2.0 PKCE authorization that is persisted and refreshed locally.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `clock` - Wall-clock capability used for seasons and token freshness
//! - `config` - Configuration loading from defaults, `.env` and environment
//! - `error` - Crate error type and exit code mapping
//! - `mal` - MyAnimeList OAuth and list API client
//! - `management` - Token persistence and token lifecycle
//! - `rules` - Manifest parsing and rule rendering
//! - `types` - Data structures and type definitions
//! - `utils` - Challenge generation and season computation
//!
//! # Example
//!
//! ```
//! use rss_download_rules::{config::Config, rules};
//!
//! let config = Config::from_env()?;
//! let entries = rules::parse_manifest("hunter x hunter|Hunter x Hunter")?;
//! let json = rules::render(&entries, &config.rules.linux_download_dir, rules::Platform::Linux, &config.rules.feed_url)?;
//! ```

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod mal;
pub mod management;
pub mod rules;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Prints an informational message with a blue bullet point.
///
/// Status output goes to stderr so that stdout only carries data, such as a
/// manifest printed by `plan-to-watch`.
///
/// # Example
///
/// ```
/// info!("Reading from file: {}", path.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Generated {}", output.display());
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark to stderr.
///
/// Unlike a panic this does not terminate anything on its own. The binary's
/// top-level handler prints the failure with this macro and then picks the
/// exit code from [`Error::exit_code`].
///
/// # Example
///
/// ```
/// error!("Token exchange failed: {}", e);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues the operator should notice, such as a browser
/// that could not be opened.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser. Please navigate to:\n{}", url);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
