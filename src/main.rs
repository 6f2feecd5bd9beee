use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use rss_download_rules::{Result, cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Do not try to open the authorization URL in a browser
    #[clap(long, global = true)]
    no_browser: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate qBittorrent RSS download rules from a manifest
    #[clap(long_about = MANIFEST_HELP)]
    Generate(GenerateOptions),

    /// Show how a manifest resolves without writing rule files
    Preview(PreviewOptions),

    /// Write a manifest from the MyAnimeList plan to watch list
    PlanToWatch(PlanToWatchOptions),

    /// Authorize with MyAnimeList and store the token
    Auth,

    /// Get shell completions
    Completions(CompletionsOption),
}

const MANIFEST_HELP: &str = "\
Generate qBittorrent RSS download rules from a manifest.

Every manifest line reads

    [Search Term]|[Entry Title]|[Save Path]

e.g.

    hunter x hunter|Hunter x Hunter|/home/me/Videos/Hunter x Hunter

Only the search term is required. A missing title is set to the search term
and a missing save path to <download dir>/<title>.";

#[derive(Parser, Debug, Clone)]
pub struct PlatformOptions {
    /// Generate download paths for linux only
    #[clap(short = 'l', long, conflicts_with = "windows")]
    linux: bool,

    /// Generate download paths for windows only
    #[clap(short = 'w', long)]
    windows: bool,

    /// Download directory used for entries without a save path
    #[clap(short = 'd', long)]
    download_dir: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// Manifest file to create the rules from
    input: PathBuf,

    #[clap(flatten)]
    platform: PlatformOptions,

    /// RSS feed the rules apply to
    #[clap(short = 'r', long)]
    rss_url: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewOptions {
    /// Manifest file to preview
    input: PathBuf,

    #[clap(flatten)]
    platform: PlatformOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct PlanToWatchOptions {
    /// Use the current season instead of the next one
    #[clap(long)]
    current_season: bool,

    /// Manifest file to write; printed to stdout when omitted
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    config::load_env().await?;
    let config = config::Config::from_env()?;
    let open_browser = !cli.no_browser;

    match cli.command {
        Command::Generate(opt) => {
            cli::generate(
                &config,
                &opt.input,
                opt.platform.linux,
                opt.platform.windows,
                opt.platform.download_dir,
                opt.rss_url,
            )
            .await
        }
        Command::Preview(opt) => {
            cli::preview(
                &config,
                &opt.input,
                opt.platform.linux,
                opt.platform.windows,
                opt.platform.download_dir,
            )
            .await
        }
        Command::PlanToWatch(opt) => {
            cli::plan_to_watch(&config, opt.current_season, opt.output, open_browser).await
        }
        Command::Auth => cli::auth(&config, open_browser).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
