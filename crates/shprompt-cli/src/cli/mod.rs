//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use shprompt_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "shprompt")]
#[command(version)]
#[command(about = "Shell prompt builder with Git and Mercurial context")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output (including VCS timings) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Render the prompt for the current directory
    Render {
        /// Terminal width in columns
        #[arg(long, env = "COLUMNS")]
        width: Option<i32>,

        /// Exit code of the previous command
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        exit_code: i32,

        /// What to print
        #[arg(long, value_enum, default_value_t = commands::render::Format::Script)]
        format: commands::render::Format,

        /// Refresh cached facts that need network access (e.g. hg outgoing)
        #[arg(long)]
        update_cache: bool,

        /// Text for the right-hand prompt (RPROMPT)
        #[arg(long, value_name = "TEXT")]
        secondary: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Manage the VCS cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

#[derive(clap::Subcommand)]
enum CacheCommands {
    /// Show the path to the cache file
    Path,
    /// Remove all cached entries
    Clear,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

/// Logs go to stderr; stdout belongs to the shell script.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("SHPROMPT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Render {
            width,
            exit_code,
            format,
            update_cache,
            secondary,
        } => {
            let config = config::Config::load().context("load config")?;
            commands::render::run(commands::render::RenderRunOptions {
                config: &config,
                width,
                exit_code,
                format,
                update_cache,
                secondary,
            })
            .await
        }

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },

        Commands::Cache { command } => match command {
            CacheCommands::Path => {
                commands::cache::path();
                Ok(())
            }
            CacheCommands::Clear => commands::cache::clear(),
        },
    }
}
