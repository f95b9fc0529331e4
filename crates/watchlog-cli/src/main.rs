use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, config, fetch, generate};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchlog")]
#[command(about = "watchlog - Turn your Real-Debrid download history into a Trakt watch history")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Also write logs to this file (rotated daily)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch download history and save JSON and CSV snapshots
    #[command(long_about = "Fetch the account's download history from Real-Debrid in a single request, print statistics and a table of recent downloads, and save the raw records as timestamped JSON and CSV files.")]
    Fetch {
        /// Maximum number of records to request
        #[arg(long)]
        limit: Option<usize>,

        /// Directory for the snapshot files (defaults to [output].directory)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Skip the download table
        #[arg(long, action = ArgAction::SetTrue)]
        no_table: bool,
    },
    /// Generate a Trakt import file from download history
    #[command(long_about = "Resolve each downloaded filename to an IMDb id through TMDB and write a Trakt-compatible JSON import file. Reads a snapshot written by 'watchlog fetch' when --input is given, otherwise fetches the history fresh.")]
    Generate {
        /// Snapshot JSON to read instead of fetching
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Maximum number of records to request when fetching
        #[arg(long, conflicts_with = "input")]
        limit: Option<usize>,

        /// Directory for the import file (defaults to [output].directory)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Keep lookups in memory for this run only
        #[arg(long, action = ArgAction::SetTrue)]
        no_cache: bool,
    },
    /// Manage configuration and credentials
    #[command(long_about = "View settings, write a default config file, or store API credentials.")]
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear cached data
    #[command(long_about = "Clear the persisted title lookup cache or stored credentials. Use --all to clear both.")]
    Clear {
        /// Clear cache and credentials
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear the title lookup cache
        #[arg(long, action = ArgAction::SetTrue)]
        cache: bool,

        /// Clear stored credentials
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks credentials)
    Show {
        /// Show credentials unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },

    /// Store API credentials (prompts for any not given)
    Credentials {
        /// Real-Debrid API token
        #[arg(long)]
        realdebrid_token: Option<String>,

        /// TMDB API key or read access token
        #[arg(long)]
        tmdb_key: Option<String>,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging_with_file(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Fetch {
            limit,
            output_dir,
            no_table,
        } => fetch::run_fetch(limit, output_dir, no_table, &output),
        Commands::Generate {
            input,
            limit,
            output_dir,
            no_cache,
        } => generate::run_generate(input, limit, output_dir, no_cache, &output),
        Commands::Config { cmd } => config::run_config(cmd, &output),
        Commands::Clear {
            all,
            cache,
            credentials,
        } => clear::run_clear(all, cache, credentials, &output),
    }
}
