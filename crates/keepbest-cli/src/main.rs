use clap::{ArgAction, Parser, Subcommand};
use commands::catalog::ScanArgs;
use commands::{clear, config, delete, libraries, login, scan};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "keepbest")]
#[command(about = "keepbest - find duplicate movies on a Jellyfin server and keep the best copy")]
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

    /// Write logs to this file (rotated daily) instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find duplicate movies and show which copy would be kept
    #[command(long_about = "Group movies that are the same title (by TMDB id, then IMDB id, then normalized title and year) and rank each group by bitrate, then file size. Nothing is changed on the server.")]
    Scan {
        #[command(flatten)]
        args: ScanArgs,
    },
    /// Delete every copy except the preferred one in each duplicate group
    #[command(long_about = "Run a scan, then delete the non-preferred copies through the server. Asks for confirmation unless --yes is given. Use --dry-run to preview.")]
    Delete {
        #[command(flatten)]
        args: ScanArgs,

        /// Show what would be deleted without deleting anything
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// List libraries on the server
    Libraries {
        /// Read the catalog from a JSON snapshot instead of the server
        #[arg(long, value_name = "FILE")]
        snapshot: Option<PathBuf>,
    },
    /// Log in to a Jellyfin server and store the session
    #[command(long_about = "Authenticate with username and password. The password is only sent to the server; the returned access token, user id and a generated device id are stored in the credentials file.")]
    Login {
        /// Server URL, e.g. http://jellyfin.local:8096 (prompted when omitted)
        #[arg(long)]
        url: Option<String>,

        /// Username (prompted when omitted)
        #[arg(long)]
        username: Option<String>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear stored credentials
    #[command(long_about = "Use --session to log out while keeping the device id, or --credentials to remove the credentials file entirely.")]
    Clear {
        /// Forget the access token and user id
        #[arg(long, action = ArgAction::SetTrue)]
        session: bool,

        /// Remove the credentials file, including the device id
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "session")]
        credentials: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    #[command(long_about = "Display the current configuration and stored credentials. Tokens and ids are masked unless --full is given.")]
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Scan { args } => scan::run_scan(args, &output).await,
        Commands::Delete { args, dry_run, yes } => delete::run_delete(args, dry_run, yes, &output).await,
        Commands::Libraries { snapshot } => libraries::run_libraries(snapshot, &output).await,
        Commands::Login { url, username } => login::run_login(url, username, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
        Commands::Clear { session, credentials } => clear::run_clear(session, credentials, &output).await,
    }
}
