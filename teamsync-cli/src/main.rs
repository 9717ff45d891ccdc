//! teamsync: reconcile GitHub team membership from an Airtable directory.
//!
//! # Usage
//!
//! ```text
//! teamsync fetch [--view <name>]
//! teamsync compute-access [--admin-role <id>] [--org <name>] [--diff]
//! teamsync commit-access [--role member|maintainer] [--dry-run]
//! ```
//!
//! Every command takes `--data-dir` (default `data`). Credentials come from
//! the environment, optionally seeded from a `.env` file.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::{
    commit_access::CommitAccessArgs, compute_access::ComputeAccessArgs, fetch::FetchArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "teamsync",
    version,
    about = "Sync GitHub team membership from an Airtable directory",
    long_about = None,
)]
struct Cli {
    /// Directory holding data.json and access.json.
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download the directory from Airtable and write data.json.
    Fetch(FetchArgs),

    /// Derive access.json from data.json.
    ComputeAccess(ComputeAccessArgs),

    /// Apply access.json to GitHub team memberships.
    CommitAccess(CommitAccessArgs),
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Fetch(args) => args.run(&cli.data_dir),
        Commands::ComputeAccess(args) => args.run(&cli.data_dir),
        Commands::CommitAccess(args) => args.run(&cli.data_dir),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
