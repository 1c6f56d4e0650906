//! CLI Adapter.

mod config;

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

use crate::app::api::{self, ShipOptions};
use crate::app::logging;
use crate::domain::workflow::State;
use crate::domain::{AppError, RunMode};

#[derive(Parser)]
#[command(name = "gitship")]
#[command(version)]
#[command(
    about = "Stage, commit, push and open pull requests with generated messages",
    long_about = None
)]
#[command(group(ArgGroup::new("goal").args(["local", "push", "pr"]).multiple(false)))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Commit without prompting; never push
    #[arg(long)]
    local: bool,
    /// Commit and push without prompting
    #[arg(long)]
    push: bool,
    /// Commit, push and open a pull request without prompting
    #[arg(long)]
    pr: bool,
    /// Split the changes into several commits (needs --local, --push or --pr)
    #[arg(long, requires = "goal")]
    stack: bool,
    /// Run as if started in DIR
    #[arg(short = 'C', value_name = "DIR")]
    directory: Option<PathBuf>,
    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change stored settings
    #[clap(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<i32, AppError> = match cli.command {
        Some(Commands::Config { command }) => config::run_config(command).map(|_| 0),
        None => run_ship(cli.local, cli.push, cli.pr, cli.stack, cli.directory),
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_ship(
    local: bool,
    push: bool,
    pr: bool,
    stack: bool,
    directory: Option<PathBuf>,
) -> Result<i32, AppError> {
    let mode = RunMode::from_flags(local, push, pr, stack)?;
    let root = match directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let state = api::ship(&ShipOptions { mode, root })?;
    report(&state);
    Ok(state.exit_code())
}

fn report(state: &State) {
    match state {
        State::Done { .. } => println!("✅ {}", state.summary()),
        State::Error { .. } => eprintln!("{}", state.summary()),
        State::MergeConflict { .. } => eprintln!("⚠️  {}", state.summary()),
        _ => println!("{}", state.summary()),
    }
}
