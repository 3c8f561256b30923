//! ghm - manage GitHub secrets and Actions workflows from the command line.
//!
//! Drives the `gh` and `git` command-line tools and keeps configuration and
//! a local secrets cache in JSON files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ghm_cmd::factory::Factory;
use ghm_core::cmdutil::{AuthError, CancelError};
use ghm_core::ios_eprintln;

/// Process exit codes.
mod exit_codes {
    pub const OK: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const CANCEL: i32 = 2;
    pub const AUTH: i32 = 4;
}

/// GitHub Management CLI - manage repository secrets and workflows.
#[derive(Debug, Parser)]
#[command(
    name = "ghm",
    version,
    about = "GitHub Management CLI Tool",
    long_about = "Manage GitHub repository secrets and Actions workflows through the gh and git command-line tools."
)]
struct Cli {
    /// Directory holding cconfig.json, secrets.json and workflows.json.
    #[arg(long, global = true, env = "GHM_STATE_DIR", value_name = "DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage GitHub secrets.
    #[command(subcommand)]
    Secret(ghm_cmd::secret::SecretCommand),
    /// Manage GitHub Actions workflows.
    #[command(subcommand)]
    Workflow(ghm_cmd::workflow::WorkflowCommand),
    /// Manage configurations.
    #[command(subcommand)]
    Config(ghm_cmd::config::ConfigCommand),
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GHM_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let factory = Factory::new(env!("CARGO_PKG_VERSION").to_string(), cli.state_dir);

    let exit_code = if let Some(cmd) = cli.command {
        match run_command(cmd, &factory).await {
            Ok(()) => exit_codes::OK,
            Err(e) => report_error(&factory, &e),
        }
    } else {
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        println!();
        exit_codes::OK
    };

    std::process::exit(exit_code);
}

async fn run_command(cmd: Commands, factory: &Factory) -> anyhow::Result<()> {
    match cmd {
        Commands::Secret(sub) => sub.run(factory).await,
        Commands::Workflow(sub) => sub.run(factory).await,
        Commands::Config(sub) => sub.run(factory).await,
    }
}

fn report_error(factory: &Factory, e: &anyhow::Error) -> i32 {
    let ios = &factory.io;
    let cs = ios.color_scheme();
    tracing::debug!(error = ?e, "command failed");

    if e.downcast_ref::<CancelError>().is_some() {
        ios_eprintln!(ios);
        exit_codes::CANCEL
    } else if e.downcast_ref::<AuthError>().is_some() {
        ios_eprintln!(ios, "{} {e}", cs.error_icon());
        exit_codes::AUTH
    } else {
        ios_eprintln!(ios, "{} {e:#}", cs.error_icon());
        exit_codes::ERROR
    }
}
