//! CPF content CLI
//!
//! Inspect and edit plugin and repository content through layered sources.

mod cli;
mod commands;
mod context;
mod error;

use std::io::{self, Write};

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use context::AccessContext;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "cpf", &mut io::stdout());
        return Ok(());
    }

    let context = open_context(&cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute_command(&context, cli.command, &mut out)?;
    out.flush()?;
    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let installed = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    } else {
        let filter = EnvFilter::try_from_env("CPF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init()
            .is_ok()
    };
    if !installed {
        return Err(CliError::user("failed to set tracing subscriber"));
    }
    tracing::debug!("Verbose mode enabled");
    Ok(())
}

fn open_context(cli: &Cli) -> Result<AccessContext> {
    match &cli.sources {
        Some(sources) => AccessContext::from_sources(sources, cli.base.as_deref()),
        None => AccessContext::from_roots(&cli.roots, cli.base.as_deref()),
    }
}

fn execute_command(context: &AccessContext, cmd: Commands, out: &mut impl Write) -> Result<()> {
    match cmd {
        Commands::Exists { path } => commands::run_exists(context, &path, out),
        Commands::Cat { path } => commands::run_cat(context, &path, out),
        Commands::Stat { path } => commands::run_stat(context, &path, out),
        Commands::Ls { path, options } => commands::run_ls(context, &path, &options, out),
        Commands::Put { path, file } => commands::run_put(context, &path, &file, out),
        Commands::Cp { from, to } => commands::run_cp(context, &from, &to, out),
        Commands::Rm { path } => commands::run_rm(context, &path, out),
        Commands::Mkdir { path, hidden } => commands::run_mkdir(context, &path, hidden, out),
        Commands::Completions { .. } => Ok(()),
    }
}
