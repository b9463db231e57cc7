use alndiff::cli::output::is_broken_pipe;
use alndiff::cli::{Cli, Commands};
use alndiff::core::config::{load_config, Config};
use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // ALNDIFF_LOG takes precedence over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = std::env::var("ALNDIFF_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        // Downstream closed the pipe (e.g. `| head`); not an error for us
        if is_broken_pipe(&e) {
            process::exit(0);
        }

        eprintln!("{} {:#}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<alndiff::AlnDiffError>() {
            Some(alndiff::AlnDiffError::Config(_)) => 2,
            Some(alndiff::AlnDiffError::Io(_)) => 3,
            Some(alndiff::AlnDiffError::Parse(_))
            | Some(alndiff::AlnDiffError::Format(_))
            | Some(alndiff::AlnDiffError::Input(_)) => 4,
            None => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let threads = cli.threads.unwrap_or(config.performance.threads);
    let threads = alndiff::utils::parallel::configure_thread_pool(threads)?;
    tracing::debug!("Using {} threads", threads);

    match cli.command {
        Commands::Diff(args) => alndiff::cli::commands::diff::run(args, &config),
        Commands::Annotate(args) => alndiff::cli::commands::annotate::run(args, &config),
        Commands::Represent(args) => alndiff::cli::commands::represent::run(args, &config),
        Commands::Config(args) => alndiff::cli::commands::config::run(args, &config),
    }
}
