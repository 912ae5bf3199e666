use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use umlgen::cli::{
    print_error, run_all, run_classes, run_init, run_sequence, run_static, Args, Command, Output,
    Session,
};
use umlgen::config::Config;
use umlgen::render::BuiltinModel;

fn main() -> ExitCode {
    let args = Args::parse();

    // Diagnostics go to stderr; stdout carries the progress report
    let default_level = if args.verbose { "umlgen=debug" } else { "umlgen=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let command = args.command.unwrap_or(Command::All);

    if let Command::Init { force } = command {
        run_init(&args.root, force, args.quiet)?;
        return Ok(());
    }

    let mut config = Config::discover(&args.root, args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    tracing::debug!(?config, "resolved configuration");

    let output = Output::new(args.quiet);
    let session = Session::new(&args.root, config, args.dot_only, output);

    match command {
        Command::Classes => run_classes(&session)?,
        Command::Sequence => run_sequence(&session)?,
        Command::Design => run_static(&session, BuiltinModel::Design)?,
        Command::Domain => run_static(&session, BuiltinModel::Domain)?,
        Command::UseCase => run_static(&session, BuiltinModel::UseCase)?,
        Command::All => run_all(&session)?,
        Command::Init { .. } => unreachable!(),
    }

    output.success(&format!(
        "Diagrams written to {}",
        session.renderer.output_dir.display()
    ));
    Ok(())
}
