use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "umlgen")]
#[command(about = "Generate UML class and sequence diagrams from Java and TypeScript sources")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Project root that source directories are relative to
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Config file (defaults to umlgen.toml in the project root)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output directory, overrides the config value
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Image format, overrides the config value
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write Graphviz .dot sources without invoking dot
    #[arg(long, global = true)]
    pub dot_only: bool,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Class diagrams for entities, controllers and frontend types
    Classes,
    /// One sequence diagram per scenario plus the system overview
    Sequence,
    /// Logical design class diagram
    Design,
    /// Domain class diagram
    Domain,
    /// Use-case diagram
    UseCase,
    /// Every diagram (default)
    All,
    /// Write a default umlgen.toml to the project root
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
