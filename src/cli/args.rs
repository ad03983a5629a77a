//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Flatten a layered image document and mute its dark ink to gray
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: flatdim.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Log file path (default: flatdim.log)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub log: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Flatten the document, recolor dark pixels and write a PNG
    #[command(visible_alias = "c")]
    Convert {
        /// Layered document to read (overrides `paths.input`)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,

        /// PNG file to write (overrides `paths.output`)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print document size and layer table without writing anything
    #[command(visible_alias = "i")]
    Inspect {
        /// Layered document to read (overrides `paths.input`)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: Option<PathBuf>,
    },
}

impl Cli {
    /// Input path given on the command line, if any.
    pub fn input(&self) -> Option<&PathBuf> {
        match &self.command {
            Commands::Convert { input, .. } | Commands::Inspect { input } => input.as_ref(),
        }
    }

    /// Output path given on the command line, if any.
    pub fn output(&self) -> Option<&PathBuf> {
        match &self.command {
            Commands::Convert { output, .. } => output.as_ref(),
            Commands::Inspect { .. } => None,
        }
    }
}
