//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use prompt_lab_core::Provider;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Compare prompting strategies against a language model
#[derive(Debug, Parser)]
#[command(name = "prompt-lab", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every experiment, every analysis and the HTML report
    Full(RunArgs),

    /// Run every configured method
    RunAll(RunArgs),

    /// Run the baseline method
    Baseline(RunArgs),

    /// Run the chain-of-thought method
    Cot(RunArgs),

    /// Run the few-shot method
    Fewshot(RunArgs),

    /// Analyze results already on disk
    Analyze(RunArgs),

    /// Render the HTML report from existing analysis summaries
    Report(RunArgs),
}

impl Command {
    pub fn args(&self) -> &RunArgs {
        match self {
            Command::Full(args)
            | Command::RunAll(args)
            | Command::Baseline(args)
            | Command::Cot(args)
            | Command::Fewshot(args)
            | Command::Analyze(args)
            | Command::Report(args) => args,
        }
    }
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Configuration file (default: $PROMPT_LAB_CONFIG or config/default.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model provider, overriding the configuration
    #[arg(long)]
    pub provider: Option<Provider>,

    /// Task dataset JSON file; selects the file dataset
    #[arg(long)]
    pub dataset_path: Option<PathBuf>,

    /// Directory for prediction and metrics CSVs
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}
