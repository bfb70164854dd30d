//! CLI interface for budget-classify.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod batch;
pub mod classify;
pub mod help;
pub mod rules;

/// budget-classify: keyword-priority classifier for budget lines.
#[derive(Parser)]
#[command(name = "budget-classify")]
#[command(about = "Classifies records-management budget lines by project type", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Classifies one or more descriptions given on the command line.
    Classify(classify::ClassifyCommand),
    /// Classifies every row of a CSV file.
    Batch(batch::BatchCommand),
    /// Shows or validates keyword rules.
    Rules(rules::RulesCommand),
    /// Displays comprehensive help for all commands.
    #[command(name = "help-all")]
    HelpAll(help::HelpCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Classify(classify_cmd) => classify_cmd.execute(),
            Commands::Batch(batch_cmd) => batch_cmd.execute(),
            Commands::Rules(rules_cmd) => rules_cmd.execute(),
            Commands::HelpAll(help_cmd) => help_cmd.execute(),
        }
    }
}

/// Parses a `--format` value, naming the accepted values on failure.
pub(crate) fn parse_format(value: &str) -> Result<crate::data::OutputFormat> {
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("{e} (expected text, json or yaml)"))
}
