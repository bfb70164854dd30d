//! Rules-related CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::classifier::RuleSet;
use crate::utils::Settings;

/// Rule operations.
#[derive(Parser)]
pub struct RulesCommand {
    /// Rules subcommand to execute.
    #[command(subcommand)]
    pub command: RulesSubcommands,
}

/// Rules subcommands.
#[derive(Subcommand)]
pub enum RulesSubcommands {
    /// Prints the effective rule set as YAML.
    Show(ShowCommand),
    /// Validates a rules YAML file.
    Check(CheckCommand),
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {
    /// Rules YAML file to show instead of the configured rules.
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

/// Check command options.
#[derive(Parser)]
pub struct CheckCommand {
    /// Rules YAML file to validate.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl RulesCommand {
    /// Executes the rules command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            RulesSubcommands::Show(show_cmd) => show_cmd.execute(),
            RulesSubcommands::Check(check_cmd) => check_cmd.execute(),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let rules = Settings::load()?.load_rules(self.rules.as_deref())?;
        print!("{}", rules.to_yaml()?);
        Ok(())
    }
}

impl CheckCommand {
    /// Executes the check command.
    pub fn execute(self) -> Result<()> {
        let rules = RuleSet::load_from_file(&self.file)
            .with_context(|| format!("Rules file {} is invalid", self.file.display()))?;
        let subtypes: usize = rules.types.iter().map(|t| t.subtypes.len()).sum();
        println!(
            "✅ {} is valid: {} types, {} subtypes",
            self.file.display(),
            rules.types.len(),
            subtypes
        );
        Ok(())
    }
}
