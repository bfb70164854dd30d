//! Batch command: classifies a CSV file and summarizes the result.

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use super::parse_format;
use crate::classifier::{Classifier, ProjectType};
use crate::data::{classify_csv, BudgetFilter, ClassificationReport, OutputFormat};
use crate::utils::Settings;

/// Batch command options.
#[derive(Parser)]
pub struct BatchCommand {
    /// Input CSV file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output CSV file (UTF-8 with BOM). When omitted, nothing is written
    /// unless --print is given.
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Column holding the free-text description (default: project_detail).
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,

    /// Column holding the budget amount (default: budget_amount).
    #[arg(long, value_name = "NAME")]
    pub amount_column: Option<String>,

    /// Keeps only rows from these regions (repeatable).
    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<String>,

    /// Keeps only rows of these project types, by key or label (repeatable).
    #[arg(long = "type", value_name = "TYPE", value_parser = parse_project_type)]
    pub project_types: Vec<ProjectType>,

    /// Keeps only rows with at least this amount.
    #[arg(long)]
    pub min_amount: Option<f64>,

    /// Keeps only rows with at most this amount.
    #[arg(long)]
    pub max_amount: Option<f64>,

    /// Report format: text (default), json, yaml.
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Skips the summary report.
    #[arg(long)]
    pub no_summary: bool,

    /// Writes the classified table to stdout as CSV instead of the report.
    #[arg(long)]
    pub print: bool,

    /// Rules YAML file to use instead of the built-in rules.
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

fn parse_project_type(value: &str) -> Result<ProjectType, String> {
    value.parse()
}

impl BatchCommand {
    /// Executes the batch command.
    pub fn execute(self) -> Result<()> {
        if self.no_summary && self.output.is_none() && !self.print {
            bail!("--no-summary needs an OUTPUT file or --print");
        }
        let format = parse_format(&self.format)?;
        let settings = Settings::load()?;
        let rules = settings.load_rules(self.rules.as_deref())?;
        let classifier = Classifier::new(&rules);
        let column = settings.description_column(self.column.as_deref());
        let amount_column = settings.amount_column(self.amount_column.as_deref());

        let filter = BudgetFilter {
            regions: self.regions.clone(),
            project_types: self.project_types.clone(),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            amount_column: amount_column.clone(),
            ..BudgetFilter::new()
        };

        // Output is written only once classification and filtering succeed.
        let labelled = classify_csv(&classifier, &self.input, None, &column)
            .with_context(|| format!("Failed to classify {}", self.input.display()))?;
        let selected = filter.apply(&labelled).context("Failed to filter rows")?;

        if let Some(output) = &self.output {
            selected
                .write_to_path(output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            eprintln!("✅ Wrote {} rows to {}", selected.len(), output.display());
        }

        if self.print {
            selected
                .write_to(io::stdout().lock())
                .context("Failed to write CSV to stdout")?;
            return Ok(());
        }

        if !self.no_summary {
            let report = ClassificationReport::from_table(&selected, Some(&amount_column))?;
            print!("{}", self.render_report(&report, format)?);
        }
        Ok(())
    }

    fn render_report(&self, report: &ClassificationReport, format: OutputFormat) -> Result<String> {
        let mut rendered = report.render(format)?;
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_flag_accepts_keys_and_labels() {
        assert_eq!(parse_project_type("PRESERVATION"), Ok(ProjectType::Preservation));
        assert_eq!(parse_project_type("특수사업"), Ok(ProjectType::SpecialProject));
        assert!(parse_project_type("기타").is_err());
    }

    #[test]
    fn no_summary_without_destination_is_rejected() {
        let cli =
            crate::Cli::try_parse_from(["budget-classify", "batch", "in.csv", "--no-summary"])
                .unwrap();
        let crate::cli::Commands::Batch(command) = cli.command else {
            panic!("expected the batch command");
        };
        let err = command.execute().unwrap_err();
        assert!(err.to_string().contains("--no-summary"), "{err}");
    }
}
