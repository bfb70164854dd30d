//! Classify command: labels descriptions given as arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use super::parse_format;
use crate::classifier::{Classification, Classifier, ProjectSubtype, ProjectType};
use crate::data::OutputFormat;
use crate::utils::Settings;

/// Classify command options.
#[derive(Parser)]
pub struct ClassifyCommand {
    /// Descriptions to classify.
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,

    /// Output format: text (default), json, yaml.
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Prints canonical keys instead of display labels (text format only).
    #[arg(long)]
    pub keys: bool,

    /// Rules YAML file to use instead of the built-in rules.
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

/// One classified description, as emitted in JSON and YAML output.
#[derive(Debug, Serialize)]
pub struct ClassifiedText {
    /// Input description.
    pub text: String,
    /// Canonical type key.
    pub project_type: ProjectType,
    /// Canonical subtype key.
    pub project_subtype: ProjectSubtype,
    /// Type display label.
    pub project_type_label: &'static str,
    /// Subtype display label.
    pub project_subtype_label: &'static str,
}

impl ClassifiedText {
    fn new(text: &str, classification: Classification) -> Self {
        Self {
            text: text.to_string(),
            project_type: classification.project_type(),
            project_subtype: classification.project_subtype(),
            project_type_label: classification.type_label(),
            project_subtype_label: classification.subtype_label(),
        }
    }
}

impl ClassifyCommand {
    /// Executes the classify command.
    pub fn execute(self) -> Result<()> {
        let format = parse_format(&self.format)?;
        let settings = Settings::load()?;
        let rules = settings.load_rules(self.rules.as_deref())?;
        let classifier = Classifier::new(&rules);

        let results: Vec<ClassifiedText> = self
            .texts
            .iter()
            .map(|text| ClassifiedText::new(text, classifier.classify_str(text)))
            .collect();

        println!("{}", self.render(&results, format)?);
        Ok(())
    }

    fn render(&self, results: &[ClassifiedText], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(results
                .iter()
                .map(|r| {
                    if self.keys {
                        format!("{}\t{}\t{}", r.text, r.project_type.key(), r.project_subtype.key())
                    } else {
                        format!("{}\t{}\t{}", r.text, r.project_type_label, r.project_subtype_label)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json => serde_json::to_string_pretty(results)
                .context("Failed to serialize classifications to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(results)
                .context("Failed to serialize classifications to YAML"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    fn command(keys: bool) -> ClassifyCommand {
        ClassifyCommand {
            texts: vec![],
            format: "text".to_string(),
            keys,
            rules: None,
        }
    }

    #[test]
    fn text_output_uses_labels_or_keys() {
        let results = vec![ClassifiedText::new("서고 소독", classify("서고 소독"))];
        assert_eq!(
            command(false).render(&results, OutputFormat::Text).unwrap(),
            "서고 소독\t보존관리\t해충방제/방균관리"
        );
        assert_eq!(
            command(true).render(&results, OutputFormat::Text).unwrap(),
            "서고 소독\tPRESERVATION\tPEST_PREVENTION"
        );
    }

    #[test]
    fn json_output_carries_keys_and_labels() {
        let results = vec![ClassifiedText::new("", classify(""))];
        let json = command(false).render(&results, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["project_type"], "NO_PROJECT");
        assert_eq!(value[0]["project_subtype_label"], "사업없음");
    }
}
