//! Frequency and budget summaries of a classified table.

use std::collections::HashMap;
use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::batch::{PROJECT_SUBTYPE_COLUMN, PROJECT_TYPE_COLUMN};
use super::budget::{parse_amount, BudgetScale};
use super::table::BudgetTable;
use crate::classifier::{ProjectSubtype, ProjectType};
use crate::error::ClassifyError;
use crate::utils::format_amount;

/// Output format for reports and classification results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Number of rows carrying a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    /// Display label.
    pub label: String,
    /// Number of rows.
    pub count: usize,
}

/// Budget total for one project type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTotal {
    /// Project type label.
    pub label: String,
    /// Rows with a parsable amount.
    pub rows: usize,
    /// Sum of those amounts.
    pub total_amount: f64,
}

/// Budget aggregation over the amount column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Totals per project type, largest first.
    pub by_type: Vec<BudgetTotal>,
    /// Row counts per budget scale, smallest band first.
    pub by_scale: Vec<LabelCount>,
    /// Rows whose amount could not be parsed.
    pub unparsed_amounts: usize,
}

/// Summary of a classified table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Number of rows summarized.
    pub total_rows: usize,
    /// Type label frequencies, most frequent first.
    pub project_types: Vec<LabelCount>,
    /// Subtype label frequencies, most frequent first.
    pub project_subtypes: Vec<LabelCount>,
    /// Budget aggregation, when an amount column was available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetSummary>,
}

impl ClassificationReport {
    /// Summarizes the label columns of a classified table. When
    /// `amount_column` names an existing column, budget totals are included.
    pub fn from_table(
        table: &BudgetTable,
        amount_column: Option<&str>,
    ) -> Result<Self, ClassifyError> {
        let types = table.column_by_name(PROJECT_TYPE_COLUMN)?;
        let subtypes = table.column_by_name(PROJECT_SUBTYPE_COLUMN)?;

        let budget = match amount_column.and_then(|name| table.column_index(name)) {
            Some(index) => {
                let amounts: Vec<Option<f64>> = table.column(index).map(parse_amount).collect();
                let summary = budget_summary(&types, &amounts);
                if summary.unparsed_amounts > 0 {
                    debug!(
                        column = amount_column.unwrap_or_default(),
                        rows = summary.unparsed_amounts,
                        "Excluded unparsable amounts from budget totals"
                    );
                }
                Some(summary)
            }
            None => {
                if let Some(name) = amount_column {
                    debug!(column = name, "Amount column not present, skipping budget summary");
                }
                None
            }
        };

        Ok(Self {
            total_rows: table.len(),
            project_types: value_counts(&types, type_rank),
            project_subtypes: value_counts(&subtypes, subtype_rank),
            budget,
        })
    }

    /// Renders the report in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(self).context("Failed to serialize report to YAML")
            }
        }
    }

    /// Plain-text rendering.
    pub fn render_text(&self) -> String {
        let mut out = format!("총 {}건\n", self.total_rows);

        out.push_str("\n사업 유형 분포:\n");
        for entry in &self.project_types {
            out.push_str(&format!("  {}: {}\n", entry.label, entry.count));
        }

        out.push_str("\n세부 사업 유형 분포:\n");
        for entry in &self.project_subtypes {
            out.push_str(&format!("  {}: {}\n", entry.label, entry.count));
        }

        if let Some(budget) = &self.budget {
            out.push_str("\n사업 유형별 예산:\n");
            for total in &budget.by_type {
                out.push_str(&format!(
                    "  {}: {}원 ({}건)\n",
                    total.label,
                    format_amount(total.total_amount),
                    total.rows
                ));
            }

            out.push_str("\n예산 규모 분포:\n");
            for entry in &budget.by_scale {
                out.push_str(&format!("  {}: {}\n", entry.label, entry.count));
            }

            if budget.unparsed_amounts > 0 {
                out.push_str(&format!(
                    "\n금액 해석 불가: {}건\n",
                    budget.unparsed_amounts
                ));
            }
        }
        out
    }
}

fn type_rank(label: &str) -> usize {
    ProjectType::ALL
        .iter()
        .position(|t| t.label() == label)
        .unwrap_or(usize::MAX)
}

fn subtype_rank(label: &str) -> usize {
    ProjectSubtype::ALL
        .iter()
        .position(|s| s.label() == label)
        .unwrap_or(usize::MAX)
}

/// Counts labels, most frequent first; ties follow declaration order, and
/// unknown labels sort last alphabetically.
fn value_counts(labels: &[&str], rank: fn(&str) -> usize) -> Vec<LabelCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(*label).or_insert(0) += 1;
    }

    let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| rank(a.0).cmp(&rank(b.0)))
            .then_with(|| a.0.cmp(b.0))
    });
    entries
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

fn budget_summary(types: &[&str], amounts: &[Option<f64>]) -> BudgetSummary {
    let mut totals: HashMap<&str, (usize, f64)> = HashMap::new();
    let mut scales: HashMap<BudgetScale, usize> = HashMap::new();
    let mut unparsed = 0;

    for (label, amount) in types.iter().zip(amounts) {
        let Some(amount) = amount else {
            unparsed += 1;
            continue;
        };
        let entry = totals.entry(*label).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += amount;
        *scales.entry(BudgetScale::from_amount(*amount)).or_insert(0) += 1;
    }

    let mut by_type: Vec<BudgetTotal> = totals
        .into_iter()
        .map(|(label, (rows, total_amount))| BudgetTotal {
            label: label.to_string(),
            rows,
            total_amount,
        })
        .collect();
    by_type.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then_with(|| type_rank(&a.label).cmp(&type_rank(&b.label)))
    });

    let by_scale = BudgetScale::ALL
        .into_iter()
        .map(|scale| LabelCount {
            label: scale.label().to_string(),
            count: scales.get(&scale).copied().unwrap_or(0),
        })
        .collect();

    BudgetSummary {
        by_type,
        by_scale,
        unparsed_amounts: unparsed,
    }
}
