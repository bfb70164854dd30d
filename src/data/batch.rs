//! Row-wise classification of budget tables.

use std::path::Path;

use rayon::prelude::*;
use tracing::info;

use super::table::BudgetTable;
use crate::classifier::{Classification, Classifier};
use crate::error::ClassifyError;

/// Default name of the free-text description column.
pub const DEFAULT_DESCRIPTION_COLUMN: &str = "project_detail";

/// Column receiving the project type label.
pub const PROJECT_TYPE_COLUMN: &str = "project_type";

/// Column receiving the project subtype label.
pub const PROJECT_SUBTYPE_COLUMN: &str = "project_subtype";

/// Classifies every row of `column`, in row order.
pub fn classify_rows(
    classifier: &Classifier<'_>,
    table: &BudgetTable,
    column: &str,
) -> Result<Vec<Classification>, ClassifyError> {
    let index = table.require_column(column)?;
    Ok(table
        .rows()
        .par_iter()
        .map(|row| classifier.classify(row.get(index).map(String::as_str)))
        .collect())
}

/// Returns a copy of `table` with the type and subtype label columns set.
///
/// Existing label columns are overwritten in place, so classifying an
/// already classified table yields the same columns again.
pub fn classify_table(
    classifier: &Classifier<'_>,
    table: &BudgetTable,
    column: &str,
) -> Result<BudgetTable, ClassifyError> {
    let classifications = classify_rows(classifier, table, column)?;
    let (types, subtypes): (Vec<String>, Vec<String>) = classifications
        .iter()
        .map(|c| (c.type_label().to_string(), c.subtype_label().to_string()))
        .unzip();

    Ok(table
        .with_column(PROJECT_TYPE_COLUMN, types)
        .with_column(PROJECT_SUBTYPE_COLUMN, subtypes))
}

/// Reads `input`, classifies it and, when `output` is given, writes the
/// labelled table there. The labelled table is returned either way.
///
/// Nothing is written unless classification succeeds.
pub fn classify_csv(
    classifier: &Classifier<'_>,
    input: &Path,
    output: Option<&Path>,
    column: &str,
) -> Result<BudgetTable, ClassifyError> {
    let table = BudgetTable::read_from_path(input)?;
    let labelled = classify_table(classifier, &table, column)?;
    info!(input = %input.display(), rows = labelled.len(), "Classified table");

    if let Some(output) = output {
        labelled.write_to_path(output)?;
        info!(output = %output.display(), "Wrote classified table");
    }
    Ok(labelled)
}
