//! Budget tables: loading, batch classification, filtering and reporting.

pub mod batch;
pub mod budget;
pub mod report;
pub mod table;

pub use batch::{
    classify_csv, classify_rows, classify_table, DEFAULT_DESCRIPTION_COLUMN,
    PROJECT_SUBTYPE_COLUMN, PROJECT_TYPE_COLUMN,
};
pub use budget::{
    parse_amount, BudgetFilter, BudgetScale, DEFAULT_AMOUNT_COLUMN, DEFAULT_REGION_COLUMN,
};
pub use report::{BudgetSummary, BudgetTotal, ClassificationReport, LabelCount, OutputFormat};
pub use table::BudgetTable;
