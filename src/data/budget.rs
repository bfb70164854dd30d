//! Budget amounts, scale bands and row filters.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use super::batch::PROJECT_TYPE_COLUMN;
use super::table::BudgetTable;
use crate::classifier::ProjectType;
use crate::error::ClassifyError;

/// Default name of the amount column.
pub const DEFAULT_AMOUNT_COLUMN: &str = "budget_amount";

/// Default name of the region column.
pub const DEFAULT_REGION_COLUMN: &str = "region";

// Plain digits, or digits grouped by thousands separators, with an optional
// fraction and an optional trailing currency unit.
static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<num>-?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)\s*원?$").unwrap()
});

/// Parses an amount such as `"1,234,000"` or `"50000000원"`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let caps = AMOUNT_PATTERN.captures(raw.trim())?;
    caps["num"].replace(',', "").parse().ok()
}

/// Coarse size band of a budget line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetScale {
    /// Under 50 million won.
    Small,
    /// Under 500 million won.
    Medium,
    /// 500 million won or more.
    Large,
}

impl BudgetScale {
    /// All bands, smallest first.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    const SMALL_LIMIT: f64 = 50_000_000.0;
    const MEDIUM_LIMIT: f64 = 500_000_000.0;

    /// Band for an amount in won.
    pub fn from_amount(amount: f64) -> Self {
        if amount < Self::SMALL_LIMIT {
            Self::Small
        } else if amount < Self::MEDIUM_LIMIT {
            Self::Medium
        } else {
            Self::Large
        }
    }

    /// Localized display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "소규모",
            Self::Medium => "중규모",
            Self::Large => "대규모",
        }
    }
}

impl fmt::Display for BudgetScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Row filter over a classified table. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct BudgetFilter {
    /// Regions to keep.
    pub regions: Vec<String>,
    /// Project types to keep.
    pub project_types: Vec<ProjectType>,
    /// Inclusive lower bound on the amount.
    pub min_amount: Option<f64>,
    /// Inclusive upper bound on the amount.
    pub max_amount: Option<f64>,
    /// Column holding the region.
    pub region_column: String,
    /// Column holding the amount.
    pub amount_column: String,
}

impl BudgetFilter {
    /// Creates a filter with no criteria over the default columns.
    pub fn new() -> Self {
        Self {
            region_column: DEFAULT_REGION_COLUMN.to_string(),
            amount_column: DEFAULT_AMOUNT_COLUMN.to_string(),
            ..Self::default()
        }
    }

    /// Whether the filter has no criteria.
    pub fn is_noop(&self) -> bool {
        self.regions.is_empty()
            && self.project_types.is_empty()
            && self.min_amount.is_none()
            && self.max_amount.is_none()
    }

    /// Applies the filter. Only the columns a criterion needs must exist.
    /// Rows with an unparsable amount never satisfy an amount bound.
    pub fn apply(&self, table: &BudgetTable) -> Result<BudgetTable, ClassifyError> {
        let initial = table.len();
        let mut filtered = table.clone();

        if !self.regions.is_empty() {
            let index = filtered.require_column(&self.region_column)?;
            let regions: HashSet<&str> = self.regions.iter().map(String::as_str).collect();
            filtered = filtered.filter_rows(|row| regions.contains(row[index].as_str()));
            debug!(rows = filtered.len(), regions = ?self.regions, "Applied region filter");
        }

        if !self.project_types.is_empty() {
            let index = filtered.require_column(PROJECT_TYPE_COLUMN)?;
            let labels: HashSet<&str> = self.project_types.iter().map(|t| t.label()).collect();
            filtered = filtered.filter_rows(|row| labels.contains(row[index].as_str()));
            debug!(rows = filtered.len(), types = ?self.project_types, "Applied project type filter");
        }

        if self.min_amount.is_some() || self.max_amount.is_some() {
            let index = filtered.require_column(&self.amount_column)?;
            let min = self.min_amount.unwrap_or(f64::NEG_INFINITY);
            let max = self.max_amount.unwrap_or(f64::INFINITY);
            filtered = filtered.filter_rows(|row| {
                parse_amount(&row[index]).is_some_and(|amount| (min..=max).contains(&amount))
            });
            debug!(rows = filtered.len(), min, max, "Applied amount filter");
        }

        if filtered.is_empty() && initial > 0 {
            warn!(initial, "Filter removed every row");
        }
        Ok(filtered)
    }
}
