//! # budget-classify
//!
//! Rule-based classification of records-management budget lines.
//!
//! Each free-text description is assigned a project type by first keyword
//! match in a fixed priority order, then a subtype by highest keyword count
//! within that type.
//!
//! ## Quick Start
//!
//! ```rust
//! use budget_classify::{classify, ProjectSubtype, ProjectType};
//!
//! let result = classify("시스템 유지보수 고도화 업그레이드");
//! assert_eq!(result.project_type(), ProjectType::SystemMgmt);
//! assert_eq!(result.project_subtype(), ProjectSubtype::SysEnhancement);
//! assert_eq!(result.type_label(), "시스템 관리");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod classifier;
pub mod cli;
pub mod data;
pub mod error;
pub mod utils;

pub use crate::classifier::{
    classify, Classification, Classifier, ProjectSubtype, ProjectType, RuleSet,
};
pub use crate::cli::Cli;
pub use crate::data::{classify_csv, classify_table, BudgetTable, ClassificationReport};
pub use crate::error::ClassifyError;

/// The current version of budget-classify.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
