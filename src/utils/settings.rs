//! Settings and configuration utilities.
//!
//! This module reads settings from $HOME/.budget-classify/settings.json and
//! resolves the effective rule set and column names from CLI flags,
//! environment variables and those settings, in that order.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::classifier::RuleSet;
use crate::data::{DEFAULT_AMOUNT_COLUMN, DEFAULT_DESCRIPTION_COLUMN};

/// Environment variable naming a rules YAML file.
pub const RULES_ENV_VAR: &str = "BUDGET_CLASSIFY_RULES";

/// Settings loaded from $HOME/.budget-classify/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Rules YAML file used instead of the built-in rules.
    #[serde(default, rename = "rulesFile")]
    pub rules_file: Option<PathBuf>,

    /// Name of the description column in batch input.
    #[serde(default, rename = "descriptionColumn")]
    pub description_column: Option<String>,

    /// Name of the amount column in batch input.
    #[serde(default, rename = "amountColumn")]
    pub amount_column: Option<String>,

    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path. A missing file yields defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".budget-classify").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        env::var(key).ok().or_else(|| self.env.get(key).cloned())
    }

    /// Resolves the rules file: explicit path, then [`RULES_ENV_VAR`], then
    /// the `rulesFile` setting. `None` means the built-in rules.
    pub fn rules_path(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.get_env_var(RULES_ENV_VAR).map(PathBuf::from))
            .or_else(|| self.rules_file.clone())
    }

    /// Loads the effective rule set.
    pub fn load_rules(&self, explicit: Option<&Path>) -> Result<RuleSet> {
        match self.rules_path(explicit) {
            Some(path) => {
                debug!(path = %path.display(), "Using rules file");
                RuleSet::load_from_file(&path)
                    .with_context(|| format!("Failed to load rules from {}", path.display()))
            }
            None => Ok(RuleSet::builtin().clone()),
        }
    }

    /// Resolves the description column name.
    pub fn description_column(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.description_column.clone())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION_COLUMN.to_string())
    }

    /// Resolves the amount column name.
    pub fn amount_column(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.amount_column.clone())
            .unwrap_or_else(|| DEFAULT_AMOUNT_COLUMN.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn settings_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let settings_json = r#"{
            "rulesFile": "/etc/budget/rules.yaml",
            "descriptionColumn": "사업내용",
            "env": {
                "BC_TEST_VAR": "test_value"
            }
        }"#;
        fs::write(&settings_path, settings_json).unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();

        assert_eq!(
            settings.rules_file.as_deref(),
            Some(Path::new("/etc/budget/rules.yaml"))
        );
        assert_eq!(settings.description_column(None), "사업내용");
        assert_eq!(settings.amount_column(None), DEFAULT_AMOUNT_COLUMN);
        assert_eq!(settings.env.get("BC_TEST_VAR").unwrap(), "test_value");
    }

    #[test]
    fn settings_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(temp_dir.path().join("absent.json")).unwrap();
        assert!(settings.rules_file.is_none());
        assert_eq!(settings.description_column(None), DEFAULT_DESCRIPTION_COLUMN);
    }

    #[test]
    fn settings_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, "{ not json").unwrap();
        assert!(Settings::load_from_path(&settings_path).is_err());
    }

    #[test]
    fn settings_get_env_var() {
        let settings = Settings {
            env: HashMap::from([("BC_FALLBACK_VAR".to_string(), "from_settings".to_string())]),
            ..Settings::default()
        };

        env::set_var("BC_FALLBACK_VAR", "from_env");
        assert_eq!(settings.get_env_var("BC_FALLBACK_VAR").unwrap(), "from_env");

        env::remove_var("BC_FALLBACK_VAR");
        assert_eq!(
            settings.get_env_var("BC_FALLBACK_VAR").unwrap(),
            "from_settings"
        );
    }

    #[test]
    fn explicit_values_win() {
        let settings = Settings {
            rules_file: Some(PathBuf::from("settings.yaml")),
            description_column: Some("detail".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            settings.rules_path(Some(Path::new("cli.yaml"))),
            Some(PathBuf::from("cli.yaml"))
        );
        assert_eq!(settings.description_column(Some("설명")), "설명");
    }

    #[test]
    fn load_rules_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let rules_path = temp_dir.path().join("rules.yaml");
        fs::write(&rules_path, RuleSet::builtin().to_yaml().unwrap()).unwrap();

        let rules = Settings::default().load_rules(Some(&rules_path)).unwrap();
        assert_eq!(&rules, RuleSet::builtin());

        let missing = temp_dir.path().join("missing.yaml");
        assert!(Settings::default().load_rules(Some(&missing)).is_err());
    }
}
