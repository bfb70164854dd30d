//! Help command that prints usage for every command at once.

use anyhow::Result;
use clap::{Command, CommandFactory, Parser};

/// Help command for displaying comprehensive usage information.
#[derive(Parser)]
pub struct HelpCommand {}

/// Renders help for the whole command tree.
pub struct HelpGenerator {
    app: Command,
}

impl HelpGenerator {
    /// Creates a generator for the current CLI.
    pub fn new() -> Self {
        Self {
            app: crate::cli::Cli::command(),
        }
    }

    /// Generates help for the root command followed by every subcommand,
    /// depth first, siblings sorted by name so the output is stable.
    pub fn generate_all_help(&self) -> Result<String> {
        let mut sections = vec![Self::render(&self.app, None)];
        Self::collect(&self.app, "", &mut sections);
        Ok(sections.join(&format!("\n\n{}\n\n", "=".repeat(80))))
    }

    fn collect(cmd: &Command, prefix: &str, sections: &mut Vec<String>) {
        let mut subcommands: Vec<&Command> = cmd
            .get_subcommands()
            .filter(|sub| sub.get_name() != "help")
            .collect();
        subcommands.sort_by(|a, b| a.get_name().cmp(b.get_name()));

        for sub in subcommands {
            let path = if prefix.is_empty() {
                sub.get_name().to_string()
            } else {
                format!("{prefix} {}", sub.get_name())
            };
            sections.push(Self::render(sub, Some(&path)));
            Self::collect(sub, &path, sections);
        }
    }

    fn render(cmd: &Command, path: Option<&str>) -> String {
        let title = path.map_or_else(
            || cmd.get_name().to_string(),
            |path| format!("budget-classify {path}"),
        );
        let about = cmd
            .get_about()
            .map_or_else(|| "No description available".to_string(), ToString::to_string);
        format!("{title} - {about}\n\n{}", cmd.clone().render_help())
    }
}

impl Default for HelpGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpCommand {
    /// Executes the help command.
    pub fn execute(self) -> Result<()> {
        println!("{}", HelpGenerator::new().generate_all_help()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_generator_default() {
        let gen = HelpGenerator::default();
        assert_eq!(gen.app.get_name(), "budget-classify");
    }

    #[test]
    fn generate_all_help_contains_all_commands() {
        let output = HelpGenerator::new().generate_all_help().unwrap();
        for path in [
            "budget-classify classify",
            "budget-classify batch",
            "budget-classify rules",
            "budget-classify rules show",
            "budget-classify rules check",
            "budget-classify help-all",
        ] {
            assert!(output.contains(path), "missing {path}");
        }
    }

    #[test]
    fn generate_all_help_is_sorted_and_deterministic() {
        let first = HelpGenerator::new().generate_all_help().unwrap();
        let second = HelpGenerator::new().generate_all_help().unwrap();
        assert_eq!(first, second);

        let batch = first.find("budget-classify batch -").unwrap();
        let classify = first.find("budget-classify classify -").unwrap();
        let rules = first.find("budget-classify rules -").unwrap();
        assert!(batch < classify && classify < rules);
    }

    #[test]
    fn cli_definition_is_consistent() {
        crate::cli::Cli::command().debug_assert();
    }
}
