//! Output rendering and formatting

use console::{Style, Term};
use serde::Serialize;
use std::io;
use std::path::PathBuf;

/// Result of a successful command, rendered on stdout
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandResult {
    Status {
        installed: bool,
        alias: PathBuf,
        target: PathBuf,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Installed {
        alias: PathBuf,
        target: PathBuf,
    },
    Located {
        bundle: PathBuf,
    },
    Started {
        bundle: PathBuf,
    },
}

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    json_output: bool,
    colors_enabled: bool,
    term: Term,
}

impl OutputRenderer {
    pub fn new(json_output: bool, colors_enabled: bool) -> Self {
        Self {
            json_output,
            colors_enabled,
            term: Term::stdout(),
        }
    }

    /// Render command result
    pub fn render_result(&self, result: &CommandResult) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
            self.term.write_line(&json)
        } else {
            for line in self.text_lines(result) {
                self.term.write_line(&line)?;
            }
            Ok(())
        }
    }

    fn text_lines(&self, result: &CommandResult) -> Vec<String> {
        match result {
            CommandResult::Status {
                installed,
                alias,
                target,
                reason,
            } => {
                let headline = if *installed {
                    self.styled(Style::new().green().bold(), "installed")
                } else {
                    let text = match reason {
                        Some(reason) => format!("not installed ({reason})"),
                        None => "not installed".to_string(),
                    };
                    self.styled(Style::new().yellow().bold(), &text)
                };
                vec![
                    headline,
                    format!("  alias:  {}", alias.display()),
                    format!("  target: {}", target.display()),
                ]
            }
            CommandResult::Installed { alias, target } => vec![format!(
                "{} {} -> {}",
                self.styled(Style::new().green(), "Installed"),
                alias.display(),
                target.display()
            )],
            CommandResult::Located { bundle } => vec![bundle.display().to_string()],
            CommandResult::Started { bundle } => vec![format!(
                "{} {}",
                self.styled(Style::new().green(), "Opened"),
                bundle.display()
            )],
        }
    }

    fn styled(&self, style: Style, text: &str) -> String {
        if self.colors_enabled {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}
