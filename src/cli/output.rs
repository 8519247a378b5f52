//! Output formatting for extracted formations

use super::commands::OutputFormatArg;
use crate::formation::Formation;
use anyhow::{Context, Result};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// One `name: command` line per process
    Human,
    /// The Procfile bytes exactly as extracted
    Procfile,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Procfile => OutputFormat::Procfile,
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn format_formation(&self, formation: &Formation) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(formation).context("Failed to serialize to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(formation).context("Failed to serialize to YAML")
            }
            OutputFormat::Human | OutputFormat::Procfile => Ok(self.format_human(formation)),
        }
    }

    fn format_human(&self, formation: &Formation) -> String {
        if formation.is_empty() {
            return "No processes declared\n".to_string();
        }

        let width = formation.keys().map(String::len).max().unwrap_or(0);
        formation
            .iter()
            .map(|(name, process)| format!("{:width$}  {}\n", name, process.command, width = width))
            .collect()
    }
}
