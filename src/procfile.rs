//! Procfile model and codec
//!
//! Two shapes are recognised:
//!
//! - **Standard**: one `name: command` pair per line, as popularised by Heroku.
//! - **Extended**: a YAML mapping of process name to a descriptor whose
//!   `command` is either a single string or a list of arguments.
//!
//! ```text
//! web:
//!   command:
//!   - /go/bin/app
//!   - server
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Default file name looked up inside images
pub const PROCFILE_NAME: &str = "Procfile";

#[derive(Debug, Error)]
pub enum ProcfileError {
    /// The document parsed but is neither a Standard nor an Extended Procfile
    #[error("unknown Procfile format")]
    UnknownFormat,

    #[error("Procfile is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("invalid Procfile: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Command field of an extended process descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Line(String),
    Args(Vec<String>),
    /// Any other YAML value; rejected when building a formation
    Other(serde_yaml::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    pub command: CommandSpec,
}

impl ProcessDescriptor {
    pub fn args(args: Vec<String>) -> Self {
        Self {
            command: CommandSpec::Args(args),
        }
    }

    pub fn line(line: impl Into<String>) -> Self {
        Self {
            command: CommandSpec::Line(line.into()),
        }
    }
}

pub type StandardProcfile = BTreeMap<String, String>;
pub type ExtendedProcfile = BTreeMap<String, ProcessDescriptor>;

#[derive(Debug, Clone, PartialEq)]
pub enum Procfile {
    Standard(StandardProcfile),
    Extended(ExtendedProcfile),
}

impl Procfile {
    pub fn process_names(&self) -> Vec<&str> {
        match self {
            Procfile::Standard(p) => p.keys().map(String::as_str).collect(),
            Procfile::Extended(p) => p.keys().map(String::as_str).collect(),
        }
    }
}

fn standard_line() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_.-]+):\s*(.+)$").expect("Procfile line pattern is valid")
    })
}

/// Parses raw Procfile bytes into one of the two known shapes.
pub fn parse(bytes: &[u8]) -> Result<Procfile, ProcfileError> {
    let text = std::str::from_utf8(bytes)?;

    let document: serde_yaml::Value = match serde_yaml::from_str(text) {
        Ok(value) => value,
        // Heroku-style files are not always valid YAML (e.g. `web: echo a: b`).
        Err(_) => return parse_standard(text),
    };

    let mapping = match document {
        serde_yaml::Value::Mapping(mapping) if !mapping.is_empty() => mapping,
        _ => return Err(ProcfileError::UnknownFormat),
    };

    if mapping.values().all(is_scalar) {
        parse_standard(text)
    } else if mapping.values().all(serde_yaml::Value::is_mapping) {
        let extended: ExtendedProcfile =
            serde_yaml::from_value(serde_yaml::Value::Mapping(mapping))?;
        Ok(Procfile::Extended(extended))
    } else {
        Err(ProcfileError::UnknownFormat)
    }
}

fn is_scalar(value: &serde_yaml::Value) -> bool {
    matches!(
        value,
        serde_yaml::Value::String(_)
            | serde_yaml::Value::Number(_)
            | serde_yaml::Value::Bool(_)
            | serde_yaml::Value::Null
    )
}

fn parse_standard(text: &str) -> Result<Procfile, ProcfileError> {
    let processes: StandardProcfile = text
        .lines()
        .filter_map(|line| standard_line().captures(line.trim_end()))
        .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()))
        .collect();

    if processes.is_empty() {
        return Err(ProcfileError::UnknownFormat);
    }
    Ok(Procfile::Standard(processes))
}

/// Encodes a Procfile in the form [`parse`] reads back.
pub fn marshal(procfile: &Procfile) -> Result<Vec<u8>, ProcfileError> {
    let text = match procfile {
        Procfile::Standard(processes) => processes
            .iter()
            .map(|(name, command)| format!("{}: {}\n", name, command))
            .collect(),
        Procfile::Extended(processes) => serde_yaml::to_string(processes)?,
    };
    Ok(text.into_bytes())
}
