//! Formations: the process table derived from a Procfile

use crate::procfile::{CommandSpec, ExtendedProcfile, Procfile, StandardProcfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormationError {
    #[error("invalid command '{command}': {reason}")]
    InvalidCommand { command: String, reason: String },

    #[error("process '{process}' has an empty command")]
    EmptyCommand { process: String },

    #[error("unknown command format for process '{process}'")]
    UnknownCommandFormat { process: String },
}

/// An ordered, non-empty argument vector; the first token is the executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(Vec<String>);

impl Command {
    /// Splits a command line into arguments using POSIX shell quoting rules.
    pub fn parse(line: &str) -> Result<Self, FormationError> {
        let args = shell_words::split(line).map_err(|e| FormationError::InvalidCommand {
            command: line.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(args))
    }

    pub fn executable(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Command {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_words::join(&self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub command: Command,
}

/// Process name to process definition
pub type Formation = BTreeMap<String, Process>;

/// Builds a formation from a parsed Procfile, failing on the first bad process.
pub fn formation_from_procfile(procfile: &Procfile) -> Result<Formation, FormationError> {
    match procfile {
        Procfile::Standard(p) => formation_from_standard(p),
        Procfile::Extended(p) => formation_from_extended(p),
    }
}

fn formation_from_standard(procfile: &StandardProcfile) -> Result<Formation, FormationError> {
    procfile
        .iter()
        .map(|(name, line)| {
            let command = non_empty(name, Command::parse(line)?)?;
            Ok((name.clone(), Process { command }))
        })
        .collect()
}

fn formation_from_extended(procfile: &ExtendedProcfile) -> Result<Formation, FormationError> {
    procfile
        .iter()
        .map(|(name, process)| {
            let command = match &process.command {
                CommandSpec::Line(line) => Command::parse(line)?,
                CommandSpec::Args(args) => Command(args.clone()),
                CommandSpec::Other(_) => {
                    return Err(FormationError::UnknownCommandFormat {
                        process: name.clone(),
                    })
                }
            };
            let command = non_empty(name, command)?;
            Ok((name.clone(), Process { command }))
        })
        .collect()
}

fn non_empty(process: &str, command: Command) -> Result<Command, FormationError> {
    if command.is_empty() {
        return Err(FormationError::EmptyCommand {
            process: process.to_string(),
        });
    }
    Ok(command)
}
