pub mod commands;
pub mod output;

pub use commands::{CliArgs, Commands, ExtractArgs};
pub use output::{OutputFormat, OutputFormatter};
