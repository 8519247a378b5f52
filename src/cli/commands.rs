use crate::config::{ConfigError, Strategy};
use clap::{Parser, Subcommand, ValueEnum};

/// Discover the processes a container image declares
#[derive(Parser, Debug)]
#[command(
    name = "procfile-extract",
    about = "Discover the processes a container image declares",
    version,
    long_about = "procfile-extract finds the Procfile of a container image, either by reading \
                  it from the image's working directory or by falling back to the image's \
                  default command, and prints the resulting process formation."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Extract the process formation of an image",
        long_about = "Creates a throwaway container from the image to read its Procfile, \
                      falling back to the image's CMD as a single web process.\n\n\
                      Examples:\n  \
                      procfile-extract extract acme/web:latest\n  \
                      procfile-extract extract acme/web:latest --format json\n  \
                      procfile-extract extract acme/web:latest --strategies cmd"
    )]
    Extract(ExtractArgs),

    #[command(about = "Check that the container runtime is reachable")]
    Health,
}

#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(value_name = "IMAGE", help = "Image reference, e.g. acme/web:latest")]
    pub image: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Timeout for each container runtime call (0 disables)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        long,
        value_name = "LIST",
        value_delimiter = ',',
        value_parser = parse_strategy,
        help = "Comma separated extractor order, e.g. file,cmd"
    )]
    pub strategies: Option<Vec<Strategy>>,

    #[arg(long, value_name = "NAME", help = "Procfile name to look for")]
    pub procfile_name: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
    /// The raw Procfile as found in (or synthesized for) the image
    Procfile,
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    s.parse().map_err(|e: ConfigError| e.to_string())
}
