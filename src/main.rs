use procfile_extract::cli::{CliArgs, Commands, ExtractArgs, OutputFormat, OutputFormatter};
use procfile_extract::runtime::DockerRuntime;
use procfile_extract::util::logging::{init_logging, parse_level, LoggingConfig};
use procfile_extract::{
    ExtractConfig, ExtractContext, FormationService, ImageRef, LoggingHandler, VERSION,
};

use clap::Parser;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("procfile-extract v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Extract(extract_args) => handle_extract(extract_args).await,
        Commands::Health => handle_health().await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&ExtractConfig::default().log_level)
    };

    let use_json = env::var("PROCFILE_EXTRACT_LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    init_logging(LoggingConfig {
        use_json,
        ..LoggingConfig::with_level(level)
    });
}

/// Cancels in-flight runtime calls on Ctrl-C so the ephemeral container is still removed.
fn cancel_on_ctrl_c() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling extraction");
            let _ = tx.send(true);
        }
    });
    rx
}

async fn handle_extract(args: &ExtractArgs) -> i32 {
    let image: ImageRef = match args.image.parse() {
        Ok(image) => image,
        Err(e) => {
            error!("Invalid image reference: {}", e);
            return 1;
        }
    };

    let mut config = match ExtractConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return 1;
        }
    };
    if let Some(strategies) = &args.strategies {
        config.strategies = strategies.clone();
    }
    if let Some(timeout) = args.timeout {
        config.call_timeout = (timeout > 0).then(|| Duration::from_secs(timeout));
    }
    if let Some(name) = &args.procfile_name {
        config.procfile_name = name.clone();
    }
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return 1;
    }
    debug!("{}", config);

    let runtime = match DockerRuntime::connect() {
        Ok(runtime) => Arc::new(runtime),
        Err(e) => {
            error!("{}", e);
            eprintln!("\nIs the Docker daemon running? Set DOCKER_HOST to use a remote engine.");
            return 1;
        }
    };

    let mut ctx = ExtractContext::new().with_cancellation(cancel_on_ctrl_c());
    if let Some(timeout) = config.call_timeout {
        ctx = ctx.with_timeout(timeout);
    }

    let service = FormationService::with_runtime(runtime, &config);
    let formatter = OutputFormatter::new(OutputFormat::from(args.format));

    if formatter.format() == OutputFormat::Procfile {
        return match service.procfile(&ctx, &image, &LoggingHandler).await {
            Ok(bytes) => {
                print!("{}", String::from_utf8_lossy(&bytes));
                0
            }
            Err(e) => {
                error!("Extraction failed: {}", e);
                1
            }
        };
    }

    let formation = match service.formation(&ctx, &image, &LoggingHandler).await {
        Ok(formation) => formation,
        Err(e) => {
            error!(kind = ?e.kind(), "Extraction failed: {}", e);
            return 1;
        }
    };

    match formatter.format_formation(&formation) {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

async fn handle_health() -> i32 {
    let runtime = match DockerRuntime::connect() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    match runtime.ping().await {
        Ok(()) => {
            println!("Container runtime: available");
            0
        }
        Err(e) => {
            println!("Container runtime: unavailable ({})", e);
            1
        }
    }
}
