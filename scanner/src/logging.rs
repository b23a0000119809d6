// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use std::path::Path;
use tracing_subscriber::{
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};
use tracing_appender::rolling::daily;
use crate::cli::Cli;

/// Initialize the tracing subscriber with multiple output layers
pub fn init_logging(args: &Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Only the loader and the scanner log anything worth keeping
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("specmon={0},shared={0}", args.log_level))
    });

    // Console layer - human-readable output to stderr
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_names(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter.clone());

    let registry = tracing_subscriber::registry();

    if args.log_to_file {
        let log_dir = Path::new(&args.log_dir);
        std::fs::create_dir_all(log_dir)?;

        // File layer - human-readable output to rolling files
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_names(true)
            .with_line_number(true)
            .with_writer(daily(log_dir, "specmon.log"))
            .with_filter(env_filter.clone());

        // JSON layer - structured JSON output to rolling files
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_names(true)
            .with_writer(daily(log_dir, "specmon.json"))
            .with_filter(env_filter);

        registry
            .with(console_layer)
            .with(file_layer)
            .with(json_layer)
            .try_init()?;
    } else {
        registry.with(console_layer).try_init()?;
    }

    tracing::info!("Logging initialized with level: {}", args.log_level);
    if args.log_to_file {
        tracing::info!("Log files will be written to: {}", args.log_dir);
    }

    Ok(())
}
