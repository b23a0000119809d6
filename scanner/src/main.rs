// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

mod cli;
mod context;
mod device;
mod error;
mod io;
mod logging;

// STD LIB
use std::process::ExitCode;

// THIRD PARTY CRATES
use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

// LOCAL CRATES
use shared::ScanPlan;

use crate::{cli::Cli, error::ScanError, io::CsvResults};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = Cli::parse();

    if let Err(e) = logging::init_logging(&args) {
        let e = ScanError::Logging(e.to_string());
        eprintln!("{e}");
        return ExitCode::from(e.exit_code());
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: Cli) -> Result<(), ScanError> {
    info!("Frequency Scanning and logging software");
    info!("Version {VERSION}");

    // Configuration problems are fatal before the rig is touched.
    let plan = ScanPlan::load(&args.config)?;
    let sink = CsvResults::new(&args.results);
    info!("Results will be appended to {}", sink.path().display());

    // Flipped to true once on Ctrl-C / SIGTERM; checked between scan steps.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let rig_args = args.clone();
    let mut scan = device::start(
        &args,
        plan,
        move || device::open(&rig_args),
        sink,
        shutdown_rx,
    );

    let result = tokio::select! {
        result = &mut scan => result,
        _ = shutdown_signal() => {
            info!("Shutdown requested, finishing the current step");
            if shutdown_tx.send(true).is_err() {
                warn!("Scan thread already stopped");
            }
            scan.await
        }
    };

    result.map_err(|e| ScanError::Runtime(e.to_string()))??;
    info!("Scanner stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
