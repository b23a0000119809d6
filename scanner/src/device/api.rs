// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::time::Duration;

// THIRD PARTY CRATES
use tokio::sync::watch::Receiver;
use tokio::task::JoinHandle;
use tracing::info;

// LOCAL CRATE
use shared::ScanPlan;

use crate::cli::Cli;
use crate::context::{ScanController, ScanParameters};
use crate::device::{RigControl, RigctldClient, SimulatedRig};
use crate::io::{ResultsSink, StorageError};

/// Build the rig selected on the command line.
pub fn open(args: &Cli) -> Box<dyn RigControl + Send> {
    if args.simulate {
        info!("Using the simulated receiver");
        return Box::new(SimulatedRig::default());
    }

    let mut rig = RigctldClient::new(&args.rig, Duration::from_millis(args.io_timeout_ms));
    rig.prepare(args.tuning_step);
    Box::new(rig)
}

/// Run the scan controller on a dedicated blocking thread until `shutdown`
/// flips to `true` or results can no longer be written.
///
/// `open_rig` runs on that thread too, so a slow connect never stalls the
/// runtime.
pub fn start<F, R, S>(
    args: &Cli,
    plan: ScanPlan,
    open_rig: F,
    sink: S,
    shutdown: Receiver<bool>,
) -> JoinHandle<Result<(), StorageError>>
where
    F: FnOnce() -> R + Send + 'static,
    R: RigControl + 'static,
    S: ResultsSink + Send + 'static,
{
    let params = ScanParameters::new(args);
    tokio::task::spawn_blocking(move || {
        let rig = open_rig();
        ScanController::new(plan, rig, sink, params).run(shutdown)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::CsvResults;
    use clap::Parser;
    use std::thread;
    use tokio::sync::watch;

    #[tokio::test]
    async fn test_rig_is_opened_on_the_scan_thread() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("results.csv");
        let args = Cli::parse_from(["specmon", "--simulate"]);
        let plan = ScanPlan::parse("103,,,0\n").unwrap();
        let (_shutdown_tx, shutdown_rx) = watch::channel(true);

        let caller = thread::current().id();
        let (opened_tx, opened_rx) = std::sync::mpsc::channel();
        let rig_args = args.clone();
        let open_rig = move || {
            opened_tx.send(thread::current().id()).unwrap();
            open(&rig_args)
        };

        start(&args, plan, open_rig, CsvResults::new(&path), shutdown_rx)
            .await
            .unwrap()
            .unwrap();

        assert_ne!(opened_rx.recv().unwrap(), caller);
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "# 103.000000,\n");
    }
}
