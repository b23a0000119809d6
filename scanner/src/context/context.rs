// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::thread::sleep;

// THIRD PARTY CRATES
use chrono::Local;
use tokio::sync::watch::Receiver;
use tracing::{debug, error, info, warn};

// LOCAL CRATE
use shared::ScanPlan;

use crate::context::{Advance, CommandState, SampleBuffer, ScanManager, ScanParameters, Target};
use crate::device::RigControl;
use crate::io::{ResultsSink, StorageError};

/// Drives the rig through the plan and hands each completed sweep to the sink.
///
/// Owns every piece of mutable scan state: the position in the plan, the last
/// issued commands and the per-position sample buffer. Device errors are
/// logged and absorbed; only storage errors escape.
pub struct ScanController<R, S> {
    scan: ScanManager,
    current: CommandState,
    store: SampleBuffer,
    params: ScanParameters,
    header_written: bool,
    rig: R,
    sink: S,
}

impl<R: RigControl, S: ResultsSink> ScanController<R, S> {
    pub fn new(plan: ScanPlan, rig: R, sink: S, params: ScanParameters) -> Self {
        let store = SampleBuffer::new(plan.len());
        debug!("Sample buffer sized for {} positions", store.len());
        Self {
            scan: ScanManager::new(plan),
            current: CommandState::default(),
            store,
            params,
            header_written: false,
            rig,
            sink,
        }
    }

    /// Write the results header. Only the first call writes anything.
    pub fn start(&mut self) -> Result<(), StorageError> {
        if self.header_written {
            return Ok(());
        }
        self.sink.write_header(&self.scan.plan().frequencies())?;
        self.header_written = true;
        Ok(())
    }

    /// Step until `shutdown` flips to `true`.
    ///
    /// The flag is only checked between steps so an in-flight device call
    /// always completes. A partially collected sweep is discarded.
    pub fn run(&mut self, shutdown: Receiver<bool>) -> Result<(), StorageError> {
        self.start()?;
        info!("Scanning {} positions", self.store.len());
        while !*shutdown.borrow() {
            self.step()?;
        }
        info!(sweeps = self.sweeps_completed(), "Scan stopped");
        Ok(())
    }

    /// One iteration: advance, tune, set mode, measure.
    pub fn step(&mut self) -> Result<Target, StorageError> {
        let Advance {
            target,
            sweep_complete,
        } = self.scan.next();
        if sweep_complete {
            self.finish_sweep()?;
        }

        if self.current.issue_freq(target.freq) {
            debug!(position = target.position, "main: frequency: {}", *target.freq);
            if let Err(e) = self.rig.tune(target.freq) {
                warn!(
                    position = target.position,
                    freq = *target.freq,
                    "rig_set_freq: error = {e}"
                );
                self.backoff();
            }
        }

        if self.current.issue_mode(target.mode) {
            debug!(position = target.position, "main: mode: {}", target.mode);
            if let Err(e) = self.rig.set_mode(target.mode) {
                warn!(
                    position = target.position,
                    mode = %target.mode,
                    "rig_set_mode: error = {e}"
                );
                self.backoff();
            }
        }

        self.measure(target);
        Ok(target)
    }

    /// Measure once, retrying a single time after the backoff. If both
    /// attempts fail the slot keeps its previous value.
    fn measure(&mut self, target: Target) {
        let reading = match self.rig.measure_strength() {
            Ok(strength) => Ok(strength),
            Err(e) => {
                warn!(
                    position = target.position,
                    freq = *target.freq,
                    "rig_get_strength: error = {e}"
                );
                self.backoff();
                self.rig.measure_strength()
            }
        };

        match reading {
            Ok(strength) => self.store.record(target.position, strength),
            Err(e) => {
                error!(
                    position = target.position,
                    freq = *target.freq,
                    "2nd rig_get_strength: error = {e}; keeping previous sample"
                );
                self.backoff();
            }
        }
    }

    fn finish_sweep(&mut self) -> Result<(), StorageError> {
        self.start()?;
        let row = self.store.row(self.params.signal_offset);
        self.sink.write_row(Local::now(), &row)?;
        info!(sweep = self.sweeps_completed(), "Sweep complete, wrote {} values", row.len());
        Ok(())
    }

    fn backoff(&self) {
        if !self.params.backoff.is_zero() {
            sleep(self.params.backoff);
        }
    }

    pub fn sweeps_completed(&self) -> usize {
        self.scan.cycles_completed
    }
}
