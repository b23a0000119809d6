// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use std::time::Duration;

use tracing::info;

use crate::cli::Cli;

/// Pause after any failed device call.
pub(crate) const DEFAULT_BACKOFF_MS: u64 = 100;

/// The AR8600 reports a noise floor around -51; adding this makes typical
/// readings positive in the results file.
pub(crate) const DEFAULT_SIGNAL_OFFSET: i32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanParameters {
    pub backoff: Duration,
    pub signal_offset: i32,
}

impl ScanParameters {
    pub fn new(args: &Cli) -> Self {
        let params = Self {
            backoff: Duration::from_millis(args.backoff_ms),
            signal_offset: args.signal_offset,
        };
        info!(
            "Device error backoff: {}ms, signal offset: {}",
            args.backoff_ms, args.signal_offset
        );
        params
    }
}

impl Default for ScanParameters {
    fn default() -> Self {
        Self {
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
            signal_offset: DEFAULT_SIGNAL_OFFSET,
        }
    }
}
