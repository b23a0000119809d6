use clap::Parser;

use crate::context::{DEFAULT_BACKOFF_MS, DEFAULT_SIGNAL_OFFSET};
use crate::device::DEFAULT_RIGCTLD_ADDR;

#[derive(Parser, Debug, Clone)]
#[clap(name = "specmon", about = "Sweep a receiver through a scan plan and log signal strength")]
pub struct Cli {
    // ── Files ──────────────────────────────────────────────────────
    /// Scan plan: one `start,stop,step,mode` line per entry (MHz, mode 0=nbfm 1=wbfm)
    #[arg(long, default_value = "/media/USB1/config.txt", help_heading = "Files")]
    pub config: String,

    /// Results file, appended to
    #[arg(long, default_value = "/media/USB1/results.csv", help_heading = "Files")]
    pub results: String,

    // ── Rig ────────────────────────────────────────────────────────
    /// Address of the hamlib rigctld daemon controlling the receiver
    #[arg(long, default_value = DEFAULT_RIGCTLD_ADDR, conflicts_with = "simulate", help_heading = "Rig")]
    pub rig: String,

    /// Use the built-in simulated receiver instead of a real rig
    #[arg(long, action, help_heading = "Rig")]
    pub simulate: bool,

    /// Timeout for a single rig transaction in milliseconds
    #[arg(long, default_value = "2000", help_heading = "Rig")]
    pub io_timeout_ms: u64,

    /// Tuning step in Hz, pushed to the rig once at startup
    #[arg(long, default_value = "6250", help_heading = "Rig")]
    pub tuning_step: u64,

    // ── Scanning ───────────────────────────────────────────────────
    /// Pause after a failed rig command in milliseconds
    #[arg(long, default_value_t = DEFAULT_BACKOFF_MS, help_heading = "Scanning")]
    pub backoff_ms: u64,

    /// Constant added to every reading written to the results file
    #[arg(long, default_value_t = DEFAULT_SIGNAL_OFFSET, allow_negative_numbers = true, help_heading = "Scanning")]
    pub signal_offset: i32,

    // ── Logging ────────────────────────────────────────────────────
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", help_heading = "Logging")]
    pub log_level: String,

    /// Directory for log files
    #[arg(long, default_value = "./logs", help_heading = "Logging")]
    pub log_dir: String,

    /// Enable file logging (console logging always enabled)
    #[arg(long, action, help_heading = "Logging")]
    pub log_to_file: bool,
}
