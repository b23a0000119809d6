// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

//! Scan plan model shared by the sweep logger.
//!
//! A plan is loaded once from a line-oriented text file and never changes
//! afterwards. It is either a discrete list of frequencies or a single
//! `start..=stop` range walked in fixed steps.

mod error;
mod freq;
mod plan;

pub use error::{ConfigError, ParseEntryError};
pub use freq::{Freq, Mode};
pub use plan::{ScanEntry, ScanPlan};

/// Maximum number of valid lines a plan file may contain.
pub const MAX_ENTRIES: usize = 30;

/// Upper bound on the number of positions a range sweep may expand to.
pub const MAX_SWEEP_POSITIONS: usize = 10_000;

/// Lines whose first non-blank character is this are ignored.
pub const COMMENT_MARKER: char = '#';
