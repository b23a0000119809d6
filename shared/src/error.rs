// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use std::path::PathBuf;

use thiserror::Error;

use crate::Freq;

/// Fatal problems with the scan plan. Raised before any device interaction.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("can't open config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file frequency list too long (more than {max} entries)")]
    TooManyEntries { max: usize },

    #[error("line {line}: minimum frequency {start} cannot be greater than maximum frequency {stop}")]
    InvalidRange { line: usize, start: Freq, stop: Freq },

    #[error("line {line}: a range entry needs a step greater than zero")]
    InvalidStep { line: usize },

    #[error("range sweep expands to {positions} positions, at most {max} are allowed")]
    TooManyPositions { positions: usize, max: usize },

    #[error("config contains no usable frequencies")]
    Empty,
}

/// A single line that could not be read as an entry. These are reported and
/// skipped, never fatal.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseEntryError {
    #[error("expected 4 comma separated fields, found {0}")]
    FieldCount(usize),

    #[error("missing start frequency")]
    MissingStart,

    #[error("invalid frequency {0:?}")]
    Frequency(String),

    #[error("invalid mode {0:?}, expected 0 (nbfm) or 1 (wbfm)")]
    Mode(String),
}
