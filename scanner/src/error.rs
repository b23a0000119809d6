// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use shared::ConfigError;
use thiserror::Error;

use crate::io::StorageError;

/// Everything that can stop the logger.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error("scan thread failed: {0}")]
    Runtime(String),
}

impl ScanError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScanError::Storage(_) => 3,
            ScanError::Config(_) | ScanError::Logging(_) | ScanError::Runtime(_) => 1,
        }
    }
}
