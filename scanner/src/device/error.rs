// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use std::io;

use thiserror::Error;

/// Failure of a single device transaction. Never fatal to the scan loop.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("timed out waiting for the rig")]
    Timeout,

    #[error("bad response from rig: {0:?}")]
    BadResponse(String),

    #[error("rig rejected command (RPRT {0})")]
    Rejected(i32),

    #[error("rig not present: {0}")]
    NotPresent(String),

    #[error("rig i/o error: {0}")]
    Io(io::Error),
}

impl DeviceError {
    /// Whether the link to the rig should be torn down and re-established.
    pub fn breaks_link(&self) -> bool {
        matches!(
            self,
            DeviceError::Timeout | DeviceError::NotPresent(_) | DeviceError::Io(_)
        )
    }
}

impl From<io::Error> for DeviceError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => DeviceError::Timeout,
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::NotFound
            | io::ErrorKind::UnexpectedEof => DeviceError::NotPresent(e.to_string()),
            _ => DeviceError::Io(e),
        }
    }
}
