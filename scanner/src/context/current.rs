// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use shared::{Freq, Mode};

/// The last frequency and mode issued to the rig.
///
/// Used to suppress redundant commands. A command counts as issued once it
/// has been attempted, whether or not the rig accepted it; nothing is read
/// back from the device.
#[derive(Debug, Default)]
pub struct CommandState {
    freq: Option<Freq>,
    mode: Option<Mode>,
}

impl CommandState {
    /// Record `freq` as issued. Returns `false` if it already was.
    pub fn issue_freq(&mut self, freq: Freq) -> bool {
        self.freq.replace(freq) != Some(freq)
    }

    /// Record `mode` as issued. Returns `false` if it already was.
    pub fn issue_mode(&mut self, mode: Mode) -> bool {
        self.mode.replace(mode) != Some(mode)
    }
}
