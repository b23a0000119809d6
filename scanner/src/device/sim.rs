// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use shared::{Freq, Mode};
use tracing::debug;

use crate::device::{DeviceError, RigControl};

/// Noise floor reported with nothing on frequency.
const NOISE_FLOOR: i32 = -51;

/// A carrier heard by the simulated receiver.
#[derive(Debug, Clone, Copy)]
pub struct Carrier {
    pub freq: Freq,
    pub strength: i32,
}

/// Deterministic stand-in for a real receiver, for dry runs without hardware.
pub struct SimulatedRig {
    freq: Freq,
    mode: Mode,
    carriers: Vec<Carrier>,
}

impl SimulatedRig {
    pub fn new(carriers: Vec<Carrier>) -> Self {
        Self {
            freq: Freq::default(),
            mode: Mode::default(),
            carriers,
        }
    }

    fn bandwidth(&self) -> u64 {
        match self.mode {
            Mode::NarrowFm => 12_500,
            Mode::WideFm => 200_000,
        }
    }
}

impl Default for SimulatedRig {
    fn default() -> Self {
        Self::new(vec![
            Carrier {
                freq: Freq::new(88_500_000),
                strength: -12,
            },
            Carrier {
                freq: Freq::new(103_000_000),
                strength: -5,
            },
            Carrier {
                freq: Freq::new(165_937_500),
                strength: -25,
            },
            Carrier {
                freq: Freq::new(456_125_000),
                strength: -30,
            },
        ])
    }
}

impl RigControl for SimulatedRig {
    fn tune(&mut self, freq: Freq) -> Result<(), DeviceError> {
        debug!("sim: tuned to {freq} MHz");
        self.freq = freq;
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) -> Result<(), DeviceError> {
        debug!("sim: mode {mode}");
        self.mode = mode;
        Ok(())
    }

    fn measure_strength(&mut self) -> Result<i32, DeviceError> {
        let half_bw = self.bandwidth() / 2;
        // Small fixed ripple so the floor is not perfectly flat.
        let ripple = ((*self.freq / 1_000) % 5) as i32 - 2;
        let strongest = self
            .carriers
            .iter()
            .filter(|c| c.freq.abs_diff(*self.freq) <= half_bw)
            .map(|c| c.strength)
            .max();
        Ok(strongest.unwrap_or(NOISE_FLOOR + ripple))
    }
}
