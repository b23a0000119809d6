// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

use shared::{Freq, Mode};

use crate::device::DeviceError;

/// Control surface of a receiver, as consumed by the scan controller.
///
/// Every call is synchronous and may block for a whole device transaction.
pub trait RigControl {
    fn tune(&mut self, freq: Freq) -> Result<(), DeviceError>;

    fn set_mode(&mut self, mode: Mode) -> Result<(), DeviceError>;

    /// Signal strength in the driver's native units.
    fn measure_strength(&mut self) -> Result<i32, DeviceError>;
}

impl<T: RigControl + ?Sized> RigControl for Box<T> {
    fn tune(&mut self, freq: Freq) -> Result<(), DeviceError> {
        (**self).tune(freq)
    }

    fn set_mode(&mut self, mode: Mode) -> Result<(), DeviceError> {
        (**self).set_mode(mode)
    }

    fn measure_strength(&mut self) -> Result<i32, DeviceError> {
        (**self).measure_strength()
    }
}
