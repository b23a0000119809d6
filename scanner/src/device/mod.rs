// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

mod api;
mod error;
mod rigctld;
mod sim;
mod traits;

pub use api::{open, start};
pub use error::DeviceError;
pub use rigctld::{RigctldClient, DEFAULT_RIGCTLD_ADDR};
pub use sim::SimulatedRig;
pub use traits::RigControl;
