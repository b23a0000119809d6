// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC
mod context;
mod current;
mod params;
mod scan;
mod store;

pub(crate) use context::ScanController;
pub(crate) use current::CommandState;
pub(crate) use params::{ScanParameters, DEFAULT_BACKOFF_MS, DEFAULT_SIGNAL_OFFSET};
pub(crate) use scan::{Advance, ScanManager, Target};
pub(crate) use store::SampleBuffer;
