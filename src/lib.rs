mod bus;
mod driver;
mod error;
mod keys;
mod serial_bus;

pub use bus::{BusError, SyncBus};
pub use driver::{SweepConfig, SweepDriver};
pub use error::FatalError;
pub use keys::{Key, KeyInput, StdinKeys};
pub use serial_bus::SerialBus;
