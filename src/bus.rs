use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BusError {
    #[error("bus transaction failed: {0}")]
    Comm(String),
    #[error("[ID:{0:03}] already registered")]
    DuplicateId(u8),
    #[error("[ID:{0:03}] present position not available")]
    NotAvailable(u8),
}

/// Contract the sweep driver consumes from the bus SDK.
///
/// One implementor talks to real hardware ([`SerialBus`](crate::SerialBus)),
/// tests substitute mocks. Batched operations follow the stage/commit shape
/// of the underlying group transactions: goals are accumulated per device and
/// flushed as a single bus cycle, present positions are read for every
/// tracked device in one combined cycle.
pub trait SyncBus {
    /// Write the torque-enable register of a single servo.
    fn set_torque(&mut self, id: u8, enabled: bool) -> Result<(), BusError>;

    /// Accumulate one servo's goal position into the pending batched write.
    /// Rejects a device id that is already staged.
    fn stage_goal(&mut self, id: u8, position: i32) -> Result<(), BusError>;

    /// Transmit all staged goal positions as one bus cycle. The staging
    /// buffer is cleared whether or not the transmission succeeds.
    fn commit_goals(&mut self) -> Result<(), BusError>;

    /// Register a servo with the batched reader. Done once per device,
    /// before the first [`poll`](SyncBus::poll).
    fn track(&mut self, id: u8) -> Result<(), BusError>;

    /// Perform one combined read cycle for every tracked servo.
    fn poll(&mut self) -> Result<(), BusError>;

    /// Present position reported by the last successful poll.
    fn present_position(&self, id: u8) -> Result<i32, BusError>;
}
