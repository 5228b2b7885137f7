use std::collections::HashMap;
use std::time::Duration;

use rustypot::{device::xm, DynamixelSerialIO};
use serialport::SerialPort;

use crate::bus::{BusError, SyncBus};
use crate::error::FatalError;

const TIMEOUT_MS: u64 = 100;

/// Staged goal positions for one batched write cycle.
///
/// Entries live for a single control-loop iteration: `take` hands them to
/// the transmitter and leaves the batch empty.
#[derive(Default)]
struct GoalBatch {
    entries: Vec<(u8, i32)>,
}

impl GoalBatch {
    fn stage(&mut self, id: u8, position: i32) -> Result<(), BusError> {
        if self.entries.iter().any(|(staged, _)| *staged == id) {
            return Err(BusError::DuplicateId(id));
        }
        self.entries.push((id, position));
        Ok(())
    }

    fn take(&mut self) -> (Vec<u8>, Vec<i32>) {
        self.entries.drain(..).unzip()
    }
}

/// Bus transport backed by a serial port and the rustypot protocol 2.0 SDK.
///
/// Owns the port handle and the batch accumulators for its whole lifetime.
/// Dropping the bus closes the port.
pub struct SerialBus {
    io: DynamixelSerialIO,
    port: Box<dyn SerialPort>,
    goals: GoalBatch,
    tracked: Vec<u8>,
    latest: HashMap<u8, i32>,
}

impl SerialBus {
    /// Open and configure the serial device. Baud rate is applied as part
    /// of the open, so both setup failures of the port surface here.
    pub fn open(port_name: &str, baud_rate: u32) -> Result<SerialBus, FatalError> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(TIMEOUT_MS))
            .open()
            .map_err(|source| FatalError::Port {
                port: port_name.to_owned(),
                source,
            })?;
        Ok(SerialBus {
            io: DynamixelSerialIO::v2(),
            port,
            goals: GoalBatch::default(),
            tracked: Vec::new(),
            latest: HashMap::new(),
        })
    }
}

impl SyncBus for SerialBus {
    fn set_torque(&mut self, id: u8, enabled: bool) -> Result<(), BusError> {
        xm::write_torque_enable(&self.io, self.port.as_mut(), id, enabled as u8)
            .map_err(|e| BusError::Comm(e.to_string()))
    }

    fn stage_goal(&mut self, id: u8, position: i32) -> Result<(), BusError> {
        self.goals.stage(id, position)
    }

    fn commit_goals(&mut self) -> Result<(), BusError> {
        let (ids, positions) = self.goals.take();
        xm::sync_write_goal_position(&self.io, self.port.as_mut(), &ids, &positions)
            .map_err(|e| BusError::Comm(e.to_string()))
    }

    fn track(&mut self, id: u8) -> Result<(), BusError> {
        if self.tracked.contains(&id) {
            return Err(BusError::DuplicateId(id));
        }
        self.tracked.push(id);
        Ok(())
    }

    fn poll(&mut self) -> Result<(), BusError> {
        let positions = xm::sync_read_present_position(&self.io, self.port.as_mut(), &self.tracked)
            .map_err(|e| BusError::Comm(e.to_string()))?;
        for (id, position) in self.tracked.iter().zip(positions) {
            self.latest.insert(*id, position);
        }
        Ok(())
    }

    fn present_position(&self, id: u8) -> Result<i32, BusError> {
        self.latest
            .get(&id)
            .copied()
            .ok_or(BusError::NotAvailable(id))
    }
}
