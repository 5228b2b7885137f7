use thiserror::Error;

use crate::bus::BusError;

/// Setup and parameter failures the driver cannot continue past.
///
/// Transactional failures (comm errors, device status errors) are not in
/// here on purpose. Those get logged and the loop carries on.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FatalError {
    #[error("failed to open {port}: {source}")]
    Port {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("[ID:{id:03}] sync read registration failed: {source}")]
    Track {
        id: u8,
        #[source]
        source: BusError,
    },
    #[error("[ID:{id:03}] sync write staging failed: {source}")]
    Stage {
        id: u8,
        #[source]
        source: BusError,
    },
    #[error("[ID:{id:03}] present position unavailable: {source}")]
    Read {
        id: u8,
        #[source]
        source: BusError,
    },
}

impl FatalError {
    /// Process exit status, one per fatal class.
    pub fn exit_code(&self) -> i32 {
        match self {
            FatalError::Port { .. } => 2,
            FatalError::Track { .. } | FatalError::Stage { .. } => 3,
            FatalError::Read { .. } => 4,
        }
    }
}
