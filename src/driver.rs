use tracing::{info, warn};

use crate::bus::SyncBus;
use crate::error::FatalError;
use crate::keys::{Key, KeyInput};

#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub ids: Vec<u8>,
    pub min_position: i32,
    pub max_position: i32,
    pub settle_threshold: i32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            ids: vec![3, 4],
            min_position: 0,
            max_position: 1023,
            settle_threshold: 20,
        }
    }
}

/// Sweeps a group of servos between two goal positions.
///
/// Each key event commands the next extreme to every servo in one batched
/// write, then polls the batched reader until all of them report a present
/// position within the settle threshold. Torque is enabled up front and
/// released on every exit path, fatal ones included.
pub struct SweepDriver<B: SyncBus> {
    bus: B,
    config: SweepConfig,
    at_max: bool,
    torque_engaged: bool,
}

impl<B: SyncBus> SweepDriver<B> {
    pub fn new(bus: B, config: SweepConfig) -> SweepDriver<B> {
        SweepDriver {
            bus,
            config,
            at_max: false,
            torque_engaged: false,
        }
    }

    pub fn run(&mut self, keys: &mut dyn KeyInput) -> Result<(), FatalError> {
        self.engage_torque();
        let outcome = self
            .register_readers()
            .and_then(|()| self.sweep(keys));
        self.release_torque();
        outcome
    }

    fn engage_torque(&mut self) {
        for &id in &self.config.ids {
            match self.bus.set_torque(id, true) {
                Ok(()) => info!("[ID:{id:03}] connected"),
                Err(e) => warn!("[ID:{id:03}] torque enable failed: {e}"),
            }
        }
        self.torque_engaged = true;
    }

    fn register_readers(&mut self) -> Result<(), FatalError> {
        for &id in &self.config.ids {
            self.bus
                .track(id)
                .map_err(|source| FatalError::Track { id, source })?;
        }
        Ok(())
    }

    fn sweep(&mut self, keys: &mut dyn KeyInput) -> Result<(), FatalError> {
        loop {
            if keys.wait_key() == Key::Quit {
                return Ok(());
            }
            let goal = self.advance_goal();
            self.command(goal)?;
            self.wait_for_settle(goal)?;
        }
    }

    /// Next commanded goal, toggling between the two extremes. The first
    /// advance always commands the minimum.
    fn advance_goal(&mut self) -> i32 {
        let goal = if self.at_max {
            self.config.max_position
        } else {
            self.config.min_position
        };
        self.at_max = !self.at_max;
        goal
    }

    /// Stage the goal for every servo and flush the batch in one bus cycle.
    /// A staging rejection aborts before anything is transmitted; a failed
    /// transmission is logged and the loop keeps going.
    fn command(&mut self, goal: i32) -> Result<(), FatalError> {
        for &id in &self.config.ids {
            self.bus
                .stage_goal(id, goal)
                .map_err(|source| FatalError::Stage { id, source })?;
        }
        if let Err(e) = self.bus.commit_goals() {
            warn!("sync write failed: {e}");
        }
        Ok(())
    }

    /// Poll present positions until every servo is within the threshold of
    /// the goal. Blocks until convergence; there is no timeout.
    fn wait_for_settle(&mut self, goal: i32) -> Result<(), FatalError> {
        loop {
            if let Err(e) = self.bus.poll() {
                warn!("sync read failed: {e}");
            }
            let mut settled = true;
            for &id in &self.config.ids {
                let present = self
                    .bus
                    .present_position(id)
                    .map_err(|source| FatalError::Read { id, source })?;
                info!("[ID:{id:03}] GoalPos:{goal}  PresPos:{present}");
                if (goal - present).abs() > self.config.settle_threshold {
                    settled = false;
                }
            }
            if settled {
                return Ok(());
            }
        }
    }

    fn release_torque(&mut self) {
        if !self.torque_engaged {
            return;
        }
        for &id in &self.config.ids {
            if let Err(e) = self.bus.set_torque(id, false) {
                warn!("[ID:{id:03}] torque disable failed: {e}");
            }
        }
        self.torque_engaged = false;
    }
}

impl<B: SyncBus> Drop for SweepDriver<B> {
    fn drop(&mut self) {
        self.release_torque();
    }
}
