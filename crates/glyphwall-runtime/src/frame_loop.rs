//! The per-refresh frame callback

use glyphwall_core::Result;
use tracing::debug;

use crate::clock::{FrameTime, SimClock};
use crate::system::FrameSystem;

/// Drives one `FrameSystem` once per display refresh.
///
/// The callback is the only scheduling unit: each `tick` consumes the armed
/// request, runs exactly one frame, and re-arms for the next refresh unless the
/// loop was cancelled in the meantime.
#[derive(Debug, Default)]
pub struct FrameLoop {
    clock: SimClock,
    armed: bool,
    started: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize the system and arm the first frame
    pub fn start<S: FrameSystem + ?Sized>(&mut self, system: &mut S) -> Result<()> {
        if self.started {
            return Ok(());
        }
        system.initialize()?;
        self.started = true;
        self.armed = true;
        debug!(system = system.name(), "frame loop started");
        Ok(())
    }

    /// Run one frame if armed. Returns the frame time when a frame ran.
    pub fn tick<S: FrameSystem + ?Sized>(
        &mut self,
        now_ms: f64,
        system: &mut S,
        surface: &mut S::Surface,
    ) -> Result<Option<FrameTime>> {
        if !self.armed {
            return Ok(None);
        }
        self.armed = false;

        let time = self.clock.tick(now_ms);
        system.frame(&time, surface)?;

        // Re-arm for the next refresh
        self.armed = self.started;
        Ok(Some(time))
    }

    /// Cancel the pending frame and shut the system down
    pub fn cancel<S: FrameSystem + ?Sized>(&mut self, system: &mut S) -> Result<()> {
        if !self.started {
            return Ok(());
        }
        self.armed = false;
        self.started = false;
        debug!(system = system.name(), frames = self.clock.frame(), "frame loop cancelled");
        system.shutdown()
    }

    pub fn is_running(&self) -> bool {
        self.started
    }

    pub fn frames(&self) -> u64 {
        self.clock.frame()
    }
}
