//! Simulation clock driven by host-supplied timestamps

/// Frame period the simulation is tuned for (60Hz)
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

/// Longest delta a single frame may report (e.g. after a backgrounded tab)
const MAX_DELTA_MS: f64 = 250.0;

/// Time values threaded through every update call of one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Host timestamp in milliseconds
    pub now_ms: f64,
    /// Time since the previous frame in milliseconds (clamped)
    pub delta_ms: f64,
    /// Frames advanced since the clock started
    pub frame: u64,
}

impl FrameTime {
    pub fn new(now_ms: f64, frame: u64) -> Self {
        Self {
            now_ms,
            delta_ms: 0.0,
            frame,
        }
    }

    /// Simulation time in seconds, used by oscillating fields
    pub fn seconds(&self) -> f32 {
        (self.now_ms / 1000.0) as f32
    }
}

/// Tracks frame count and deltas from timestamps the host passes in.
///
/// The clock never reads wall time itself; a browser host passes its refresh
/// timestamp, tests pass synthetic values.
#[derive(Debug, Default)]
pub struct SimClock {
    /// Timestamp of the last tick
    last_ms: Option<f64>,
    /// Frames ticked so far
    frame: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock. Call once per frame.
    pub fn tick(&mut self, now_ms: f64) -> FrameTime {
        let delta_ms = match self.last_ms {
            // First tick reports zero delta
            None => 0.0,
            Some(last) => (now_ms - last).clamp(0.0, MAX_DELTA_MS),
        };
        self.last_ms = Some(now_ms);
        self.frame += 1;

        FrameTime {
            now_ms,
            delta_ms,
            frame: self.frame,
        }
    }

    /// Frames ticked so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Timestamp of the most recent tick, if any
    pub fn last_ms(&self) -> Option<f64> {
        self.last_ms
    }
}
