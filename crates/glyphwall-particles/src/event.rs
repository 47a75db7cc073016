//! Events the wall reports to its host

use glam::Vec2;

use crate::mode::Mode;

#[derive(Clone, Debug, PartialEq)]
pub enum WallEvent {
    ModeChanged { from: Mode, to: Mode },
    /// A press outlasted the arm delay
    HeldEntered { mode: Mode, anchor: Vec2 },
    HeldReleased { mode: Mode },
    /// A release (or ring boost expiry) started a one-shot decay effect
    WindowStarted { mode: Mode, duration_ms: f64 },
    WindowEnded { mode: Mode },
    LatticeRebuilt { count: usize },
    /// Surface too small; the previous particle list was kept
    LatticeSkipped { width: f32, height: f32 },
    TornDown,
}

impl WallEvent {
    /// Short label for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            WallEvent::ModeChanged { .. } => "mode-changed",
            WallEvent::HeldEntered { .. } => "held-entered",
            WallEvent::HeldReleased { .. } => "held-released",
            WallEvent::WindowStarted { .. } => "window-started",
            WallEvent::WindowEnded { .. } => "window-ended",
            WallEvent::LatticeRebuilt { .. } => "lattice-rebuilt",
            WallEvent::LatticeSkipped { .. } => "lattice-skipped",
            WallEvent::TornDown => "torn-down",
        }
    }
}
