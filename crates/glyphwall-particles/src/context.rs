//! Per-view simulation state

use glam::Vec2;
use glyphwall_runtime::{EventBus, PointerState, TimerTable};

use crate::effects::{PulsePool, RipplePool, TrailPool};
use crate::event::WallEvent;
use crate::lattice::LatticeFrame;
use crate::mode::Mode;
use crate::particle::ParticleNode;
use crate::rand::ParticleRng;
use crate::spring::SpringState;

/// What a scheduled timer is for; one slot per purpose
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    /// Tap/hold disambiguation after pointer-down
    Arm,
    /// Ends a held ring boost and hands over to the ring window
    HoldRelease,
    /// Returns the spring targets to baseline
    AutoRevert,
    /// Ends the live one-shot decay window
    DecayWindow,
    /// Spawns ripples at the pointer while a ripple press is held
    FollowInterval,
}

/// Held-state flags of every continuously-held mode plus the shared anchor.
///
/// Only the selected mode's flag may be true.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeldFlags {
    pub pressing: bool,
    pub swirl_active: bool,
    pub gravity_active: bool,
    pub tornado_hold: bool,
    pub dna_hold: bool,
    pub waterfall_hold: bool,
    pub mag_hold: bool,
    pub ripple_follow: bool,
    pub ring_boost: bool,
    /// Tracks the pointer while any flag is set
    pub anchor: Vec2,
}

impl HeldFlags {
    fn slot_mut(&mut self, mode: Mode) -> Option<&mut bool> {
        match mode {
            Mode::Press => Some(&mut self.pressing),
            Mode::Swirl => Some(&mut self.swirl_active),
            Mode::Gravity => Some(&mut self.gravity_active),
            Mode::TornadoHold => Some(&mut self.tornado_hold),
            Mode::Dna => Some(&mut self.dna_hold),
            Mode::Waterfall => Some(&mut self.waterfall_hold),
            Mode::Magnet => Some(&mut self.mag_hold),
            Mode::Ripple => Some(&mut self.ripple_follow),
            Mode::Ring => Some(&mut self.ring_boost),
            _ => None,
        }
    }

    /// Flag for `mode`; always false for modes without a held state
    pub fn flag(&self, mode: Mode) -> bool {
        match mode {
            Mode::Press => self.pressing,
            Mode::Swirl => self.swirl_active,
            Mode::Gravity => self.gravity_active,
            Mode::TornadoHold => self.tornado_hold,
            Mode::Dna => self.dna_hold,
            Mode::Waterfall => self.waterfall_hold,
            Mode::Magnet => self.mag_hold,
            Mode::Ripple => self.ripple_follow,
            Mode::Ring => self.ring_boost,
            _ => false,
        }
    }

    pub fn set(&mut self, mode: Mode, on: bool) {
        if let Some(slot) = self.slot_mut(mode) {
            *slot = on;
        }
    }

    /// Modes whose flag is currently set
    pub fn active_modes(&self) -> Vec<Mode> {
        Mode::ALL.into_iter().filter(|m| self.flag(*m)).collect()
    }

    pub fn any(&self) -> bool {
        Mode::ALL.iter().any(|m| self.flag(*m))
    }

    /// Drop every flag; the anchor is kept for the next press
    pub fn clear(&mut self) {
        *self = Self {
            anchor: self.anchor,
            ..Self::default()
        };
    }
}

/// A bounded one-shot effect started by a release
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayWindow {
    pub started_ms: f64,
    pub duration_ms: f64,
    /// Pointer position at release
    pub origin: Vec2,
}

impl DecayWindow {
    pub fn new(started_ms: f64, duration_ms: f64, origin: Vec2) -> Self {
        Self {
            started_ms,
            duration_ms,
            origin,
        }
    }

    pub fn until_ms(&self) -> f64 {
        self.started_ms + self.duration_ms
    }

    /// Progress in [0, 1) while live, None once expired
    pub fn progress(&self, now_ms: f64) -> Option<f32> {
        if self.duration_ms <= 0.0 || now_ms >= self.until_ms() {
            return None;
        }
        Some(((now_ms - self.started_ms) / self.duration_ms).max(0.0) as f32)
    }
}

/// Decay windows of the release-driven modes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DecayWindows {
    pub ring: Option<DecayWindow>,
    pub tide: Option<DecayWindow>,
    pub comet: Option<DecayWindow>,
    pub flow: Option<DecayWindow>,
}

impl DecayWindows {
    pub fn get(&self, mode: Mode) -> Option<&DecayWindow> {
        match mode {
            Mode::Ring => self.ring.as_ref(),
            Mode::Tide => self.tide.as_ref(),
            Mode::Comet => self.comet.as_ref(),
            Mode::Flow => self.flow.as_ref(),
            _ => None,
        }
    }

    pub fn slot_mut(&mut self, mode: Mode) -> Option<&mut Option<DecayWindow>> {
        match mode {
            Mode::Ring => Some(&mut self.ring),
            Mode::Tide => Some(&mut self.tide),
            Mode::Comet => Some(&mut self.comet),
            Mode::Flow => Some(&mut self.flow),
            _ => None,
        }
    }

    /// Progress of `mode`'s window if it is live
    pub fn progress(&self, mode: Mode, now_ms: f64) -> Option<f32> {
        self.get(mode).and_then(|w| w.progress(now_ms))
    }

    pub fn any(&self) -> bool {
        self.ring.is_some() || self.tide.is_some() || self.comet.is_some() || self.flow.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Everything one mounted wall owns.
///
/// Mutated only by the frame callback and by timer handlers running inside it.
pub struct SimulationContext {
    /// Replaced wholesale on rebuild, never edited in place
    pub particles: Vec<ParticleNode>,
    pub lattice: LatticeFrame,
    /// Logical surface size of the last successful build
    pub surface: Vec2,
    pub spring: SpringState,
    /// Mode the state machine last entered
    pub mode: Mode,
    pub held: HeldFlags,
    pub windows: DecayWindows,
    /// Ring spin sign, flipped on every ring tap-release
    pub ring_direction: f32,
    pub pointer: PointerState,
    pub trails: TrailPool,
    pub ripples: RipplePool,
    pub pulses: PulsePool,
    /// Rotating hue cursor in degrees
    pub hue: f32,
    pub timers: TimerTable<TimerPurpose>,
    /// Bumped on every mode switch and teardown; timers carry the value they saw
    pub generation: u64,
    /// Generation the current press started in, if a press is in progress
    pub press_generation: Option<u64>,
    pub frame: u64,
    pub now_ms: f64,
    pub rng: ParticleRng,
    pub events: EventBus<WallEvent>,
}

impl SimulationContext {
    pub fn new(seed: u32) -> Self {
        Self {
            particles: Vec::new(),
            lattice: LatticeFrame::default(),
            surface: Vec2::ZERO,
            spring: SpringState::default(),
            mode: Mode::default(),
            held: HeldFlags::default(),
            windows: DecayWindows::default(),
            ring_direction: 1.0,
            pointer: PointerState::new(),
            trails: TrailPool::new(),
            ripples: RipplePool::new(),
            pulses: PulsePool::new(),
            hue: 0.0,
            timers: TimerTable::new(),
            generation: 0,
            press_generation: None,
            frame: 0,
            now_ms: 0.0,
            rng: ParticleRng::new(seed),
            events: EventBus::new(),
        }
    }

    /// Swap in a freshly built particle list in one assignment
    pub fn replace_particles(&mut self, lattice: LatticeFrame, particles: Vec<ParticleNode>) {
        self.lattice = lattice;
        self.particles = particles;
    }

    pub fn advance_hue(&mut self, degrees_per_frame: f32) {
        self.hue = (self.hue + degrees_per_frame).rem_euclid(360.0);
    }

    /// Remove comet paths from every node
    pub fn clear_comet_paths(&mut self) {
        for node in &mut self.particles {
            node.comet = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_flags_map_to_modes() {
        let mut held = HeldFlags::default();
        held.set(Mode::Press, true);
        assert!(held.pressing);
        assert!(held.flag(Mode::Press));
        assert_eq!(held.active_modes(), vec![Mode::Press]);

        // Modes without a held state ignore set
        held.set(Mode::Comet, true);
        assert!(!held.flag(Mode::Comet));

        held.anchor = Vec2::new(4.0, 5.0);
        held.clear();
        assert!(!held.any());
        assert_eq!(held.anchor, Vec2::new(4.0, 5.0));
    }

    #[test]
    fn every_hold_mode_has_a_flag() {
        for mode in Mode::ALL {
            let mut held = HeldFlags::default();
            held.set(mode, true);
            assert_eq!(held.any(), mode.has_hold(), "{mode}");
        }
    }

    #[test]
    fn window_progress_and_expiry() {
        let w = DecayWindow::new(1000.0, 500.0, Vec2::ZERO);
        assert_eq!(w.progress(1000.0), Some(0.0));
        assert!((w.progress(1250.0).unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(w.progress(1500.0), None);
        assert_eq!(w.until_ms(), 1500.0);
    }

    #[test]
    fn windows_by_mode() {
        let mut windows = DecayWindows::default();
        *windows.slot_mut(Mode::Tide).unwrap() = Some(DecayWindow::new(0.0, 100.0, Vec2::ZERO));
        assert!(windows.any());
        assert!(windows.progress(Mode::Tide, 50.0).is_some());
        assert!(windows.progress(Mode::Flow, 50.0).is_none());
        assert!(windows.slot_mut(Mode::Press).is_none());
        windows.clear();
        assert!(!windows.any());
    }

    #[test]
    fn hue_wraps() {
        let mut ctx = SimulationContext::new(1);
        ctx.hue = 359.5;
        ctx.advance_hue(1.0);
        assert!((ctx.hue - 0.5).abs() < 1e-4);
        ctx.advance_hue(-1.0);
        assert!((ctx.hue - 359.5).abs() < 1e-3);
    }
}
