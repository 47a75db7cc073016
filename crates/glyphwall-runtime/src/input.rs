//! Pointer input state management

use glam::Vec2;

/// Phase of a pointer event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer event in surface-local logical pixels (device pixel ratio already removed)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            position: Vec2::new(x, y),
        }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Up, x, y)
    }

    pub fn cancel(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Cancel, x, y)
    }

    /// Up and cancel both end a press
    pub fn is_release(&self) -> bool {
        matches!(self.phase, PointerPhase::Up | PointerPhase::Cancel)
    }
}

/// Tracks the single active pointer
#[derive(Clone, Debug, Default)]
pub struct PointerState {
    down: bool,
    /// Last reported position
    position: Vec2,
    /// Where the current press started
    press_origin: Vec2,
    /// Timestamp of the current press
    down_at_ms: Option<f64>,
    /// Movement accumulated since the last `take_delta`
    delta: Vec2,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the state
    pub fn process(&mut self, event: &PointerEvent, now_ms: f64) {
        match event.phase {
            PointerPhase::Down => {
                self.down = true;
                self.down_at_ms = Some(now_ms);
                self.press_origin = event.position;
                self.delta = Vec2::ZERO;
            }
            PointerPhase::Move => {
                self.delta += event.position - self.position;
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                self.down = false;
                self.down_at_ms = None;
            }
        }
        self.position = event.position;
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn press_origin(&self) -> Vec2 {
        self.press_origin
    }

    /// How long the pointer has been held, or None when up
    pub fn held_for(&self, now_ms: f64) -> Option<f64> {
        self.down_at_ms.map(|t| (now_ms - t).max(0.0))
    }

    /// Movement since the last call
    pub fn take_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.delta)
    }

    /// Forget the active press (view teardown)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
