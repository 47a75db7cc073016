//! Glyphwall Runtime - Frame loop infrastructure
//!
//! Provides the scheduling building blocks a mounted view runs on:
//! - `SimClock` / `FrameTime` - host-supplied clock, so tests can drive fake time
//! - `FrameLoop` - the single per-refresh callback, re-armed after each frame
//! - `TimerTable` - purpose-keyed one-shot and interval timers with generation tokens
//! - `PointerEvent` / `PointerState` - pointer input in surface-local pixels
//! - `EventBus` - typed event queue drained by the host
//! - `FrameSystem` - trait for systems ticked by the frame loop

mod clock;
mod event_bus;
mod frame_loop;
mod input;
mod system;
mod timer;

pub use clock::{FrameTime, SimClock, NOMINAL_FRAME_MS};
pub use event_bus::EventBus;
pub use frame_loop::FrameLoop;
pub use input::{PointerEvent, PointerPhase, PointerState};
pub use system::FrameSystem;
pub use timer::{FiredTimer, TimerEntry, TimerTable};
