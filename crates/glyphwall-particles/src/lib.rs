//! Glyphwall Particles - generative glyph wall
//!
//! Arranges glyph particles into a heart silhouette and animates them with:
//! - A spring integrator whose stiffness and damping ease toward each mode's profile
//! - An additive force model: breathing, one mode field, ripple bands, pulse bumps
//! - Fifteen pointer modes with tap/hold disambiguation and self-clearing decay windows
//! - Trail, ripple and pulse pools pruned every frame
//!
//! `ParticleWall` owns one `SimulationContext` and plugs into the runtime's
//! `FrameLoop` as a `FrameSystem` drawing onto any `DrawSurface`.

pub mod config;
pub mod context;
pub mod curves;
pub mod effects;
pub mod event;
pub mod fields;
pub mod forces;
pub mod lattice;
pub mod machine;
pub mod mode;
pub mod particle;
pub mod rand;
pub mod render;
pub mod spring;
pub mod wall;

pub use config::{ConfigChange, ConfigPatch, WallConfig};
pub use context::{SimulationContext, TimerPurpose};
pub use event::WallEvent;
pub use fields::{field_for, ModeField, MODE_FIELDS};
pub use lattice::{build_lattice, LatticeFrame, LatticeParams};
pub use mode::Mode;
pub use particle::ParticleNode;
pub use render::{BlendMode, DrawSurface, TextAlign, TextBaseline};
pub use spring::{SpringProfile, SpringState};
pub use wall::ParticleWall;
