//! The mounted wall: configuration, context and the per-frame update

use glam::Vec2;
use glyphwall_core::Result;
use glyphwall_runtime::{FrameSystem, FrameTime, PointerEvent};
use tracing::{debug, info};

use crate::config::{ConfigChange, ConfigPatch, WallConfig};
use crate::context::SimulationContext;
use crate::event::WallEvent;
use crate::forces::{compose, rest_position};
use crate::lattice::{build_lattice, LatticeParams};
use crate::machine;
use crate::render::{draw_frame, DrawSurface};

const DEFAULT_SEED: u32 = 0x9E37_79B9;

/// One particle wall bound to one view.
///
/// Owns its `SimulationContext` outright; nothing else writes to it. The host
/// feeds pointer events and frame timestamps, and reads back draw calls and
/// `WallEvent`s.
pub struct ParticleWall {
    config: WallConfig,
    ctx: SimulationContext,
    /// Size of the last rebuild request, successful or not
    requested_size: Vec2,
}

impl ParticleWall {
    pub fn new(config: WallConfig) -> Self {
        Self::with_seed(config, DEFAULT_SEED)
    }

    /// Build with an explicit jitter seed (deterministic tests and replays)
    pub fn with_seed(config: WallConfig, seed: u32) -> Self {
        let mut ctx = SimulationContext::new(seed);
        ctx.mode = config.mode;
        ctx.spring = machine::initial_spring(config.mode);
        Self {
            config,
            ctx,
            requested_size: Vec2::ZERO,
        }
    }

    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    /// Apply a configuration patch.
    ///
    /// A mode change takes effect immediately. Lattice-shaping keys only flag
    /// `needs_rebuild`; the host decides when to call `rebuild_lattice`.
    pub fn set_configuration(&mut self, patch: &ConfigPatch, now_ms: f64) -> Result<ConfigChange> {
        let change = self.config.apply(patch)?;
        if change.previous_mode.is_some() {
            machine::select_mode(&mut self.ctx, self.config.mode, now_ms);
        }
        if !change.is_empty() {
            debug!(changed = ?change.changed, rebuild = change.needs_rebuild, "configuration applied");
        }
        Ok(change)
    }

    /// Rebuild the lattice for a surface. Returns false (keeping the current
    /// particles) when the surface is too small.
    pub fn rebuild_lattice(&mut self, width: f32, height: f32) -> bool {
        self.requested_size = Vec2::new(width, height);
        let params = LatticeParams {
            width,
            height,
            center_y: self.config.center_y_fraction,
            density: self.config.density,
            font_scale: self.config.font_scale,
        };
        match build_lattice(&params, &mut self.ctx.rng) {
            Some((frame, particles)) => {
                let count = particles.len();
                self.ctx.replace_particles(frame, particles);
                self.ctx.surface = Vec2::new(width, height);
                info!(width, height, count, "lattice rebuilt");
                self.ctx.events.push(WallEvent::LatticeRebuilt { count });
                true
            }
            None => {
                debug!(width, height, "surface too small, lattice kept");
                self.ctx.events.push(WallEvent::LatticeSkipped { width, height });
                false
            }
        }
    }

    /// Rebuild when the host reports a new surface size
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let size = Vec2::new(width, height);
        if size == self.requested_size {
            return false;
        }
        self.rebuild_lattice(width, height)
    }

    /// Start a ripple at a point regardless of mode
    pub fn trigger_ripple(&mut self, x: f32, y: f32, now_ms: f64) {
        machine::trigger_ripple(&mut self.ctx, Vec2::new(x, y), now_ms, 1.0);
    }

    /// Spray trail sparks at a point regardless of mode
    pub fn spawn_burst(&mut self, x: f32, y: f32) {
        machine::spawn_burst(&mut self.ctx, Vec2::new(x, y));
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent, now_ms: f64) {
        machine::handle_pointer(&mut self.ctx, &self.config, event, now_ms);
    }

    /// Advance the simulation one frame without drawing
    pub fn step(&mut self, time: &FrameTime) {
        let ctx = &mut self.ctx;
        ctx.now_ms = time.now_ms;
        ctx.frame = time.frame;

        machine::run_due_timers(ctx, time.now_ms);
        ctx.spring.ease();
        ctx.ripples.prune(time.now_ms);
        ctx.pulses.prune(time.now_ms);
        ctx.advance_hue(self.config.hue_rotation_speed);

        let t = time.seconds();
        let mut particles = std::mem::take(&mut ctx.particles);
        for node in &mut particles {
            let target = rest_position(node, &ctx.lattice, &self.config, t)
                + compose(node, ctx, &self.config, time);
            ctx.spring.step(node, target);
        }
        ctx.particles = particles;

        ctx.trails.update_and_compact(time.delta_ms as f32);
    }

    /// Cancel every timer and forget the press; the particle list is kept
    pub fn teardown(&mut self) {
        machine::teardown(&mut self.ctx);
    }

    pub fn drain_events(&mut self) -> Vec<WallEvent> {
        self.ctx.events.drain()
    }
}

impl FrameSystem for ParticleWall {
    type Surface = dyn DrawSurface;

    fn initialize(&mut self) -> Result<()> {
        debug!(mode = %self.config.mode, "particle wall mounted");
        Ok(())
    }

    fn frame(&mut self, time: &FrameTime, surface: &mut Self::Surface) -> Result<()> {
        let size = surface.size();
        self.resize(size.x, size.y);
        self.step(time);
        draw_frame(surface, &self.ctx, &self.config);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.teardown();
        Ok(())
    }

    fn name(&self) -> &str {
        "particle_wall"
    }
}
