//! Transient effect pools: trail sparks, ripple wavefronts, pulse markers
//!
//! Each pool is independent and self-pruning. Trails age out per frame and are
//! hard-capped; ripples and pulses are pruned by wall-clock age.

use glam::Vec2;

use crate::rand::ParticleRng;

/// Maximum live trail particles; the oldest are dropped past this
pub const TRAIL_CAP: usize = 600;

/// Ripples are removed this long after creation, visible or not
pub const RIPPLE_EXPIRY_MS: f64 = 2400.0;

/// Default wavefront speed in pixels per frame
pub const RIPPLE_SPEED: f32 = 9.0;
pub const RIPPLE_AMPLITUDE: f32 = 22.0;
pub const RIPPLE_BAND: f32 = 38.0;

pub const PULSE_LIFE_MS: f64 = 900.0;

/// Per-frame velocity retention for trail sparks
const TRAIL_DRAG: f32 = 0.94;
/// Downward pull on trail sparks, pixels per frame²
const TRAIL_GRAVITY: f32 = 0.05;

/// A short-lived spark
#[derive(Clone, Debug, PartialEq)]
pub struct TrailParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Total life in milliseconds
    pub life: f32,
    /// Elapsed age in milliseconds
    pub age: f32,
    pub size: f32,
}

impl TrailParticle {
    /// Normalized age in [0, 1]
    pub fn age_ratio(&self) -> f32 {
        if self.life <= 0.0 {
            1.0
        } else {
            (self.age / self.life).min(1.0)
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.life
    }
}

/// Spark pool, kept in spawn order so truncation drops the oldest
#[derive(Debug, Default)]
pub struct TrailPool {
    particles: Vec<TrailParticle>,
}

impl TrailPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `count` sparks flying outward from `origin`
    pub fn spawn_burst(&mut self, origin: Vec2, count: usize, rng: &mut ParticleRng) {
        for _ in 0..count {
            self.particles.push(TrailParticle {
                position: origin,
                velocity: rng.unit_vec2() * rng.range(1.5, 6.0),
                life: rng.range(500.0, 1100.0),
                age: 0.0,
                size: rng.range(1.5, 4.0),
            });
        }
        if self.particles.len() > TRAIL_CAP {
            let excess = self.particles.len() - TRAIL_CAP;
            self.particles.drain(..excess);
        }
    }

    /// Advance sparks by one frame and drop the expired ones
    pub fn update_and_compact(&mut self, delta_ms: f32) {
        for p in &mut self.particles {
            p.age += delta_ms;
            p.velocity *= TRAIL_DRAG;
            p.velocity.y += TRAIL_GRAVITY;
            p.position += p.velocity;
        }
        self.particles.retain(|p| !p.is_expired());
    }

    pub fn as_slice(&self) -> &[TrailParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

/// An expanding wavefront
#[derive(Clone, Debug, PartialEq)]
pub struct RippleEvent {
    pub origin: Vec2,
    pub born_ms: f64,
    pub born_frame: u64,
    /// Wavefront speed in pixels per frame
    pub speed: f32,
    /// Peak displacement in pixels
    pub amplitude: f32,
    /// Gaussian band width around the wavefront
    pub band: f32,
}

impl RippleEvent {
    pub fn new(origin: Vec2, born_ms: f64, born_frame: u64) -> Self {
        Self {
            origin,
            born_ms,
            born_frame,
            speed: RIPPLE_SPEED,
            amplitude: RIPPLE_AMPLITUDE,
            band: RIPPLE_BAND,
        }
    }

    /// Propagated radius `speed · frames elapsed`
    pub fn radius_at(&self, frame: u64) -> f32 {
        self.speed * frame.saturating_sub(self.born_frame) as f32
    }

    pub fn age_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.born_ms
    }
}

#[derive(Debug, Default)]
pub struct RipplePool {
    ripples: Vec<RippleEvent>,
}

impl RipplePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ripple: RippleEvent) {
        self.ripples.push(ripple);
    }

    /// Drop ripples older than the expiry window
    pub fn prune(&mut self, now_ms: f64) {
        self.ripples
            .retain(|r| r.age_ms(now_ms) <= RIPPLE_EXPIRY_MS);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RippleEvent> {
        self.ripples.iter()
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    pub fn clear(&mut self) {
        self.ripples.clear();
    }
}

/// A short radial bump (dna taps)
#[derive(Clone, Debug, PartialEq)]
pub struct PulseMarker {
    pub origin: Vec2,
    pub born_ms: f64,
    pub life_ms: f64,
}

impl PulseMarker {
    pub fn new(origin: Vec2, born_ms: f64) -> Self {
        Self {
            origin,
            born_ms,
            life_ms: PULSE_LIFE_MS,
        }
    }

    /// Remaining strength, 1 at birth falling to 0 at end of life
    pub fn strength_at(&self, now_ms: f64) -> f32 {
        if self.life_ms <= 0.0 {
            return 0.0;
        }
        let t = ((now_ms - self.born_ms) / self.life_ms).clamp(0.0, 1.0) as f32;
        (1.0 - t) * (1.0 - t)
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.born_ms >= self.life_ms
    }
}

#[derive(Debug, Default)]
pub struct PulsePool {
    pulses: Vec<PulseMarker>,
}

impl PulsePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pulse: PulseMarker) {
        self.pulses.push(pulse);
    }

    pub fn prune(&mut self, now_ms: f64) {
        self.pulses.retain(|p| !p.is_expired(now_ms));
    }

    pub fn iter(&self) -> impl Iterator<Item = &PulseMarker> {
        self.pulses.iter()
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
    }
}
