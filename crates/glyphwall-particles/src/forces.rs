//! Force composer
//!
//! A node's spring target is its breathing-scaled anchor plus the sum of
//! independent offsets: the selected mode's field, every live ripple band and
//! every live pulse bump. All falloffs are Gaussian in surface pixels.

use glam::Vec2;
use glyphwall_runtime::FrameTime;

use crate::config::WallConfig;
use crate::context::SimulationContext;
use crate::effects::{PulsePool, RippleEvent, RipplePool};
use crate::fields::field_for;
use crate::lattice::LatticeFrame;
use crate::particle::ParticleNode;

/// High-frequency wobble amplitude relative to the breathing amplitude
const WOBBLE: f32 = 0.12;

const PULSE_AMPLITUDE: f32 = 16.0;
const PULSE_WIDTH: f32 = 60.0;

/// `exp(-d² / 2w²)`
pub fn gaussian(d2: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return 0.0;
    }
    (-d2 / (2.0 * width * width)).exp()
}

/// Counter-clockwise perpendicular (in y-down screen space this turns clockwise)
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Unit vector pointing from `from` to `to`, and the distance between them
pub fn direction(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let d = to - from;
    let len = d.length();
    if len > 1e-6 {
        (d / len, len)
    } else {
        (Vec2::ZERO, 0.0)
    }
}

/// Radial unit vector from a field anchor to `point` and the anchor's falloff there
pub fn held_field(point: Vec2, anchor: Vec2, width: f32) -> (Vec2, f32) {
    let (dir, dist) = direction(anchor, point);
    (dir, gaussian(dist * dist, width))
}

/// `1 + A·sin(2t + phase) + wobble`
pub fn breathing_factor(node: &ParticleNode, config: &WallConfig, t: f32) -> f32 {
    let a = config.breathe_fraction;
    1.0 + a * (2.0 * t + node.phase).sin() + a * WOBBLE * (7.3 * t + 1.7 * node.phase).sin()
}

/// Anchor scaled about the lattice center by the breathing factor
pub fn rest_position(node: &ParticleNode, lattice: &LatticeFrame, config: &WallConfig, t: f32) -> Vec2 {
    lattice.center + (node.anchor - lattice.center) * breathing_factor(node, config, t)
}

/// Displacement magnitude one ripple applies at `dist` from its origin
pub fn ripple_magnitude(ripple: &RippleEvent, dist: f32, frame: u64, strength: f32) -> f32 {
    let off = dist - ripple.radius_at(frame);
    ripple.amplitude * strength * gaussian(off * off, ripple.band)
}

/// Sum of every live ripple's band, pushing along the radial direction
pub fn ripple_offset(node: &ParticleNode, ripples: &RipplePool, frame: u64, strength: f32) -> Vec2 {
    ripples
        .iter()
        .map(|r| {
            let (dir, dist) = direction(r.origin, node.anchor);
            dir * ripple_magnitude(r, dist, frame, strength)
        })
        .sum()
}

/// Sum of every live pulse's fading radial bump
pub fn pulse_offset(node: &ParticleNode, pulses: &PulsePool, now_ms: f64) -> Vec2 {
    pulses
        .iter()
        .map(|p| {
            let (dir, g) = held_field(node.anchor, p.origin, PULSE_WIDTH);
            dir * PULSE_AMPLITUDE * g * p.strength_at(now_ms)
        })
        .sum()
}

/// Offset added to the node's breathing-scaled anchor this frame
pub fn compose(
    node: &ParticleNode,
    ctx: &SimulationContext,
    config: &WallConfig,
    time: &FrameTime,
) -> Vec2 {
    field_for(config.mode)(node, ctx, config, time)
        + ripple_offset(node, &ctx.ripples, time.frame, config.ripple_strength)
        + pulse_offset(node, &ctx.pulses, time.now_ms)
}
