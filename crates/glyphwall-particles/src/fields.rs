//! Per-mode continuous force fields and their dispatch table
//!
//! Every mode maps to one pure function of the node, the context, the config
//! and the frame time. Fields are evaluated at the node's anchor so they never
//! feed back on the motion they cause. Gated fields return zero while their
//! held flag is false or their decay window is not live.

use std::f32::consts::PI;

use glam::Vec2;
use glyphwall_runtime::FrameTime;

use crate::config::WallConfig;
use crate::context::SimulationContext;
use crate::curves::{ease_in_out_cubic, ease_out_cubic, lerp_vec2, out_and_back, parabola};
use crate::forces::{gaussian, held_field, perp};
use crate::mode::Mode;
use crate::particle::ParticleNode;

/// Signature shared by every mode field
pub type ModeField = fn(&ParticleNode, &SimulationContext, &WallConfig, &FrameTime) -> Vec2;

/// Indexed by `Mode::index()`
pub const MODE_FIELDS: [ModeField; Mode::COUNT] = [
    no_field,           // burst
    no_field,           // ripple
    press_field,        // press
    no_field,           // explode
    swirl_field,        // swirl
    gravity_field,      // gravity
    no_field,           // tornado
    tornado_hold_field, // tornado-hold
    dna_field,          // dna
    ring_field,         // ring
    waterfall_field,    // waterfall
    magnet_field,       // magnet
    tide_field,         // tide
    comet_field,        // comet
    flow_field,         // flow
];

pub fn field_for(mode: Mode) -> ModeField {
    MODE_FIELDS[mode.index()]
}

/// Largest rotation the ring applies, in radians
const RING_MAX_ANGLE: f32 = 0.3;

/// Impulse modes act through velocity kicks, not a continuous field
fn no_field(_: &ParticleNode, _: &SimulationContext, _: &WallConfig, _: &FrameTime) -> Vec2 {
    Vec2::ZERO
}

fn press_field(node: &ParticleNode, ctx: &SimulationContext, config: &WallConfig, _: &FrameTime) -> Vec2 {
    if !ctx.held.pressing {
        return Vec2::ZERO;
    }
    let (dir, g) = held_field(node.anchor, ctx.held.anchor, config.press_radius_pixels);
    dir * config.press_strength * g
}

fn swirl_field(node: &ParticleNode, ctx: &SimulationContext, config: &WallConfig, _: &FrameTime) -> Vec2 {
    if !ctx.held.swirl_active {
        return Vec2::ZERO;
    }
    let (dir, g) = held_field(node.anchor, ctx.held.anchor, config.press_radius_pixels);
    perp(dir) * config.press_strength * 1.2 * g
}

fn gravity_field(node: &ParticleNode, ctx: &SimulationContext, config: &WallConfig, _: &FrameTime) -> Vec2 {
    if !ctx.held.gravity_active {
        return Vec2::ZERO;
    }
    let (dir, g) = held_field(node.anchor, ctx.held.anchor, config.press_radius_pixels);
    // Never pull a node past the anchor
    let dist = node.anchor.distance(ctx.held.anchor);
    -dir * (config.press_strength * g).min(dist * 0.85)
}

fn tornado_hold_field(
    node: &ParticleNode,
    ctx: &SimulationContext,
    config: &WallConfig,
    time: &FrameTime,
) -> Vec2 {
    if !ctx.held.tornado_hold {
        return Vec2::ZERO;
    }
    let s = config.press_strength;
    let (dir, g) = held_field(node.anchor, ctx.held.anchor, config.press_radius_pixels * 1.6);
    let spin = 1.0 + 0.25 * (6.0 * time.seconds()).sin();
    perp(dir) * s * 1.4 * g * spin - dir * s * 0.35 * g + Vec2::new(0.0, -s * 0.5 * g)
}

fn dna_field(node: &ParticleNode, ctx: &SimulationContext, config: &WallConfig, time: &FrameTime) -> Vec2 {
    let strand = node.strand() as f32 * PI;
    let mut amp = config.press_strength * 0.25;
    let mut twist = 0.0;
    if ctx.held.dna_hold {
        let dy = node.anchor.y - ctx.held.anchor.y;
        let band = gaussian(dy * dy, config.press_radius_pixels * 1.2);
        amp *= 1.0 + 1.6 * band;
        twist = band * 1.5;
    }
    let arg = node.anchor.y * 0.035 + time.seconds() * 2.4 + strand + twist;
    Vec2::new(amp * arg.sin(), amp * 0.25 * arg.cos())
}

fn ring_field(node: &ParticleNode, ctx: &SimulationContext, _: &WallConfig, time: &FrameTime) -> Vec2 {
    let level = if ctx.held.ring_boost {
        1.0
    } else {
        match ctx.windows.progress(Mode::Ring, time.now_ms) {
            Some(u) => 1.0 - ease_out_cubic(u),
            None => return Vec2::ZERO,
        }
    };

    let rel = node.anchor - ctx.lattice.center;
    let swing = 0.6 + 0.4 * (rel.length() * 0.04 - time.seconds() * 5.0).sin();
    let angle = ctx.ring_direction * RING_MAX_ANGLE * level * swing;
    let (s, c) = angle.sin_cos();
    Vec2::new(rel.x * c - rel.y * s, rel.x * s + rel.y * c) - rel
}

fn waterfall_field(
    node: &ParticleNode,
    ctx: &SimulationContext,
    config: &WallConfig,
    time: &FrameTime,
) -> Vec2 {
    if !ctx.held.waterfall_hold {
        return Vec2::ZERO;
    }
    let t = time.seconds();
    let anchor = ctx.held.anchor;
    let floor = anchor.y + config.press_radius_pixels;
    let dx = node.anchor.x - anchor.x;
    let column = gaussian(dx * dx, config.press_radius_pixels * 0.5);
    let sway = (node.anchor.y * 0.08 - t * 6.0).sin() * 2.0 * column;

    // Nodes already below the floor only sway
    if node.anchor.y >= floor {
        return Vec2::new(sway, 0.0);
    }

    let drop = config.press_strength
        * 1.6
        * column
        * (0.6 + 0.4 * (node.anchor.y * 0.05 - t * 8.0).sin());
    let mut y = node.anchor.y + drop;
    if y > floor {
        y = floor - (y - floor);
    }
    Vec2::new(sway, y - node.anchor.y)
}

fn magnet_field(node: &ParticleNode, ctx: &SimulationContext, config: &WallConfig, _: &FrameTime) -> Vec2 {
    if !ctx.held.mag_hold {
        return Vec2::ZERO;
    }
    let w = config.press_radius_pixels;
    let anchor = ctx.held.anchor;
    let half = Vec2::new(w * 0.45, 0.0);
    let soft2 = (w * 0.35) * (w * 0.35);
    let k = config.press_strength * w;

    // Attracting pole left of the pointer, repelling pole right of it
    let mut out = Vec2::ZERO;
    for (pole, charge) in [(anchor - half, 1.0f32), (anchor + half, -1.0)] {
        let d = pole - node.anchor;
        let r2 = d.length_squared();
        let f = d * (charge * k / (r2 + soft2));
        out += if charge > 0.0 {
            f.clamp_length_max(0.9 * r2.sqrt())
        } else {
            f
        };
    }
    out * gaussian(node.anchor.distance_squared(anchor), w * 2.5)
}

fn tide_field(node: &ParticleNode, ctx: &SimulationContext, config: &WallConfig, time: &FrameTime) -> Vec2 {
    let Some(window) = ctx.windows.tide else {
        return Vec2::ZERO;
    };
    let Some(u) = window.progress(time.now_ms) else {
        return Vec2::ZERO;
    };
    let env = (1.0 - ease_out_cubic(u)) * (u * 8.0).min(1.0);
    let arg = (node.anchor.x - window.origin.x) * 0.03 + node.anchor.y * 0.01 - time.seconds() * 5.0;
    let amp = config.press_strength * 0.9 * env;
    Vec2::new(amp * arg.sin(), amp * 0.2 * arg.cos())
}

fn comet_field(node: &ParticleNode, ctx: &SimulationContext, _: &WallConfig, time: &FrameTime) -> Vec2 {
    let (Some(u), Some(path)) = (ctx.windows.progress(Mode::Comet, time.now_ms), node.comet) else {
        return Vec2::ZERO;
    };
    let s = out_and_back(u);
    let pos = lerp_vec2(node.anchor, path.target, s) - Vec2::new(0.0, path.arc * parabola(s));
    pos - node.anchor
}

fn flow_field(node: &ParticleNode, ctx: &SimulationContext, config: &WallConfig, time: &FrameTime) -> Vec2 {
    let Some(u) = ctx.windows.progress(Mode::Flow, time.now_ms) else {
        return Vec2::ZERO;
    };
    let env = (1.0 - ease_in_out_cubic(u)) * (u * 6.0).min(1.0);
    let t = time.seconds();
    let p = node.anchor;
    let a = (p.x * 0.021 + t * 1.7).sin() * (p.y * 0.017 - t * 1.3).cos();
    let b = (p.x * 0.019 - t * 1.1 + 1.3).sin() * (p.y * 0.023 + t * 1.9).cos();
    Vec2::new(a, b) * config.press_strength * 0.8 * env
}
