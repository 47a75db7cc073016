//! Lattice builder: samples anchor points inside the heart silhouette

use glam::Vec2;

use crate::curves::lerp_f32;
use crate::particle::ParticleNode;
use crate::rand::ParticleRng;

/// Surfaces smaller than this (either axis) are not built
pub const MIN_SURFACE_PX: f32 = 40.0;

/// Normalized sampling domain
const DOMAIN_X: (f32, f32) = (-1.3, 1.3);
const DOMAIN_Y: (f32, f32) = (-1.2, 1.2);

/// Fraction of min(width, height) one normalized unit spans
const SCALE_FRACTION: f32 = 0.3;

/// Grid step in normalized units at density 0 and 1
const STEP_SPARSE: f32 = 0.16;
const STEP_DENSE: f32 = 0.055;

/// Glyph alphabet the nodes cycle through
pub const GLYPHS: [char; 8] = ['♥', '❤', '✦', '♡', '✿', '❥', '✧', '❀'];

/// Inputs the lattice depends on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeParams {
    pub width: f32,
    pub height: f32,
    pub center_y: f32,
    pub density: f32,
    pub font_scale: f32,
}

/// Mapping between normalized heart space (y up) and surface pixels (y down)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeFrame {
    pub center: Vec2,
    /// Pixels per normalized unit
    pub scale: f32,
}

impl Default for LatticeFrame {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl LatticeFrame {
    pub fn for_surface(width: f32, height: f32, center_y: f32) -> Self {
        Self {
            center: Vec2::new(width * 0.5, height * center_y.clamp(0.0, 1.0)),
            scale: width.min(height) * SCALE_FRACTION,
        }
    }

    pub fn to_surface(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.center.x + p.x * self.scale, self.center.y - p.y * self.scale)
    }

    pub fn to_normalized(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x - self.center.x) / self.scale,
            (self.center.y - p.y) / self.scale,
        )
    }
}

/// Implicit heart function (x² + y² − 1)³ − x²·y³, non-positive inside
pub fn heart_value(p: Vec2) -> f32 {
    let a = p.x * p.x + p.y * p.y - 1.0;
    a * a * a - p.x * p.x * p.y * p.y * p.y
}

pub fn heart_contains(p: Vec2) -> bool {
    heart_value(p) <= 0.0
}

/// Normalized grid step for a density in [0, 1]
pub fn grid_step(density: f32, font_scale: f32) -> f32 {
    lerp_f32(STEP_SPARSE, STEP_DENSE, density.clamp(0.0, 1.0)) * font_scale.clamp(0.4, 3.0)
}

/// Accepted grid points in normalized space, in row-major order
pub fn lattice_points(step: f32) -> Vec<Vec2> {
    let cols = ((DOMAIN_X.1 - DOMAIN_X.0) / step).floor() as i32;
    let rows = ((DOMAIN_Y.1 - DOMAIN_Y.0) / step).floor() as i32;

    let mut points = Vec::new();
    for row in 0..=rows {
        // Top row first so indices read like text
        let y = DOMAIN_Y.1 - row as f32 * step;
        for col in 0..=cols {
            let p = Vec2::new(DOMAIN_X.0 + col as f32 * step, y);
            if heart_contains(p) {
                points.push(p);
            }
        }
    }
    points
}

/// Build the particle set, or None when the surface is degenerate.
///
/// Anchors depend only on `params`; phase and rotation draw jitter from `rng`.
pub fn build_lattice(
    params: &LatticeParams,
    rng: &mut ParticleRng,
) -> Option<(LatticeFrame, Vec<ParticleNode>)> {
    if !(params.width >= MIN_SURFACE_PX && params.height >= MIN_SURFACE_PX) {
        return None;
    }

    let frame = LatticeFrame::for_surface(params.width, params.height, params.center_y);
    let step = grid_step(params.density, params.font_scale);
    let size = step * frame.scale * 1.1;

    let nodes = lattice_points(step)
        .into_iter()
        .enumerate()
        .map(|(index, p)| {
            let r = p.length();
            let mut node = ParticleNode::at_rest(index, frame.to_surface(p));
            node.phase = r * 2.2 + rng.range(0.0, 0.6);
            node.rotation = rng.range(-0.25, 0.25);
            node.glyph = index % GLYPHS.len();
            node.size = size;
            node.hue_offset = r * 40.0;
            node
        })
        .collect();

    Some((frame, nodes))
}
