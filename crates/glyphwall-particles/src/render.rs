//! Drawing-surface contract and the per-frame draw pass
//!
//! The host owns the real surface (a canvas, a terminal, a test recorder) and
//! reports its size in logical pixels. The wall only issues primitive calls.

use glam::Vec2;
use glyphwall_core::{Color, Rect};

use crate::config::WallConfig;
use crate::context::SimulationContext;
use crate::lattice::GLYPHS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Alpha,
    /// Colors add up where primitives overlap; used for glow
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    #[default]
    Middle,
    Alphabetic,
}

/// A 2D surface the wall draws onto
pub trait DrawSurface {
    /// Logical size, independent of device pixel ratio
    fn size(&self) -> Vec2;

    fn clear(&mut self, region: Rect);

    /// Filled circle; `blur` softens the edge in pixels
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, blur: f32);

    /// Filled heart shape of the given half-width
    fn fill_heart(&mut self, center: Vec2, size: f32, color: Color, blur: f32);

    #[allow(clippy::too_many_arguments)]
    fn draw_glyph(
        &mut self,
        glyph: char,
        position: Vec2,
        font_size: f32,
        rotation: f32,
        color: Color,
        align: TextAlign,
        baseline: TextBaseline,
    );

    fn set_alpha(&mut self, alpha: f32);

    fn set_blend(&mut self, mode: BlendMode);
}

const GLYPH_SATURATION: f32 = 0.85;
const GLYPH_LIGHTNESS: f32 = 0.68;

/// Glyph color for a node: rotating rainbow or the fixed base hue
pub fn glyph_color(config: &WallConfig, hue_cursor: f32, hue_offset: f32) -> Color {
    let hue = if config.rainbow {
        hue_cursor + hue_offset
    } else {
        config.base_hue_degrees
    };
    Color::from_hsl(hue, GLYPH_SATURATION, GLYPH_LIGHTNESS)
}

/// Draw one frame of the wall
pub fn draw_frame(surface: &mut dyn DrawSurface, ctx: &SimulationContext, config: &WallConfig) {
    let size = surface.size();
    surface.set_blend(BlendMode::Alpha);
    surface.set_alpha(1.0);
    surface.clear(Rect::from_size(size.x, size.y));

    for node in &ctx.particles {
        let glyph = GLYPHS[node.glyph % GLYPHS.len()];
        // Nodes pushed far from home brighten slightly
        let lift = (node.displacement().length() / 80.0).min(0.25);
        let color = glyph_color(config, ctx.hue, node.hue_offset);
        let color = Color::new(
            (color.r + lift).min(1.0),
            (color.g + lift).min(1.0),
            (color.b + lift).min(1.0),
            1.0,
        );
        surface.draw_glyph(
            glyph,
            node.position,
            node.size,
            node.rotation,
            color,
            TextAlign::Center,
            TextBaseline::Middle,
        );
    }

    draw_glow(surface, ctx, config);
    surface.set_blend(BlendMode::Alpha);
    surface.set_alpha(1.0);
}

/// Additive pass for trails, ripple rings, pulses and the held anchor
fn draw_glow(surface: &mut dyn DrawSurface, ctx: &SimulationContext, config: &WallConfig) {
    let glow = glyph_color(config, ctx.hue, 0.0);
    surface.set_blend(BlendMode::Additive);

    for spark in ctx.trails.as_slice() {
        let fade = 1.0 - spark.age_ratio();
        surface.set_alpha(fade);
        surface.fill_heart(spark.position, spark.size * 1.6, glow, 1.0);
    }

    for ripple in ctx.ripples.iter() {
        let radius = ripple.radius_at(ctx.frame);
        if radius <= 0.0 {
            continue;
        }
        let age = (ripple.age_ms(ctx.now_ms) / crate::effects::RIPPLE_EXPIRY_MS) as f32;
        surface.set_alpha((1.0 - age).clamp(0.0, 1.0) * 0.25);
        surface.fill_circle(ripple.origin, radius, glow, ripple.band * 0.5);
    }

    for pulse in ctx.pulses.iter() {
        let strength = pulse.strength_at(ctx.now_ms);
        if strength <= 0.0 {
            continue;
        }
        surface.set_alpha(strength * 0.6);
        surface.fill_circle(pulse.origin, 18.0 + 30.0 * (1.0 - strength), glow, 12.0);
    }

    if ctx.held.any() {
        surface.set_alpha(0.35);
        surface.fill_circle(ctx.held.anchor, config.press_radius_pixels * 0.35, glow, 24.0);
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    /// One recorded draw call
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Clear(Rect),
        Circle { center: Vec2, radius: f32 },
        Heart { center: Vec2, size: f32 },
        Glyph { glyph: char, position: Vec2, color: Color },
        Alpha(f32),
        Blend(BlendMode),
    }

    /// Surface test double that records every call
    pub struct RecordingSurface {
        pub size: Vec2,
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn new(width: f32, height: f32) -> Self {
            Self {
                size: Vec2::new(width, height),
                calls: Vec::new(),
            }
        }

        pub fn glyphs(&self) -> Vec<&DrawCall> {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Glyph { .. }))
                .collect()
        }
    }

    impl DrawSurface for RecordingSurface {
        fn size(&self) -> Vec2 {
            self.size
        }

        fn clear(&mut self, region: Rect) {
            self.calls.push(DrawCall::Clear(region));
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, _color: Color, _blur: f32) {
            self.calls.push(DrawCall::Circle { center, radius });
        }

        fn fill_heart(&mut self, center: Vec2, size: f32, _color: Color, _blur: f32) {
            self.calls.push(DrawCall::Heart { center, size });
        }

        fn draw_glyph(
            &mut self,
            glyph: char,
            position: Vec2,
            _font_size: f32,
            _rotation: f32,
            color: Color,
            _align: TextAlign,
            _baseline: TextBaseline,
        ) {
            self.calls.push(DrawCall::Glyph {
                glyph,
                position,
                color,
            });
        }

        fn set_alpha(&mut self, alpha: f32) {
            self.calls.push(DrawCall::Alpha(alpha));
        }

        fn set_blend(&mut self, mode: BlendMode) {
            self.calls.push(DrawCall::Blend(mode));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::{DrawCall, RecordingSurface};
    use super::*;
    use crate::effects::RippleEvent;
    use crate::particle::ParticleNode;

    fn context_with_nodes(n: usize) -> SimulationContext {
        let mut ctx = SimulationContext::new(5);
        ctx.particles = (0..n)
            .map(|i| ParticleNode::at_rest(i, Vec2::new(10.0 * i as f32, 20.0)))
            .collect();
        ctx
    }

    #[test]
    fn clears_then_draws_every_node() {
        let ctx = context_with_nodes(7);
        let mut surface = RecordingSurface::new(320.0, 240.0);
        draw_frame(&mut surface, &ctx, &WallConfig::default());

        assert!(surface
            .calls
            .iter()
            .any(|c| *c == DrawCall::Clear(Rect::from_size(320.0, 240.0))));
        assert_eq!(surface.glyphs().len(), 7);
        // Ends back in normal blending
        assert_eq!(surface.calls.last(), Some(&DrawCall::Alpha(1.0)));
    }

    #[test]
    fn fixed_hue_ignores_cursor() {
        let config = WallConfig {
            rainbow: false,
            base_hue_degrees: 200.0,
            ..Default::default()
        };
        assert_eq!(glyph_color(&config, 10.0, 30.0), glyph_color(&config, 300.0, 0.0));

        let rainbow = WallConfig::default();
        assert_ne!(glyph_color(&rainbow, 10.0, 0.0), glyph_color(&rainbow, 130.0, 0.0));
    }

    #[test]
    fn glow_follows_effects() {
        let mut ctx = context_with_nodes(1);
        ctx.frame = 10;
        ctx.ripples.push(RippleEvent::new(Vec2::new(50.0, 50.0), 0.0, 0));
        ctx.trails.spawn_burst(Vec2::ZERO, 4, &mut ctx.rng);

        let mut surface = RecordingSurface::new(100.0, 100.0);
        draw_frame(&mut surface, &ctx, &WallConfig::default());

        assert!(surface.calls.contains(&DrawCall::Blend(BlendMode::Additive)));
        let hearts = surface
            .calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Heart { .. }))
            .count();
        assert_eq!(hearts, 4);
        assert!(surface.calls.iter().any(|c| matches!(
            c,
            DrawCall::Circle { center, radius } if *center == Vec2::new(50.0, 50.0) && *radius > 0.0
        )));
    }
}
