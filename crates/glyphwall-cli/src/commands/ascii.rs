//! Character-grid drawing surface for terminal previews

use glam::Vec2;
use glyphwall_core::{Color, Rect};
use glyphwall_particles::{BlendMode, DrawSurface, TextAlign, TextBaseline};

const EMPTY: char = ' ';

/// Rasterizes wall draw calls into a coarse character grid.
///
/// Glyphs become `*`, trail sparks `.`, ripple and pulse rings `~`. Terminal
/// cells are about twice as tall as wide, so rows are halved.
pub struct AsciiSurface {
    size: Vec2,
    cols: usize,
    rows: usize,
    cells: Vec<char>,
    pub glyph_calls: usize,
    pub glow_calls: usize,
}

impl AsciiSurface {
    pub fn new(width: f32, height: f32, cols: usize) -> Self {
        let cols = cols.max(1);
        let aspect = if width > 0.0 { height / width } else { 1.0 };
        let rows = ((cols as f32 * aspect * 0.5).round() as usize).max(1);
        Self {
            size: Vec2::new(width, height),
            cols,
            rows,
            cells: vec![EMPTY; cols * rows],
            glyph_calls: 0,
            glow_calls: 0,
        }
    }

    fn cell(&self, p: Vec2) -> Option<usize> {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return None;
        }
        let cx = (p.x / self.size.x * self.cols as f32).floor();
        let cy = (p.y / self.size.y * self.rows as f32).floor();
        if cx < 0.0 || cy < 0.0 || cx >= self.cols as f32 || cy >= self.rows as f32 {
            return None;
        }
        Some(cy as usize * self.cols + cx as usize)
    }

    /// Write `ch` unless something already occupies the cell
    fn mark(&mut self, p: Vec2, ch: char) {
        if let Some(i) = self.cell(p) {
            if self.cells[i] == EMPTY {
                self.cells[i] = ch;
            }
        }
    }

    pub fn render(&self) -> String {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DrawSurface for AsciiSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, region: Rect) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let p = Vec2::new(
                    (col as f32 + 0.5) / self.cols as f32 * self.size.x,
                    (row as f32 + 0.5) / self.rows as f32 * self.size.y,
                );
                if region.contains(p) {
                    self.cells[row * self.cols + col] = EMPTY;
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, _color: Color, _blur: f32) {
        self.glow_calls += 1;
        // Outline only, so rings never bury the glyphs
        let steps = ((radius * 0.5).ceil() as usize).clamp(8, 96);
        for i in 0..steps {
            let a = i as f32 / steps as f32 * std::f32::consts::TAU;
            self.mark(center + Vec2::new(a.cos(), a.sin()) * radius, '~');
        }
    }

    fn fill_heart(&mut self, center: Vec2, _size: f32, _color: Color, _blur: f32) {
        self.glow_calls += 1;
        self.mark(center, '.');
    }

    fn draw_glyph(
        &mut self,
        _glyph: char,
        position: Vec2,
        _font_size: f32,
        _rotation: f32,
        _color: Color,
        _align: TextAlign,
        _baseline: TextBaseline,
    ) {
        self.glyph_calls += 1;
        if let Some(i) = self.cell(position) {
            self.cells[i] = '*';
        }
    }

    fn set_alpha(&mut self, _alpha: f32) {}

    fn set_blend(&mut self, _mode: BlendMode) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_land_in_cells() {
        let mut s = AsciiSurface::new(100.0, 100.0, 10);
        assert_eq!(s.rows, 5);
        s.draw_glyph(
            'x',
            Vec2::new(55.0, 30.0),
            10.0,
            0.0,
            Color::WHITE,
            TextAlign::Center,
            TextBaseline::Middle,
        );
        // Off-surface glyphs are dropped
        s.draw_glyph(
            'x',
            Vec2::new(-5.0, 30.0),
            10.0,
            0.0,
            Color::WHITE,
            TextAlign::Center,
            TextBaseline::Middle,
        );
        let text = s.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "     *");
        assert_eq!(s.glyph_calls, 2);

        s.clear(Rect::from_size(100.0, 100.0));
        assert!(s.render().trim().is_empty());
    }

    #[test]
    fn glow_does_not_cover_glyphs() {
        let mut s = AsciiSurface::new(100.0, 100.0, 10);
        s.draw_glyph(
            'x',
            Vec2::new(5.0, 5.0),
            10.0,
            0.0,
            Color::WHITE,
            TextAlign::Center,
            TextBaseline::Middle,
        );
        s.fill_heart(Vec2::new(5.0, 5.0), 2.0, Color::WHITE, 0.0);
        s.fill_heart(Vec2::new(25.0, 5.0), 2.0, Color::WHITE, 0.0);
        assert_eq!(s.render().lines().next(), Some("* ."));
    }
}
