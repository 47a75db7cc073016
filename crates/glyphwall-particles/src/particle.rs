//! Lattice particle state

use glam::Vec2;

/// Per-node flight path while comet mode's window is live
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CometPath {
    /// Randomized point the node flies toward
    pub target: Vec2,
    /// Peak height of the parabolic arc in pixels
    pub arc: f32,
}

/// One glyph on the wall.
///
/// Anchor, phase, rotation, glyph and size are fixed at build time; only the
/// kinematic state and the optional comet path change between rebuilds.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleNode {
    /// Stable index assigned by the lattice builder
    pub index: usize,
    /// Rest position in surface pixels
    pub anchor: Vec2,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Oscillation phase offset (radial distance plus jitter)
    pub phase: f32,
    /// Static rotation jitter in radians
    pub rotation: f32,
    /// Index into the glyph alphabet
    pub glyph: usize,
    /// Font size in pixels
    pub size: f32,
    /// Hue offset in degrees, grows with distance from the lattice center
    pub hue_offset: f32,
    pub comet: Option<CometPath>,
}

impl ParticleNode {
    /// A node at rest on its anchor
    pub fn at_rest(index: usize, anchor: Vec2) -> Self {
        Self {
            index,
            anchor,
            position: anchor,
            velocity: Vec2::ZERO,
            phase: 0.0,
            rotation: 0.0,
            glyph: 0,
            size: 12.0,
            hue_offset: 0.0,
            comet: None,
        }
    }

    /// Current displacement from the anchor
    pub fn displacement(&self) -> Vec2 {
        self.position - self.anchor
    }

    /// Strand (0 or 1) used by the two-strand helix
    pub fn strand(&self) -> usize {
        self.index & 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_starts_on_anchor() {
        let n = ParticleNode::at_rest(3, Vec2::new(10.0, 20.0));
        assert_eq!(n.position, n.anchor);
        assert_eq!(n.displacement(), Vec2::ZERO);
        assert!(n.comet.is_none());
        assert_eq!(n.strand(), 1);
    }
}
