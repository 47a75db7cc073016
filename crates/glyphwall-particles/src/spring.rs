//! Smoothed spring integrator
//!
//! Each frame the node velocity is pulled toward the composed target by the
//! stiffness `k`, scaled by the damping `d`, and added to the position. The
//! coefficients themselves ease toward the active mode's profile so a mode
//! switch retunes the feel gradually instead of snapping.

use glam::Vec2;

use crate::particle::ParticleNode;

/// Fraction of the remaining coefficient gap closed per frame
pub const COEFFICIENT_SMOOTHING: f32 = 0.08;

/// Stiffness/damping pair a mode asks for
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringProfile {
    pub stiffness: f32,
    pub damping: f32,
    /// Return to `BASELINE` this long after the profile is applied
    pub auto_revert_ms: Option<f64>,
}

impl SpringProfile {
    /// Resting profile; over-damped so nodes settle without overshoot
    pub const BASELINE: Self = Self::new(0.045, 0.64);

    pub const fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
            auto_revert_ms: None,
        }
    }

    pub const fn reverting_after(self, ms: f64) -> Self {
        Self {
            auto_revert_ms: Some(ms),
            ..self
        }
    }

    /// True when the discrete update has real eigenvalues in (0, 1): a node
    /// released from rest approaches its target without overshooting.
    pub fn is_non_oscillating(&self) -> bool {
        let (k, d) = (self.stiffness, self.damping);
        if !(k > 0.0 && d > 0.0 && d < 1.0) {
            return false;
        }
        let edge = 1.0 - d.sqrt();
        d * k <= edge * edge
    }
}

/// Live coefficients plus the targets they ease toward
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringState {
    pub k_cur: f32,
    pub d_cur: f32,
    pub k_target: f32,
    pub d_target: f32,
}

impl Default for SpringState {
    fn default() -> Self {
        Self::settled(SpringProfile::BASELINE)
    }
}

impl SpringState {
    /// Current and target both at `profile`
    pub fn settled(profile: SpringProfile) -> Self {
        Self {
            k_cur: profile.stiffness,
            d_cur: profile.damping,
            k_target: profile.stiffness,
            d_target: profile.damping,
        }
    }

    /// Point the targets at a new profile; current values follow via `ease`
    pub fn retarget(&mut self, profile: SpringProfile) {
        self.k_target = profile.stiffness;
        self.d_target = profile.damping;
    }

    /// Move the live coefficients one smoothing step toward their targets
    pub fn ease(&mut self) {
        self.k_cur += (self.k_target - self.k_cur) * COEFFICIENT_SMOOTHING;
        self.d_cur += (self.d_target - self.d_cur) * COEFFICIENT_SMOOTHING;
    }

    /// Integrate one node toward `target`
    pub fn step(&self, node: &mut ParticleNode, target: Vec2) {
        node.velocity += (target - node.position) * self.k_cur;
        node.velocity *= self.d_cur;
        node.position += node.velocity;
    }
}
