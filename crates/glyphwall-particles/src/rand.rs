//! Lightweight xorshift32 PRNG - no external crate needed

use glam::Vec2;
use std::f32::consts::TAU;

#[derive(Clone, Debug)]
pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // 24 high bits keep the result strictly below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns a random unit vector in the plane
    pub fn unit_vec2(&mut self) -> Vec2 {
        let angle = self.range(0.0, TAU);
        Vec2::new(angle.cos(), angle.sin())
    }

    /// Returns a point uniformly distributed inside a disk of `radius`
    pub fn point_in_disk(&mut self, radius: f32) -> Vec2 {
        self.unit_vec2() * radius * self.next_f32().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_range_bounds() {
        let mut rng = ParticleRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(0.0, 10.0);
            assert!(v >= 0.0 && v < 10.0);
        }
    }

    #[test]
    fn rng_is_deterministic() {
        let mut a = ParticleRng::new(7);
        let mut b = ParticleRng::new(7);
        for _ in 0..50 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn rng_unit_vec2_length() {
        let mut rng = ParticleRng::new(123);
        for _ in 0..100 {
            let d = rng.unit_vec2();
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn rng_disk_stays_inside() {
        let mut rng = ParticleRng::new(99);
        for _ in 0..200 {
            assert!(rng.point_in_disk(5.0).length() <= 5.0 + 1e-4);
        }
    }
}
