use ::noise::{NoiseFn, Perlin};

use super::NoiseSource;

/// Gradient noise from the `noise` crate, remapped from \[-1, 1\] to \[0, 1\].
#[derive(Clone)]
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

impl Default for PerlinNoise {
    fn default() -> Self {
        Self::new(Perlin::DEFAULT_SEED)
    }
}

impl NoiseSource for PerlinNoise {
    fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        (self.perlin.get([x, y, z]) * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remapped_range() {
        let noise = PerlinNoise::new(42);
        for i in 0..1000 {
            let t = i as f64 * 0.173;
            let v = noise.noise(t, t * 0.5, 100.0 - t);
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
