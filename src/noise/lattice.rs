use rand::{rngs::StdRng, Rng, SeedableRng};

use super::NoiseSource;

const Y_WRAP_BITS: u32 = 4;
const Y_WRAP: i64 = 1 << Y_WRAP_BITS;
const Z_WRAP_BITS: u32 = 8;
const Z_WRAP: i64 = 1 << Z_WRAP_BITS;
const TABLE_MASK: i64 = 4095;

/// Multi-octave lattice value noise with cosine smoothing.
///
/// Each octave samples a 4096-entry table of random values at the corners of
/// an integer lattice cell and blends them with a half-cosine curve. Octaves
/// double in frequency and are weighted by `falloff` starting from 0.5, so the
/// result stays within \[0.0, 1.0\] for any `falloff` in \[0.0, 1.0\).
#[derive(Debug, Clone)]
pub struct LatticeNoise {
    table: Vec<f64>,
    octaves: u32,
    falloff: f64,
}

impl LatticeNoise {
    pub const DEFAULT_OCTAVES: u32 = 4;
    pub const DEFAULT_FALLOFF: f64 = 0.5;

    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let table = (0..=TABLE_MASK).map(|_| rng.gen::<f64>()).collect();
        Self {
            table,
            octaves: Self::DEFAULT_OCTAVES,
            falloff: Self::DEFAULT_FALLOFF,
        }
    }

    /// Change the octave count (at least one) and per-octave falloff.
    pub fn with_detail(mut self, octaves: u32, falloff: f64) -> Self {
        self.octaves = octaves.max(1);
        self.falloff = falloff.clamp(0.0, 1.0);
        self
    }

    fn at(&self, offset: i64) -> f64 {
        self.table[(offset & TABLE_MASK) as usize]
    }
}

impl Default for LatticeNoise {
    fn default() -> Self {
        Self::new(0)
    }
}

fn scaled_cosine(t: f64) -> f64 {
    0.5 * (1.0 - (t * std::f64::consts::PI).cos())
}

fn split(v: f64) -> (i64, f64) {
    let v = v.abs();
    let i = v.floor();
    (i as i64, v - i)
}

impl NoiseSource for LatticeNoise {
    fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        let (mut xi, mut xf) = split(x);
        let (mut yi, mut yf) = split(y);
        let (mut zi, mut zf) = split(z);

        let mut result = 0.0;
        let mut amplitude = 0.5;

        for _ in 0..self.octaves {
            let mut offset = xi
                .wrapping_add(yi.wrapping_shl(Y_WRAP_BITS))
                .wrapping_add(zi.wrapping_shl(Z_WRAP_BITS));

            let rxf = scaled_cosine(xf);
            let ryf = scaled_cosine(yf);

            let mut n1 = self.at(offset);
            n1 += rxf * (self.at(offset.wrapping_add(1)) - n1);
            let mut n2 = self.at(offset.wrapping_add(Y_WRAP));
            n2 += rxf * (self.at(offset.wrapping_add(Y_WRAP + 1)) - n2);
            n1 += ryf * (n2 - n1);

            offset = offset.wrapping_add(Z_WRAP);
            n2 = self.at(offset);
            n2 += rxf * (self.at(offset.wrapping_add(1)) - n2);
            let mut n3 = self.at(offset.wrapping_add(Y_WRAP));
            n3 += rxf * (self.at(offset.wrapping_add(Y_WRAP + 1)) - n3);
            n2 += ryf * (n3 - n2);

            n1 += scaled_cosine(zf) * (n2 - n1);

            result += n1 * amplitude;
            amplitude *= self.falloff;

            for (i, f) in [(&mut xi, &mut xf), (&mut yi, &mut yf), (&mut zi, &mut zf)] {
                *i = i.wrapping_shl(1);
                *f *= 2.0;
                if *f >= 1.0 {
                    *i = i.wrapping_add(1);
                    *f -= 1.0;
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_and_determinism() {
        let a = LatticeNoise::new(7);
        let b = LatticeNoise::new(7);
        for i in 0..2000 {
            let x = i as f64 * 0.137 - 40.0;
            let y = i as f64 * 0.051;
            let z = (i % 13) as f64 * 3.3;
            let v = a.noise(x, y, z);
            assert!((0.0..=1.0).contains(&v), "noise {} out of range", v);
            assert_eq!(v, b.noise(x, y, z));
        }
    }

    #[test]
    fn test_continuity() {
        let noise = LatticeNoise::new(1);
        let mut prev = noise.noise(0.0, 0.5, 0.0);
        for i in 1..1000 {
            let v = noise.noise(i as f64 * 1e-3, 0.5, 0.0);
            assert!((v - prev).abs() < 0.05, "jump of {} at step {}", v - prev, i);
            prev = v;
        }
    }

    #[test]
    fn test_seeds_differ() {
        let a = LatticeNoise::new(1);
        let b = LatticeNoise::new(2);
        let differs = (0..100).any(|i| {
            let x = i as f64 * 0.31;
            a.noise(x, x, 0.0) != b.noise(x, x, 0.0)
        });
        assert!(differs);
    }

    #[test]
    fn test_single_octave_hits_table_on_lattice() {
        let noise = LatticeNoise::new(3).with_detail(1, 0.5);
        assert_eq!(noise.noise(0.0, 0.0, 0.0), noise.table[0] * 0.5);
        assert_eq!(noise.noise(2.0, 0.0, 0.0), noise.table[2] * 0.5);
    }
}
