//! Coherent noise sources consumed by the domain warp.

mod lattice;
mod perlin;

pub use lattice::LatticeNoise;
pub use perlin::PerlinNoise;

/// A smooth, deterministic 3D noise function.
///
/// Implementations must return values in \[0.0, 1.0\] and the same value for
/// the same inputs. They are shared read-only across render threads.
pub trait NoiseSource: Send + Sync {
    fn noise(&self, x: f64, y: f64, z: f64) -> f64;
}

/// A noise source that always returns the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn noise(&self, _: f64, _: f64, _: f64) -> f64 {
        self.0.clamp(0.0, 1.0)
    }
}

impl<T: NoiseSource + ?Sized> NoiseSource for &T {
    fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        (**self).noise(x, y, z)
    }
}

impl<T: NoiseSource + ?Sized> NoiseSource for Box<T> {
    fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        (**self).noise(x, y, z)
    }
}
