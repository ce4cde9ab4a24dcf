use std::f64::consts::TAU;

use crate::{internal_util::map_range, noise::NoiseSource, RenderParameters};

/// Offset added to the seed when sampling the vertical displacement so the
/// two axes do not move in lockstep.
pub const Y_CHANNEL_SEED_OFFSET: f64 = 100.0;

/// How noise values in \[0, 1\] become pixel offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplacementMode {
    /// `map(n, 0..1, -amt..amt)`.
    Linear,
    /// `sin(n * 2π) * amt`, centered on zero for noise near its mean.
    Turbulent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpParameters {
    pub noise_scale: f64,
    pub displacement_amt: f64,
    pub steps: u32,
    pub seed: f64,
    pub mode: DisplacementMode,
}

impl From<&RenderParameters> for WarpParameters {
    fn from(params: &RenderParameters) -> Self {
        Self {
            noise_scale: params.noise_scale,
            displacement_amt: params.displacement_amt,
            steps: params.distortion_steps.max(1),
            seed: params.seed,
            mode: if params.turbulence {
                DisplacementMode::Turbulent
            } else {
                DisplacementMode::Linear
            },
        }
    }
}

impl WarpParameters {
    fn displacement(&self, n: f64) -> f64 {
        match self.mode {
            DisplacementMode::Linear => {
                map_range(n, 0.0, 1.0, -self.displacement_amt, self.displacement_amt)
            }
            DisplacementMode::Turbulent => (n * TAU).sin() * self.displacement_amt,
        }
    }

    /// Follow the noise from `(x, y)` for `steps` iterations and return where
    /// the trace ends up. The result may lie outside the canvas.
    pub fn trace(&self, x: f64, y: f64, noise: &impl NoiseSource) -> (f64, f64) {
        let (mut tx, mut ty) = (x, y);
        for _ in 0..self.steps {
            let (nx, ny) = (tx * self.noise_scale, ty * self.noise_scale);
            let dx = self.displacement(noise.noise(nx, ny, self.seed));
            let dy = self.displacement(noise.noise(nx, ny, self.seed + Y_CHANNEL_SEED_OFFSET));
            tx += dx;
            ty += dy;
        }
        (tx, ty)
    }
}

/// Floor a traced coordinate and clamp each axis into `0..size`.
pub fn sample_index(x: f64, y: f64, size: u32) -> (u32, u32) {
    let clamp = |v: f64| (v.floor().max(0.0) as u64).min(size.saturating_sub(1) as u64) as u32;
    (clamp(x), clamp(y))
}
