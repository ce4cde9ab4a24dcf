use rand::Rng;

use crate::{internal_util::to_channel, RenderParameters, Rgb};

const CONTRAST_GAIN: f64 = 20.0;
const GRAIN_AMPLITUDE: f64 = 80.0;
const BLEED_AMPLITUDE: f64 = 150.0;
const JITTER_AMPLITUDE: f64 = 1.5;

/// Grain, ink bleed and sample jitter amplitudes for texture mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texture {
    pub grain: f64,
    pub bleed: f64,
    pub jitter: f64,
}

impl Texture {
    /// Amplitudes for a strength in \[0, 100\]; values outside are clamped.
    pub fn from_strength(strength: f64) -> Self {
        let factor = strength.clamp(0.0, 100.0) / 100.0;
        Self {
            grain: GRAIN_AMPLITUDE * factor,
            bleed: BLEED_AMPLITUDE * factor,
            jitter: JITTER_AMPLITUDE * factor,
        }
    }
}

/// Turns sampled field values into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compositor {
    pub ink: Rgb,
    pub paper: Rgb,
    contrast_mult: f64,
    texture: Option<Texture>,
}

impl From<&RenderParameters> for Compositor {
    fn from(params: &RenderParameters) -> Self {
        let compositor = Self::new(params.color1, params.color2, params.contrast);
        if params.texture_mode {
            compositor.with_texture(Texture::from_strength(params.texture_strength))
        } else {
            compositor
        }
    }
}

impl Compositor {
    pub fn new(ink: Rgb, paper: Rgb, contrast: f64) -> Self {
        Self {
            ink,
            paper,
            contrast_mult: contrast_multiplier(contrast),
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn contrast_mult(&self) -> f64 {
        self.contrast_mult
    }

    /// Expand `value` around 0.5 by the contrast multiplier and clamp to \[0, 1\].
    pub fn adjust(&self, value: f64) -> f64 {
        ((value - 0.5) * self.contrast_mult + 0.5).clamp(0.0, 1.0)
    }

    /// Random offset for the traced sample coordinate, if texture mode is on.
    pub fn jitter<R: Rng>(&self, rng: &mut R) -> Option<(f64, f64)> {
        let texture = self.texture?;
        let dx = (rng.gen::<f64>() - 0.5) * texture.jitter;
        let dy = (rng.gen::<f64>() - 0.5) * texture.jitter;
        Some((dx, dy))
    }

    /// Shade one pixel from a sampled field value.
    ///
    /// `rng` is only drawn from in texture mode.
    pub fn shade<R: Rng>(&self, value: f64, rng: &mut R) -> [u8; 4] {
        let adjusted = self.adjust(value);
        let mut rgb = self.ink.lerp(&self.paper, adjusted);

        if let Some(texture) = self.texture {
            let grain = (rng.gen::<f64>() - 0.5) * texture.grain;
            rgb.iter_mut().for_each(|c| *c += grain);

            if adjusted < 0.5 {
                // 1.0 at pure ink, 0.0 at the midpoint.
                let bleed = texture.bleed * (0.5 - adjusted) * 2.0;
                for c in rgb.iter_mut() {
                    *c += (rng.gen::<f64>() - 0.5) * bleed;
                }
            }
        }

        [to_channel(rgb[0]), to_channel(rgb[1]), to_channel(rgb[2]), 255]
    }
}

/// `1 + (contrast / 100) * 20`, with contrast clamped to \[0, 100\].
pub fn contrast_multiplier(contrast: f64) -> f64 {
    1.0 + contrast.clamp(0.0, 100.0) / 100.0 * CONTRAST_GAIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    #[test]
    fn test_contrast_multiplier() {
        assert_eq!(contrast_multiplier(0.0), 1.0);
        assert_eq!(contrast_multiplier(50.0), 11.0);
        assert_eq!(contrast_multiplier(100.0), 21.0);
        assert_eq!(contrast_multiplier(-20.0), 1.0);
        assert_eq!(contrast_multiplier(400.0), 21.0);
    }

    #[test]
    fn test_contrast_fifty_is_not_identity() {
        let compositor = Compositor::new(Rgb::BLACK, Rgb::WHITE, 50.0);
        assert!((compositor.adjust(0.52) - 0.72).abs() < 1e-9);
        assert_eq!(compositor.adjust(0.25), 0.0);
        assert_eq!(compositor.adjust(0.5), 0.5);
    }

    #[test]
    fn test_adjust_is_monotonic() {
        for contrast in [0.0, 25.0, 50.0, 100.0] {
            let compositor = Compositor::new(Rgb::BLACK, Rgb::WHITE, contrast);
            let mut prev = compositor.adjust(0.0);
            for i in 1..=1000 {
                let next = compositor.adjust(i as f64 / 1000.0);
                assert!(next >= prev);
                prev = next;
            }
        }
    }

    #[test]
    fn test_endpoints_are_exact_colors() {
        let ink = Rgb(12, 200, 7);
        let paper = Rgb(250, 3, 99);
        let compositor = Compositor::new(ink, paper, 0.0);
        assert_eq!(compositor.shade(0.0, &mut rng()), [12, 200, 7, 255]);
        assert_eq!(compositor.shade(1.0, &mut rng()), [250, 3, 99, 255]);
    }

    #[test]
    fn test_linear_gray() {
        let compositor = Compositor::new(Rgb::BLACK, Rgb::WHITE, 0.0);
        assert_eq!(compositor.shade(0.25, &mut rng()), [64, 64, 64, 255]);
    }

    #[test]
    fn test_zero_strength_texture_matches_plain() {
        let plain = Compositor::new(Rgb(35, 35, 40), Rgb(250, 247, 242), 30.0);
        let textured = plain.with_texture(Texture::from_strength(0.0));
        let mut rng = rng();
        for i in 0..=100 {
            let value = i as f64 / 100.0;
            assert_eq!(textured.jitter(&mut rng), Some((0.0, 0.0)));
            assert_eq!(textured.shade(value, &mut rng), plain.shade(value, &mut rng));
        }
    }

    #[test]
    fn test_texture_bounds() {
        let compositor = Compositor::new(Rgb(128, 128, 128), Rgb(128, 128, 128), 0.0)
            .with_texture(Texture::from_strength(100.0));
        let mut rng = rng();
        for _ in 0..1000 {
            // Pure ink: grain ±40 plus bleed ±75.
            let [r, g, b, a] = compositor.shade(0.0, &mut rng);
            for c in [r, g, b] {
                assert!((128 - 115..=128 + 115).contains(&(c as i32)));
            }
            assert_eq!(a, 255);

            // Paper side: grain only, identical on every channel.
            let [r, g, b, _] = compositor.shade(1.0, &mut rng);
            assert!((128 - 40..=128 + 40).contains(&(r as i32)));
            assert_eq!(r, g);
            assert_eq!(g, b);

            let (dx, dy) = compositor.jitter(&mut rng).unwrap();
            assert!(dx.abs() <= 0.75 && dy.abs() <= 0.75);
        }
    }

    #[test]
    fn test_bleed_is_per_channel() {
        let compositor = Compositor::new(Rgb(128, 128, 128), Rgb::WHITE, 0.0)
            .with_texture(Texture::from_strength(100.0));
        let mut rng = rng();
        let uneven = (0..100).any(|_| {
            let [r, g, b, _] = compositor.shade(0.0, &mut rng);
            r != g || g != b
        });
        assert!(uneven);
    }

    #[test]
    fn test_plain_does_not_need_randomness() {
        let compositor = Compositor::new(Rgb::BLACK, Rgb::WHITE, 50.0);
        assert_eq!(compositor.jitter(&mut rng()), None);
        let mut a = rng();
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(compositor.shade(0.6, &mut a), compositor.shade(0.6, &mut b));
    }
}
