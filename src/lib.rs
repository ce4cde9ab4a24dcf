//! Domain-warped contour rendering.
//!
//! A scalar [`field::PatternField`] (rings, stripes or a soft checkerboard) is
//! sampled through coordinates that have been pushed around by coherent noise
//! ([`warp`]), then shaded between two colors with optional paper grain and
//! ink bleed ([`composite`]). [`render::Renderer`] ties the stages together and
//! caches the field between renders.

mod color;
mod error;
mod internal_util;

pub mod composite;
pub mod field;
pub mod noise;
pub mod render;
pub mod warp;

pub use color::Rgb;
pub use error::RenderError;

/// Largest accepted `canvas_size`; a 16384² RGBA buffer is 1 GiB.
pub const MAX_CANVAS_SIZE: u32 = 16384;

/// Base pattern sampled by the warp pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PatternType {
    #[default]
    Circles,
    Checkerboard,
    Stripes,
}

/// The parameters a [`field::PatternField`] depends on.
///
/// Two renders whose keys compare equal can share the same field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldKey {
    pub canvas_size: u32,
    pub band_width: f64,
    pub pattern_type: PatternType,
}

impl FieldKey {
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.canvas_size == 0 {
            return Err(RenderError::invalid("canvas_size", "must be positive"));
        }
        let side = self.canvas_size as usize;
        let fits = side.checked_mul(side).and_then(|n| n.checked_mul(4)).is_some();
        if self.canvas_size > MAX_CANVAS_SIZE || !fits {
            return Err(RenderError::invalid(
                "canvas_size",
                format!("must be at most {}, got {}", MAX_CANVAS_SIZE, self.canvas_size),
            ));
        }
        if !(self.band_width.is_finite() && self.band_width > 0.0) {
            return Err(RenderError::invalid(
                "band_width",
                format!("must be positive and finite, got {}", self.band_width),
            ));
        }
        Ok(())
    }
}

/// Everything a single render depends on.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct RenderParameters {
    /// Side length of the square output, in pixels.
    pub canvas_size: u32,
    pub pattern_type: PatternType,
    /// Spatial period of the base pattern, in pixels.
    pub band_width: f64,
    /// Spatial frequency fed to the noise source.
    pub noise_scale: f64,
    /// Largest offset a single warp step can apply, in pixels.
    pub displacement_amt: f64,
    pub distortion_steps: u32,
    /// Third noise coordinate.
    pub seed: f64,
    /// Use the zero-centered sine remap instead of the linear one.
    pub turbulence: bool,
    /// Edge sharpness in \[0, 100\].
    pub contrast: f64,
    /// Ink end of the gradient.
    pub color1: Rgb,
    /// Paper end of the gradient.
    pub color2: Rgb,
    pub texture_mode: bool,
    /// Grain, bleed and jitter strength in \[0, 100\].
    pub texture_strength: f64,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            canvas_size: 800,
            pattern_type: PatternType::Circles,
            band_width: 12.0,
            noise_scale: 0.005,
            displacement_amt: 100.0,
            distortion_steps: 1,
            seed: 0.0,
            turbulence: false,
            contrast: 50.0,
            color1: Rgb::BLACK,
            color2: Rgb::WHITE,
            texture_mode: false,
            texture_strength: 50.0,
        }
    }
}

impl RenderParameters {
    pub fn field_key(&self) -> FieldKey {
        FieldKey {
            canvas_size: self.canvas_size,
            band_width: self.band_width,
            pattern_type: self.pattern_type,
        }
    }

    /// The same parameters with ink and paper swapped.
    pub fn inverted(&self) -> Self {
        Self {
            color1: self.color2,
            color2: self.color1,
            ..self.clone()
        }
    }

    /// Reject parameters that cannot be rendered.
    ///
    /// Contrast and texture strength only need to be finite; they are clamped
    /// into \[0, 100\] when shading.
    pub fn validate(&self) -> Result<(), RenderError> {
        self.field_key().validate()?;
        if self.distortion_steps == 0 {
            return Err(RenderError::invalid("distortion_steps", "must be at least 1"));
        }
        if !(self.noise_scale.is_finite() && self.noise_scale > 0.0) {
            return Err(RenderError::invalid(
                "noise_scale",
                format!("must be positive and finite, got {}", self.noise_scale),
            ));
        }
        if !(self.displacement_amt.is_finite() && self.displacement_amt >= 0.0) {
            return Err(RenderError::invalid(
                "displacement_amt",
                format!("must be non-negative and finite, got {}", self.displacement_amt),
            ));
        }
        if !self.seed.is_finite() {
            return Err(RenderError::invalid("seed", "must be finite"));
        }
        if !self.contrast.is_finite() {
            return Err(RenderError::invalid("contrast", "must be finite"));
        }
        if !self.texture_strength.is_finite() {
            return Err(RenderError::invalid("texture_strength", "must be finite"));
        }
        Ok(())
    }
}
