use std::f64::consts::PI;

use crate::{internal_util::distance, FieldKey, PatternType, RenderError};

/// A square grid of scalars in \[0.0, 1.0\], sampled by the warp pass.
///
/// A field is only valid for the [`FieldKey`] it was generated from; callers
/// replace it wholesale instead of mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternField {
    key: FieldKey,
    values: Vec<f64>,
}

impl PatternField {
    pub fn generate(
        size: u32,
        band_width: f64,
        pattern_type: PatternType,
    ) -> Result<Self, RenderError> {
        Self::from_key(FieldKey {
            canvas_size: size,
            band_width,
            pattern_type,
        })
    }

    pub fn from_key(key: FieldKey) -> Result<Self, RenderError> {
        key.validate()?;

        let size = key.canvas_size as usize;
        let center = (key.canvas_size as f64 / 2.0, key.canvas_size as f64 / 2.0);
        let mut values = vec![0.0; size * size];

        for (y, row) in values.chunks_mut(size).enumerate() {
            for (x, value) in row.iter_mut().enumerate() {
                *value = pattern_value(key.pattern_type, x as f64, y as f64, key.band_width, center);
            }
        }

        Ok(Self { key, values })
    }

    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    pub fn size(&self) -> u32 {
        self.key.canvas_size
    }

    /// Value at an in-bounds cell.
    ///
    /// # Panics
    /// If `x` or `y` is not below [`Self::size`].
    pub fn value(&self, x: u32, y: u32) -> f64 {
        self.values[x as usize + y as usize * self.key.canvas_size as usize]
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x < self.size() && y < self.size() {
            Some(self.value(x, y))
        } else {
            None
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

fn pattern_value(
    pattern_type: PatternType,
    x: f64,
    y: f64,
    band_width: f64,
    center: (f64, f64),
) -> f64 {
    let wave = |t: f64| (t / band_width * PI).sin();
    let v = match pattern_type {
        PatternType::Checkerboard => wave(x) * wave(y),
        PatternType::Stripes => wave(x),
        PatternType::Circles => wave(distance((x, y), center)),
    };
    v * 0.5 + 0.5
}
