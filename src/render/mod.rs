//! Render orchestration: field caching, the per-pixel pass and publishing.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

use image::RgbaImage;
use log::{debug, trace};
use rand::{
    rngs::{mock::StepRng, StdRng},
    Rng, SeedableRng,
};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    composite::Compositor,
    field::PatternField,
    internal_util::hash_2d,
    noise::{LatticeNoise, NoiseSource},
    warp::{sample_index, WarpParameters},
    RenderError, RenderParameters,
};

mod buffer;

pub use buffer::{OutputBuffer, DEFAULT_EXPORT_NAME};

/// Where texture-mode grain, bleed and jitter get their randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureRandomness {
    /// Fresh entropy on every render; textured output differs run to run.
    #[default]
    Organic,
    /// Per-row generators seeded from a SplitMix64 mix of the row index and
    /// this seed. Textured renders repeat exactly for the same `rand` release.
    Seeded(u64),
}

impl TextureRandomness {
    fn row_rng(&self, row: u32) -> StdRng {
        match *self {
            Self::Organic => StdRng::from_entropy(),
            Self::Seeded(seed) => StdRng::seed_from_u64(hash_2d(row as i64, 0, seed)),
        }
    }
}

/// Lets other threads mark the current render as stale.
///
/// Every call to [`Renderer::render`] takes a ticket; a render whose ticket is
/// no longer the newest stops at the next row and is never published.
#[derive(Debug, Clone, Default)]
pub struct RenderHandle {
    requests: Arc<AtomicU64>,
}

impl RenderHandle {
    /// Announce a newer request, abandoning any render in flight.
    pub fn supersede(&self) {
        self.requests.fetch_add(1, Ordering::AcqRel);
    }

    fn take_ticket(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.requests.load(Ordering::Acquire) == ticket
    }
}

/// Owns the cached pattern field and the last published render.
pub struct Renderer<N: NoiseSource> {
    noise: N,
    texture_randomness: TextureRandomness,
    field: Option<Arc<PatternField>>,
    handle: RenderHandle,
    latest: Option<Arc<OutputBuffer>>,
}

impl Default for Renderer<LatticeNoise> {
    fn default() -> Self {
        Self::new(LatticeNoise::default())
    }
}

impl<N: NoiseSource> Renderer<N> {
    pub fn new(noise: N) -> Self {
        Self {
            noise,
            texture_randomness: TextureRandomness::default(),
            field: None,
            handle: RenderHandle::default(),
            latest: None,
        }
    }

    pub fn with_texture_randomness(mut self, texture_randomness: TextureRandomness) -> Self {
        self.texture_randomness = texture_randomness;
        self
    }

    pub fn handle(&self) -> RenderHandle {
        self.handle.clone()
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    /// The cached field, if any render has built one.
    pub fn field(&self) -> Option<&Arc<PatternField>> {
        self.field.as_ref()
    }

    /// The most recent render that ran to completion without being superseded.
    pub fn latest(&self) -> Option<Arc<OutputBuffer>> {
        self.latest.clone()
    }

    /// Drop the cached field and the published buffer.
    pub fn clear(&mut self) {
        self.field = None;
        self.latest = None;
    }

    /// Render `params`, regenerating the pattern field only if its structural
    /// parameters changed.
    pub fn render(&mut self, params: &RenderParameters) -> Result<Arc<OutputBuffer>, RenderError> {
        params.validate()?;
        let ticket = self.handle.take_ticket();
        let started = Instant::now();

        let field = self.prepare_field(params)?;
        let image = render_pass(
            &field,
            params,
            &self.noise,
            self.texture_randomness,
            || self.handle.is_current(ticket),
        )?;

        if !self.handle.is_current(ticket) {
            debug!("render {} superseded after the pass", ticket);
            return Err(RenderError::Superseded);
        }

        let buffer = Arc::new(OutputBuffer::from_image(image));
        self.latest = Some(buffer.clone());
        trace!(
            "published render {} ({}x{}) in {:?}",
            ticket,
            params.canvas_size,
            params.canvas_size,
            started.elapsed()
        );
        Ok(buffer)
    }

    fn prepare_field(&mut self, params: &RenderParameters) -> Result<Arc<PatternField>, RenderError> {
        let key = params.field_key();
        match &self.field {
            Some(field) if *field.key() == key => {
                debug!("reusing pattern field {:?}", key);
                Ok(field.clone())
            }
            _ => {
                debug!("generating pattern field {:?}", key);
                let field = Arc::new(PatternField::from_key(key)?);
                self.field = Some(field.clone());
                Ok(field)
            }
        }
    }
}

/// Warp and shade every pixel of a `field`-sized image.
///
/// `is_current` is polled once per row; when it returns false the pass stops
/// and [`RenderError::Superseded`] is returned.
pub fn render_pass(
    field: &PatternField,
    params: &RenderParameters,
    noise: &impl NoiseSource,
    texture_randomness: TextureRandomness,
    is_current: impl Fn() -> bool + Sync,
) -> Result<RgbaImage, RenderError> {
    let size = field.size();
    let warp = WarpParameters::from(params);
    let compositor = Compositor::from(params);
    let textured = compositor.texture().is_some();

    let mut image = RgbaImage::new(size, size);
    let row_len = size as usize * 4;

    let shade_row = |(y, row): (usize, &mut [u8])| -> Result<(), RenderError> {
        if !is_current() {
            return Err(RenderError::Superseded);
        }
        let y = y as u32;
        if textured {
            let mut rng = texture_randomness.row_rng(y);
            shade_pixels(row, y, field, &warp, &compositor, noise, &mut rng);
        } else {
            // nothing is drawn without texture
            shade_pixels(row, y, field, &warp, &compositor, noise, &mut StepRng::new(0, 0));
        }
        Ok(())
    };

    #[cfg(feature = "rayon")]
    image
        .par_chunks_mut(row_len)
        .enumerate()
        .try_for_each(shade_row)?;

    #[cfg(not(feature = "rayon"))]
    image
        .chunks_mut(row_len)
        .enumerate()
        .try_for_each(shade_row)?;

    Ok(image)
}

fn shade_pixels<R: Rng>(
    row: &mut [u8],
    y: u32,
    field: &PatternField,
    warp: &WarpParameters,
    compositor: &Compositor,
    noise: &impl NoiseSource,
    rng: &mut R,
) {
    let size = field.size();
    for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
        let (mut sx, mut sy) = warp.trace(x as f64, y as f64, noise);
        if let Some((jx, jy)) = compositor.jitter(rng) {
            sx += jx;
            sy += jy;
        }
        let (ix, iy) = sample_index(sx, sy, size);
        pixel.copy_from_slice(&compositor.shade(field.value(ix, iy), rng));
    }
}
