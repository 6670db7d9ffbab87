//! Validity masks for circular minimap crops.

use crate::image::{RgbaImage, RGBA_CHANNELS};
use crate::util::{MapMatchError, MapMatchResult};

/// Radius in pixels of the central player-arrow exclusion zone.
pub const PLAYER_ARROW_RADIUS: f64 = 10.0;

/// Mask value marking a valid pixel.
pub const MASK_VALID: u8 = 255;

/// Per-pixel validity bitmap (`255` valid, `0` ignored).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl AlphaMask {
    /// Creates a mask with every pixel valid.
    pub fn filled(width: usize, height: usize) -> MapMatchResult<Self> {
        let len = mask_len(width, height)?;
        Ok(Self {
            data: vec![MASK_VALID; len],
            width,
            height,
        })
    }

    /// Wraps a row-major mask buffer; any non-zero value counts as valid.
    pub fn from_vec(data: Vec<u8>, width: usize, height: usize) -> MapMatchResult<Self> {
        let len = mask_len(width, height)?;
        if data.len() != len {
            return Err(MapMatchError::BufferTooSmall {
                needed: len,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the mask width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the mask height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major mask values.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns whether `(x, y)` is inside the mask and valid.
    #[inline]
    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.data[y * self.width + x] != 0
    }

    /// Counts valid pixels.
    pub fn count_valid(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    pub(crate) fn check_matches(&self, img: &RgbaImage) -> MapMatchResult<()> {
        if self.width != img.width() || self.height != img.height() {
            return Err(MapMatchError::MaskMismatch {
                mask_width: self.width,
                mask_height: self.height,
                img_width: img.width(),
                img_height: img.height(),
            });
        }
        Ok(())
    }
}

/// Builds the ring mask for a circular minimap of size `width x height`.
///
/// A pixel is valid when `inner² < d² <= outer²`, with `d` measured from the
/// image center to the pixel center, `outer = min(w, h) / 2` and the inner
/// radius set to [`PLAYER_ARROW_RADIUS`].
pub fn generate_circular_mask(width: usize, height: usize) -> MapMatchResult<AlphaMask> {
    generate_ring_mask(width, height, PLAYER_ARROW_RADIUS)
}

/// Builds a ring mask with a caller-chosen inner exclusion radius.
///
/// The outer boundary is inclusive and the inner boundary exclusive.
pub fn generate_ring_mask(
    width: usize,
    height: usize,
    inner_radius: f64,
) -> MapMatchResult<AlphaMask> {
    if !inner_radius.is_finite() || inner_radius < 0.0 {
        return Err(MapMatchError::InvalidInput("inner radius must be finite and >= 0"));
    }
    let len = mask_len(width, height)?;
    let mut data = vec![0u8; len];

    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let outer = cx.min(cy);
    let outer_sq = outer * outer;
    let inner_sq = inner_radius * inner_radius;

    for y in 0..height {
        let dy = y as f64 - cy + 0.5;
        let row = &mut data[y * width..(y + 1) * width];
        for (x, value) in row.iter_mut().enumerate() {
            let dx = x as f64 - cx + 0.5;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq <= outer_sq && dist_sq > inner_sq {
                *value = MASK_VALID;
            }
        }
    }

    Ok(AlphaMask {
        data,
        width,
        height,
    })
}

/// Clears every pixel the mask marks invalid to transparent black.
pub fn apply_mask(img: &mut RgbaImage, mask: &AlphaMask) -> MapMatchResult<()> {
    mask.check_matches(img)?;
    let width = img.width();
    for y in 0..img.height() {
        let mask_row = &mask.data[y * width..(y + 1) * width];
        let Some(row) = img.row_mut(y) else {
            continue;
        };
        for (px, &m) in row.chunks_exact_mut(RGBA_CHANNELS).zip(mask_row) {
            if m == 0 {
                px.fill(0);
            }
        }
    }
    Ok(())
}

fn mask_len(width: usize, height: usize) -> MapMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(MapMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(MapMatchError::InvalidDimensions { width, height })
}
