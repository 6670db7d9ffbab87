//! Owned RGBA buffers and pixel-format normalization.
//!
//! `RgbaImage` is the packed 8-bit RGBA plane used by every other stage. The
//! stride counts bytes between the starts of consecutive rows, so a stride
//! larger than `width * 4` represents padded rows. Foreign layouts enter the
//! crate through [`ensure_rgba`], which is the identity for an `RgbaImage`.

use crate::util::{MapMatchError, MapMatchResult};

pub mod filter;
#[cfg(feature = "image-io")]
pub mod io;
pub mod mask;
pub mod scale;

/// Bytes per packed RGBA pixel.
pub const RGBA_CHANNELS: usize = 4;

/// Owned packed RGBA8 image with an explicit byte stride.
///
/// Equality compares dimensions and visible pixels; stride and row padding
/// are ignored.
#[derive(Clone, Debug)]
pub struct RgbaImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    stride: usize,
}

impl RgbaImage {
    /// Creates a fully transparent black image.
    pub fn new(width: usize, height: usize) -> MapMatchResult<Self> {
        let row_len = row_len(width, height)?;
        let needed = required_len(width, row_len, height, row_len)?;
        Ok(Self {
            data: vec![0u8; needed],
            width,
            height,
            stride: row_len,
        })
    }

    /// Wraps a contiguous RGBA buffer (`stride == width * 4`).
    pub fn from_vec(data: Vec<u8>, width: usize, height: usize) -> MapMatchResult<Self> {
        let row_len = row_len(width, height)?;
        let needed = required_len(width, row_len, height, row_len)?;
        if data.len() < needed {
            return Err(MapMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(MapMatchError::InvalidInput(
                "buffer length must equal width * height * 4",
            ));
        }
        Ok(Self {
            data,
            width,
            height,
            stride: row_len,
        })
    }

    /// Wraps an RGBA buffer whose rows are `stride` bytes apart.
    pub fn from_vec_with_stride(
        data: Vec<u8>,
        width: usize,
        height: usize,
        stride: usize,
    ) -> MapMatchResult<Self> {
        let row_len = row_len(width, height)?;
        let needed = required_len(width, row_len, height, stride)?;
        if data.len() < needed {
            return Err(MapMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in bytes between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing bytes including any row padding.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Byte offset of pixel `(x, y)`; callers guarantee bounds.
    #[inline]
    pub(crate) fn offset(&self, x: usize, y: usize) -> usize {
        y * self.stride + x * RGBA_CHANNELS
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = self.offset(x, y);
        let px = self.data.get(off..off + RGBA_CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Returns a mutable reference to the pixel at `(x, y)`.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut [u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = self.offset(x, y);
        self.data
            .get_mut(off..off + RGBA_CHANNELS)?
            .try_into()
            .ok()
    }

    /// Returns the packed bytes of row `y` (length `width * 4`).
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        self.data.get(start..start + self.width * RGBA_CHANNELS)
    }

    /// Returns the packed bytes of row `y` mutably.
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start + self.width * RGBA_CHANNELS;
        self.data.get_mut(start..end)
    }

    /// Copies the `width x height` region at `(x, y)` into a new contiguous image.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> MapMatchResult<Self> {
        let out_of_bounds = MapMatchError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        if width == 0 || height == 0 {
            return Err(MapMatchError::InvalidDimensions { width, height });
        }
        let end_x = x.checked_add(width).ok_or(out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or(out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let mut dst = Self::new(width, height)?;
        let len = width * RGBA_CHANNELS;
        for row in 0..height {
            let src = self.offset(x, y + row);
            let dst_start = row * dst.stride;
            dst.data[dst_start..dst_start + len].copy_from_slice(&self.data[src..src + len]);
        }
        Ok(dst)
    }

    /// Crops the region at a signed origin after intersecting it with the image.
    ///
    /// Returns [`MapMatchError::EmptyIntersection`] when nothing overlaps.
    pub fn crop_clipped(
        &self,
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    ) -> MapMatchResult<Self> {
        let empty = MapMatchError::EmptyIntersection {
            x,
            y,
            width,
            height,
        };
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width as i64).min(self.width as i64);
        let y1 = y.saturating_add(height as i64).min(self.height as i64);
        if x1 <= x0 || y1 <= y0 {
            return Err(empty);
        }
        self.crop(
            x0 as usize,
            y0 as usize,
            (x1 - x0) as usize,
            (y1 - y0) as usize,
        )
    }
}

impl PartialEq for RgbaImage {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && (0..self.height).all(|y| self.row(y) == other.row(y))
    }
}

impl Eq for RgbaImage {}

/// Byte layout of a foreign pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed R, G, B, A.
    Rgba8,
    /// Packed B, G, R, A (typical desktop capture layout).
    Bgra8,
    /// Packed R, G, B.
    Rgb8,
    /// Packed B, G, R.
    Bgr8,
    /// Single luminance channel.
    Gray8,
}

impl PixelFormat {
    /// Returns the number of bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => 3,
            PixelFormat::Gray8 => 1,
        }
    }

    #[inline]
    fn to_rgba(self, px: &[u8]) -> [u8; 4] {
        match self {
            PixelFormat::Rgba8 => [px[0], px[1], px[2], px[3]],
            PixelFormat::Bgra8 => [px[2], px[1], px[0], px[3]],
            PixelFormat::Rgb8 => [px[0], px[1], px[2], 255],
            PixelFormat::Bgr8 => [px[2], px[1], px[0], 255],
            PixelFormat::Gray8 => [px[0], px[0], px[0], 255],
        }
    }
}

/// Borrowed pixel buffer in any supported [`PixelFormat`].
#[derive(Clone, Copy, Debug)]
pub struct PackedImage<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
}

impl<'a> PackedImage<'a> {
    /// Creates a contiguous view (`stride == width * bytes_per_pixel`).
    pub fn from_slice(
        data: &'a [u8],
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> MapMatchResult<Self> {
        let stride = width
            .checked_mul(format.bytes_per_pixel())
            .ok_or(MapMatchError::InvalidDimensions { width, height })?;
        Self::new(data, width, height, stride, format)
    }

    /// Creates a view with an explicit byte stride.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> MapMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(MapMatchError::InvalidDimensions { width, height });
        }
        let row_len = width
            .checked_mul(format.bytes_per_pixel())
            .ok_or(MapMatchError::InvalidDimensions { width, height })?;
        let needed = required_len(width, row_len, height, stride)?;
        if data.len() < needed {
            return Err(MapMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    /// Returns the pixel layout of the view.
    pub fn format(&self) -> PixelFormat {
        self.format
    }
}

/// Conversion into the packed RGBA layout used by the matcher.
pub trait IntoRgba {
    /// Converts `self` into an owned RGBA image.
    fn into_rgba(self) -> MapMatchResult<RgbaImage>;
}

impl IntoRgba for RgbaImage {
    fn into_rgba(self) -> MapMatchResult<RgbaImage> {
        Ok(self)
    }
}

impl IntoRgba for &RgbaImage {
    fn into_rgba(self) -> MapMatchResult<RgbaImage> {
        Ok(self.clone())
    }
}

impl IntoRgba for PackedImage<'_> {
    fn into_rgba(self) -> MapMatchResult<RgbaImage> {
        let mut dst = RgbaImage::new(self.width, self.height)?;
        let bpp = self.format.bytes_per_pixel();
        for y in 0..self.height {
            let src_row = &self.data[y * self.stride..y * self.stride + self.width * bpp];
            let dst_start = y * dst.stride;
            let dst_row = &mut dst.data[dst_start..dst_start + self.width * RGBA_CHANNELS];
            for (src_px, dst_px) in src_row
                .chunks_exact(bpp)
                .zip(dst_row.chunks_exact_mut(RGBA_CHANNELS))
            {
                dst_px.copy_from_slice(&self.format.to_rgba(src_px));
            }
        }
        Ok(dst)
    }
}

/// Normalizes any supported pixel source into an owned [`RgbaImage`].
///
/// An `RgbaImage` passes through untouched, so the operation is idempotent.
pub fn ensure_rgba<I: IntoRgba>(image: I) -> MapMatchResult<RgbaImage> {
    image.into_rgba()
}

fn row_len(width: usize, height: usize) -> MapMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(MapMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(RGBA_CHANNELS)
        .ok_or(MapMatchError::InvalidDimensions { width, height })
}

fn required_len(
    width: usize,
    row_len: usize,
    height: usize,
    stride: usize,
) -> MapMatchResult<usize> {
    if stride < row_len {
        return Err(MapMatchError::InvalidStride { row_len, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(MapMatchError::InvalidDimensions { width, height })
}
