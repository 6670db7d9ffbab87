//! Integer-factor nearest-neighbor downscaling.
//!
//! Output pixel `(x, y)` copies source pixel `(x * scale, y * scale)`; the
//! output size is `floor(w / scale) x floor(h / scale)`.

use crate::image::{RgbaImage, RGBA_CHANNELS};
use crate::util::{MapMatchError, MapMatchResult};

/// Returns the output size for `scale`, rejecting degenerate results.
pub fn downscaled_size(
    width: usize,
    height: usize,
    scale: usize,
) -> MapMatchResult<(usize, usize)> {
    if scale == 0 {
        return Err(MapMatchError::InvalidInput("scale must be >= 1"));
    }
    let out = (width / scale, height / scale);
    if out.0 == 0 || out.1 == 0 {
        return Err(MapMatchError::InvalidDimensions {
            width: out.0,
            height: out.1,
        });
    }
    Ok(out)
}

/// Allocates a new image decimated by `scale`.
pub fn downscale(img: &RgbaImage, scale: usize) -> MapMatchResult<RgbaImage> {
    let (width, height) = downscaled_size(img.width(), img.height(), scale)?;
    let mut dst = RgbaImage::new(width, height)?;
    downscale_into(img, &mut dst, scale)?;
    Ok(dst)
}

/// Decimates `img` by `scale` into a caller-supplied buffer.
///
/// `dst` must already have the downscaled dimensions.
pub fn downscale_into(img: &RgbaImage, dst: &mut RgbaImage, scale: usize) -> MapMatchResult<()> {
    let (width, height) = downscaled_size(img.width(), img.height(), scale)?;
    if dst.width() != width || dst.height() != height {
        return Err(MapMatchError::InvalidInput(
            "destination size must equal source size / scale",
        ));
    }

    if scale == 1 {
        for y in 0..height {
            if let (Some(src), Some(out)) = (img.row(y), dst.row_mut(y)) {
                out.copy_from_slice(src);
            }
        }
        return Ok(());
    }

    for y in 0..height {
        let Some(src) = img.row(y * scale) else {
            continue;
        };
        let Some(out) = dst.row_mut(y) else {
            continue;
        };
        for (x, px) in out.chunks_exact_mut(RGBA_CHANNELS).enumerate() {
            let s = x * scale * RGBA_CHANNELS;
            px.copy_from_slice(&src[s..s + RGBA_CHANNELS]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{downscale, downscale_into, downscaled_size};
    use crate::image::RgbaImage;

    #[test]
    fn picks_top_left_of_each_block() {
        let mut data = Vec::new();
        for i in 0..16u8 {
            data.extend_from_slice(&[i, i, i, 255]);
        }
        let img = RgbaImage::from_vec(data, 4, 4).unwrap();
        let small = downscale(&img, 2).unwrap();
        assert_eq!(small.get(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(small.get(1, 0), Some([2, 2, 2, 255]));
        assert_eq!(small.get(0, 1), Some([8, 8, 8, 255]));
        assert_eq!(small.get(1, 1), Some([10, 10, 10, 255]));
    }

    #[test]
    fn rejects_zero_scale_and_mismatched_destination() {
        let img = RgbaImage::new(4, 4).unwrap();
        assert!(downscale(&img, 0).is_err());
        assert!(downscaled_size(3, 3, 4).is_err());
        let mut dst = RgbaImage::new(3, 3).unwrap();
        assert!(downscale_into(&img, &mut dst, 2).is_err());
    }
}
