//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{IntoRgba, RgbaImage};
use crate::util::{MapMatchError, MapMatchResult};
use std::path::Path;

impl IntoRgba for ::image::RgbaImage {
    fn into_rgba(self) -> MapMatchResult<RgbaImage> {
        let width = self.width() as usize;
        let height = self.height() as usize;
        RgbaImage::from_vec(self.into_raw(), width, height)
    }
}

impl IntoRgba for ::image::DynamicImage {
    fn into_rgba(self) -> MapMatchResult<RgbaImage> {
        self.into_rgba8().into_rgba()
    }
}

/// Loads an image from disk and converts it to packed RGBA.
pub fn load_rgba_image<P: AsRef<Path>>(path: P) -> MapMatchResult<RgbaImage> {
    let img = ::image::open(path).map_err(|err| MapMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    img.into_rgba()
}
