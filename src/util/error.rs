//! Error types for mapmatch.

use thiserror::Error;

/// Result alias for mapmatch operations.
pub type MapMatchResult<T> = std::result::Result<T, MapMatchError>;

/// Errors that can occur when preparing images or running a search.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MapMatchError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the packed row length.
    #[error("invalid stride {stride} for row length {row_len}")]
    InvalidStride { row_len: usize, stride: usize },
    /// The backing buffer is shorter than the declared geometry requires.
    #[error("buffer too small: needed {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A crop rectangle does not fit inside the image.
    #[error(
        "roi ({x}, {y}, {width}x{height}) out of bounds for {img_width}x{img_height} image"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A clipped crop rectangle does not overlap the image at all.
    #[error("roi ({x}, {y}, {width}x{height}) does not intersect the image")]
    EmptyIntersection {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },
    /// Mask dimensions differ from the image they gate.
    #[error("mask is {mask_width}x{mask_height}, image is {img_width}x{img_height}")]
    MaskMismatch {
        mask_width: usize,
        mask_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The probe does not fit inside the target at any offset.
    #[error("probe {probe_width}x{probe_height} exceeds target {img_width}x{img_height}")]
    ProbeExceedsTarget {
        probe_width: usize,
        probe_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Every probe pixel was masked out or filtered.
    #[error("probe has no usable points")]
    EmptyProbe,
    /// Failure while decoding an image from disk.
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
