//! Luma-threshold transparency filters.
//!
//! Both filters clear a pixel to transparent black when its integer luma
//! `(3R + 6G + B) / 10` falls below the threshold. The spotlight variant is
//! meant for zone maps and leaves already transparent pixels alone; the void
//! variant is meant for minimap crops and visits every pixel.

use crate::image::{RgbaImage, RGBA_CHANNELS};
use crate::util::math::luma_at;

/// Removes dark (empty) regions from a zone map by making them transparent.
pub fn apply_spotlight_effect(img: &mut RgbaImage, luma_threshold: i32) {
    filter_dark(img, luma_threshold, true);
}

/// Replaces dark regions of a minimap crop with transparent black.
pub fn apply_void_filter(img: &mut RgbaImage, luma_threshold: i32) {
    filter_dark(img, luma_threshold, false);
}

fn filter_dark(img: &mut RgbaImage, luma_threshold: i32, skip_transparent: bool) {
    for y in 0..img.height() {
        let Some(row) = img.row_mut(y) else {
            continue;
        };
        for px in row.chunks_exact_mut(RGBA_CHANNELS) {
            if skip_transparent && px[3] == 0 {
                continue;
            }
            if luma_at(px) < luma_threshold {
                px.fill(0);
            }
        }
    }
}
