#![allow(dead_code)]

use mapmatch::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn mix(mut v: u64) -> u64 {
    v ^= v >> 33;
    v = v.wrapping_mul(0xff51_afd7_ed55_8ccd);
    v ^= v >> 33;
    v = v.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    v ^= v >> 33;
    v
}

/// Deterministic textured image with channels in `0..250` and opaque alpha.
pub fn pattern_image(width: usize, height: usize, seed: u64) -> RgbaImage {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let base = seed
                .wrapping_mul(0x9e37_79b9_7f4a_7c15)
                .wrapping_add(((y as u64) << 32) | x as u64);
            for c in 0..3u64 {
                data.push((mix(base.wrapping_add(c << 56)) % 250) as u8);
            }
            data.push(255);
        }
    }
    RgbaImage::from_vec(data, width, height).unwrap()
}

/// Copies `src` into `dst` with its top-left corner at `(x0, y0)`.
pub fn paste(dst: &mut RgbaImage, src: &RgbaImage, x0: usize, y0: usize) {
    for y in 0..src.height() {
        for x in 0..src.width() {
            *dst.get_mut(x0 + x, y0 + y).unwrap() = src.get(x, y).unwrap();
        }
    }
}

/// Adds a constant to every color channel (saturating).
pub fn brighten(img: &mut RgbaImage, delta: u8) {
    for y in 0..img.height() {
        for x in 0..img.width() {
            let px = img.get_mut(x, y).unwrap();
            for c in px.iter_mut().take(3) {
                *c = c.saturating_add(delta);
            }
        }
    }
}

/// Returns a copy of `img` with uniform noise in `[-amplitude, amplitude]` per channel.
pub fn add_noise(img: &RgbaImage, amplitude: i32, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = img.clone();
    if amplitude == 0 {
        return out;
    }
    for y in 0..out.height() {
        for x in 0..out.width() {
            let px = out.get_mut(x, y).unwrap();
            for c in px.iter_mut().take(3) {
                let noisy = i32::from(*c) + rng.random_range(-amplitude..=amplitude);
                *c = noisy.clamp(0, 255) as u8;
            }
        }
    }
    out
}

/// Solid opaque image.
pub fn solid(width: usize, height: usize, rgb: [u8; 3]) -> RgbaImage {
    let mut data = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
    RgbaImage::from_vec(data, width, height).unwrap()
}
