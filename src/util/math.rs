//! Integer color helpers and small statistics used across the crate.

/// Integer luma approximation `(3R + 6G + B) / 10`.
#[inline]
pub(crate) fn luma(r: u8, g: u8, b: u8) -> i32 {
    (i32::from(r) * 3 + i32::from(g) * 6 + i32::from(b)) / 10
}

/// Luma of the RGBA pixel starting at `px[0]`.
#[inline]
pub(crate) fn luma_at(px: &[u8]) -> i32 {
    luma(px[0], px[1], px[2])
}

/// Saturation proxy `max(r, g, b) - min(r, g, b)`.
#[inline]
pub(crate) fn saturation(r: u8, g: u8, b: u8) -> u8 {
    r.max(g).max(b) - r.min(g).min(b)
}

/// Population mean and standard deviation.
///
/// Returns `None` for an empty slice.
pub(crate) fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    Some((mean, var.max(0.0).sqrt()))
}

#[cfg(test)]
mod tests {
    use super::{luma, mean_std, saturation};

    #[test]
    fn luma_uses_integer_weights() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(10, 0, 0), 3);
        assert_eq!(luma(0, 10, 0), 6);
        assert_eq!(luma(0, 0, 19), 1);
    }

    #[test]
    fn saturation_is_channel_spread() {
        assert_eq!(saturation(10, 10, 10), 0);
        assert_eq!(saturation(200, 50, 120), 150);
    }

    #[test]
    fn mean_std_population() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
        assert!(mean_std(&[]).is_none());
    }
}
