//! Per-candidate scoring kernels.
//!
//! A kernel scores one translation of a probe against a target image. Both
//! kernels share the color terms (SAD, chroma and saturation penalties) and
//! the coverage gate; they differ in how points are aggregated.

use crate::image::{RgbaImage, RGBA_CHANNELS};
use crate::probe::ProbePoint;
use crate::util::math::{luma_at, saturation};

mod uniform;
mod weighted;

pub use uniform::{SadScore, UniformKernel};
pub use weighted::{WeightedKernel, WeightedScore};

/// Chroma delta tolerated before the hue-shift penalty kicks in.
pub const CHROMA_THRESHOLD: u32 = 45;
/// Multiplier applied to the chroma delta above [`CHROMA_THRESHOLD`].
pub const CHROMA_WEIGHT: u32 = 15;
/// Probe saturation above which a gray map pixel is penalized.
pub const PROBE_SAT_THRESHOLD: u8 = 30;
/// Map saturation below which a pixel counts as gray.
pub const MAP_SAT_THRESHOLD: u8 = 25;
/// Multiplier applied to the saturation gap.
pub const SAT_WEIGHT: u32 = 6;
/// Gradient magnitude separating textured from flat pixels.
pub const GRAD_THRESHOLD: u16 = 15;
/// Minimum percentage of sampled points that need a valid correspondence.
pub const MIN_COVERAGE_PERCENT: usize = 85;

/// Scoring strategy for a single candidate offset.
pub trait Kernel: Sync {
    /// Accumulated evidence for one candidate.
    type Score: Copy + Send + std::fmt::Debug;

    /// Probe width and height.
    fn probe_size(&self) -> (usize, usize);

    /// Scores the candidate at top-left offset `(x, y)`.
    ///
    /// Returns `None` when the running cost proves the candidate worse than
    /// `bound`, or when fewer than [`MIN_COVERAGE_PERCENT`] of the sampled
    /// points have a valid correspondence.
    fn score_at(
        &self,
        target: &RgbaImage,
        x: usize,
        y: usize,
        bound: Option<&Self::Score>,
    ) -> Option<Self::Score>;

    /// Strict ordering: true when `candidate` is a better match than `best`.
    fn is_better(candidate: &Self::Score, best: &Self::Score) -> bool;

    /// Per-channel dissimilarity reported to callers.
    fn finish(score: &Self::Score) -> f64;

    /// Number of points that contributed to `score`.
    fn matched_points(score: &Self::Score) -> usize;

    /// Number of probe points each candidate samples.
    fn sampled_points(&self) -> usize;
}

/// Returns whether `valid` of `sampled` points satisfies the coverage gate.
#[inline]
pub fn passes_coverage(valid: usize, sampled: usize) -> bool {
    valid * 100 >= sampled * MIN_COVERAGE_PERCENT
}

/// Returns the RGBA bytes of the map pixel under a probe point, if scoreable.
///
/// The correspondence must lie inside the image and be non-transparent.
#[inline]
pub(crate) fn correspondence<'a>(
    target: &'a RgbaImage,
    mx: usize,
    my: usize,
) -> Option<&'a [u8]> {
    if mx >= target.width() || my >= target.height() {
        return None;
    }
    let off = target.offset(mx, my);
    let px = &target.as_raw()[off..off + RGBA_CHANNELS];
    if px[3] == 0 {
        return None;
    }
    Some(px)
}

/// Plain SAD over R, G, B.
#[inline]
pub(crate) fn sad(p: &ProbePoint, px: &[u8]) -> u32 {
    u32::from(p.r.abs_diff(px[0])) + u32::from(p.g.abs_diff(px[1])) + u32::from(p.b.abs_diff(px[2]))
}

/// SAD plus the chroma and saturation penalties.
#[inline]
pub(crate) fn color_cost(p: &ProbePoint, px: &[u8]) -> u32 {
    let (r, g, b) = (px[0], px[1], px[2]);
    let base = sad(p, px);

    let p_rg = i32::from(p.r) - i32::from(p.g);
    let p_bg = i32::from(p.b) - i32::from(p.g);
    let m_rg = i32::from(r) - i32::from(g);
    let m_bg = i32::from(b) - i32::from(g);
    let chroma = p_rg.abs_diff(m_rg) + p_bg.abs_diff(m_bg);
    let chroma_penalty = if chroma > CHROMA_THRESHOLD {
        (chroma - CHROMA_THRESHOLD) * CHROMA_WEIGHT
    } else {
        0
    };

    let mut sat_penalty = 0;
    if p.saturation > PROBE_SAT_THRESHOLD {
        let map_sat = saturation(r, g, b);
        if map_sat < MAP_SAT_THRESHOLD {
            sat_penalty = u32::from(p.saturation - map_sat) * SAT_WEIGHT;
        }
    }

    base + chroma_penalty + sat_penalty
}

/// Gradient magnitude of the map at an interior pixel, `None` on the border.
#[inline]
pub(crate) fn map_gradient(target: &RgbaImage, mx: usize, my: usize) -> Option<u16> {
    if mx == 0 || my == 0 || mx + 1 >= target.width() || my + 1 >= target.height() {
        return None;
    }
    let pix = target.as_raw();
    let stride = target.stride();
    let off = target.offset(mx, my);
    let gx = luma_at(&pix[off + RGBA_CHANNELS..]) - luma_at(&pix[off - RGBA_CHANNELS..]);
    let gy = luma_at(&pix[off + stride..]) - luma_at(&pix[off - stride..]);
    Some((gx.abs() + gy.abs()) as u16)
}

#[cfg(test)]
mod tests {
    use super::{color_cost, passes_coverage};
    use crate::probe::ProbePoint;

    fn point(r: u8, g: u8, b: u8, saturation: u8) -> ProbePoint {
        ProbePoint {
            x: 0,
            y: 0,
            r,
            g,
            b,
            saturation,
            grad_mag: 0,
        }
    }

    #[test]
    fn brightness_shift_costs_only_sad() {
        let p = point(100, 80, 60, 40);
        assert_eq!(color_cost(&p, &[110, 90, 70, 255]), 30);
    }

    #[test]
    fn hue_shift_is_penalized() {
        let p = point(100, 100, 100, 0);
        // SAD 100, chroma |0-50| + |0-50| = 100 -> (100-45)*15
        assert_eq!(color_cost(&p, &[150, 100, 150, 255]), 100 + 55 * 15);
    }

    #[test]
    fn colorful_probe_on_gray_map_is_penalized() {
        let p = point(120, 80, 80, 40);
        // SAD 40+0+0, chroma |40-0| + |0-0| = 40 (under threshold), sat (40-0)*6
        assert_eq!(color_cost(&p, &[80, 80, 80, 255]), 40 + 240);
    }

    #[test]
    fn coverage_gate_is_inclusive_at_85_percent() {
        assert!(passes_coverage(85, 100));
        assert!(!passes_coverage(84, 100));
        assert!(passes_coverage(17, 20));
        assert!(!passes_coverage(16, 20));
    }
}
