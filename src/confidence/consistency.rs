//! Spatial consistency of a match across the probe quadrants.

use crate::image::RgbaImage;
use crate::kernel::{correspondence, sad};
use crate::probe::TemplateProbe;
use crate::util::math::mean_std;

/// Quadrants need more samples than this to be considered.
const MIN_QUADRANT_SAMPLES: usize = 3;

/// Standard deviation of the per-quadrant mean SAD at offset `(x, y)`.
///
/// Probe points are split at the probe's vertical and horizontal midlines and
/// sampled every `step`-th point (`step` is clamped to at least 1). Quadrants
/// with too few samples are dropped; with fewer than two quadrants left the
/// spread is `0`. A low value means the alignment is uniformly good instead of
/// one region matching by luck.
pub fn local_consistency(
    target: &RgbaImage,
    probe: &TemplateProbe,
    x: usize,
    y: usize,
    step: usize,
) -> f64 {
    let half_w = probe.width() / 2;
    let half_h = probe.height() / 2;

    let mut sums = [0u64; 4];
    let mut counts = [0usize; 4];
    for p in probe.points().iter().step_by(step.max(1)) {
        let mut quad = 0;
        if p.x as usize >= half_w {
            quad += 1;
        }
        if p.y as usize >= half_h {
            quad += 2;
        }
        let Some(px) = correspondence(target, x + p.x as usize, y + p.y as usize) else {
            continue;
        };
        sums[quad] += u64::from(sad(p, px));
        counts[quad] += 1;
    }

    let means: Vec<f64> = sums
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > MIN_QUADRANT_SAMPLES)
        .map(|(&sum, count)| sum as f64 / (count as f64 * 3.0))
        .collect();
    if means.len() < 2 {
        return 0.0;
    }
    mean_std(&means).map_or(0.0, |(_, std)| std)
}
