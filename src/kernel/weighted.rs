//! Edge-weighted kernel: textured points dominate the average.

use crate::image::RgbaImage;
use crate::kernel::{color_cost, correspondence, passes_coverage, Kernel};
use crate::probe::TemplateProbe;

/// Floor applied to every point weight so flat regions still contribute.
pub const MIN_WEIGHT: f64 = 0.1;

/// Weighted cost sum and weight sum over valid points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedScore {
    /// `Σ cost · w` over valid points.
    pub weighted_sum: f64,
    /// `Σ w` over valid points.
    pub weight: f64,
    /// Points with a valid correspondence.
    pub valid: usize,
}

impl WeightedScore {
    /// Weighted mean of the three-channel cost.
    pub fn mean(&self) -> f64 {
        if self.weight <= 0.0 {
            return f64::INFINITY;
        }
        self.weighted_sum / self.weight
    }
}

/// Edge-weighted kernel with `w = max(0.1, (grad / 255)^gamma)`.
///
/// Only SAD and the chroma and saturation penalties apply. The candidate is
/// abandoned once its running weighted sum exceeds `best_mean` times the
/// weight of every sampled point.
pub struct WeightedKernel<'a> {
    probe: &'a TemplateProbe,
    probe_step: usize,
    weights: Vec<f64>,
    max_weight: f64,
}

impl<'a> WeightedKernel<'a> {
    /// Creates a kernel with per-point weights precomputed for `gamma`.
    ///
    /// `probe_step` is clamped to at least 1.
    pub fn new(probe: &'a TemplateProbe, probe_step: usize, gamma: f64) -> Self {
        let probe_step = probe_step.max(1);
        let weights: Vec<f64> = probe
            .points()
            .iter()
            .step_by(probe_step)
            .map(|p| point_weight(p.grad_mag, gamma))
            .collect();
        let max_weight = weights.iter().sum();
        Self {
            probe,
            probe_step,
            weights,
            max_weight,
        }
    }
}

/// Weight of a point with gradient magnitude `grad_mag`.
#[inline]
pub fn point_weight(grad_mag: u16, gamma: f64) -> f64 {
    (f64::from(grad_mag) / 255.0).powf(gamma).max(MIN_WEIGHT)
}

impl Kernel for WeightedKernel<'_> {
    type Score = WeightedScore;

    fn probe_size(&self) -> (usize, usize) {
        (self.probe.width(), self.probe.height())
    }

    fn score_at(
        &self,
        target: &RgbaImage,
        x: usize,
        y: usize,
        bound: Option<&WeightedScore>,
    ) -> Option<WeightedScore> {
        let limit = bound.map(|b| b.mean() * self.max_weight);

        let mut weighted_sum = 0.0f64;
        let mut weight = 0.0f64;
        let mut valid = 0usize;
        let points = self.probe.points().iter().step_by(self.probe_step);
        for (p, &w) in points.zip(&self.weights) {
            let Some(px) = correspondence(target, x + p.x as usize, y + p.y as usize) else {
                continue;
            };
            valid += 1;
            weighted_sum += f64::from(color_cost(p, px)) * w;
            weight += w;

            if let Some(limit) = limit {
                if weighted_sum > limit {
                    return None;
                }
            }
        }

        if !passes_coverage(valid, self.weights.len()) || weight <= 0.001 {
            return None;
        }
        Some(WeightedScore {
            weighted_sum,
            weight,
            valid,
        })
    }

    fn is_better(candidate: &WeightedScore, best: &WeightedScore) -> bool {
        candidate.mean() < best.mean()
    }

    fn finish(score: &WeightedScore) -> f64 {
        score.mean() / 3.0
    }

    fn matched_points(score: &WeightedScore) -> usize {
        score.valid
    }

    fn sampled_points(&self) -> usize {
        self.weights.len()
    }
}
