//! Uniform kernel: every sampled point counts equally.

use crate::image::RgbaImage;
use crate::kernel::{color_cost, correspondence, map_gradient, passes_coverage, Kernel};
use crate::kernel::GRAD_THRESHOLD;
use crate::probe::TemplateProbe;

/// Accumulated integer cost and the number of points that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SadScore {
    /// Sum of per-point costs including penalties.
    pub total: u64,
    /// Points with a valid correspondence.
    pub valid: usize,
}

impl SadScore {
    /// Mean per-channel cost, `total / (valid * 3)`.
    pub fn avg_diff(&self) -> f64 {
        if self.valid == 0 {
            return f64::INFINITY;
        }
        self.total as f64 / (self.valid as f64 * 3.0)
    }
}

/// Penalized SAD kernel with branch-and-bound pruning.
///
/// Per point the cost is SAD, then the chroma penalty, then the saturation
/// penalty, then the gradient penalty. All terms are non-negative and the
/// order is fixed, so the running total never decreases and a candidate can
/// be abandoned as soon as it exceeds the best total. Candidates are ranked
/// by total cost among those passing the coverage gate.
pub struct UniformKernel<'a> {
    probe: &'a TemplateProbe,
    probe_step: usize,
    sampled: usize,
}

impl<'a> UniformKernel<'a> {
    /// Creates a kernel sampling every `probe_step`-th probe point.
    ///
    /// `probe_step` is clamped to at least 1.
    pub fn new(probe: &'a TemplateProbe, probe_step: usize) -> Self {
        let probe_step = probe_step.max(1);
        Self {
            probe,
            probe_step,
            sampled: probe.sampled_len(probe_step),
        }
    }
}

impl Kernel for UniformKernel<'_> {
    type Score = SadScore;

    fn probe_size(&self) -> (usize, usize) {
        (self.probe.width(), self.probe.height())
    }

    fn score_at(
        &self,
        target: &RgbaImage,
        x: usize,
        y: usize,
        bound: Option<&SadScore>,
    ) -> Option<SadScore> {
        let limit = bound.map(|b| b.total);

        let mut total = 0u64;
        let mut valid = 0usize;
        for p in self.probe.points().iter().step_by(self.probe_step) {
            let mx = x + p.x as usize;
            let my = y + p.y as usize;
            let Some(px) = correspondence(target, mx, my) else {
                continue;
            };
            valid += 1;

            let mut cost = color_cost(p, px);
            if p.grad_mag > GRAD_THRESHOLD {
                if let Some(map_grad) = map_gradient(target, mx, my) {
                    if map_grad < GRAD_THRESHOLD {
                        cost += u32::from(p.grad_mag - map_grad);
                    }
                }
            }
            total += u64::from(cost);

            if limit.is_some_and(|best| total > best) {
                return None;
            }
        }

        if !passes_coverage(valid, self.sampled) {
            return None;
        }
        Some(SadScore { total, valid })
    }

    fn is_better(candidate: &SadScore, best: &SadScore) -> bool {
        candidate.total < best.total
    }

    fn finish(score: &SadScore) -> f64 {
        score.avg_diff()
    }

    fn matched_points(score: &SadScore) -> usize {
        score.valid
    }

    fn sampled_points(&self) -> usize {
        self.sampled
    }
}
