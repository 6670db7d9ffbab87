//! Translation search of a probe over a target image.
//!
//! [`match_probe`] runs the uniform penalized-SAD kernel and
//! [`match_probe_weighted`] the edge-weighted one. They are independent
//! estimators; callers typically run both and compare the offsets.

pub mod scan;

use crate::image::RgbaImage;
use crate::kernel::{Kernel, UniformKernel, WeightedKernel};
use crate::probe::TemplateProbe;
use crate::search::scan::scan_lattice;
use crate::trace::{trace_event, trace_span};
use crate::util::{MapMatchError, MapMatchResult};

/// Best offset found by a search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Column of the probe's top-left corner in the target.
    pub x: usize,
    /// Row of the probe's top-left corner in the target.
    pub y: usize,
    /// Per-channel dissimilarity; lower is better and 0 is exact.
    pub score: f64,
    /// Sampled points with a valid correspondence at this offset.
    pub matched_points: usize,
    /// Points each candidate sampled.
    pub sampled_points: usize,
}

impl Match {
    /// Fraction of sampled points with a valid correspondence.
    pub fn coverage(&self) -> f64 {
        if self.sampled_points == 0 {
            return 0.0;
        }
        self.matched_points as f64 / self.sampled_points as f64
    }
}

/// Finds the offset minimizing the penalized SAD total.
///
/// Offsets are visited on a `step` lattice and every `probe_step`-th probe
/// point is scored. The reported score is the winner's total divided by three
/// times its matched points. Returns `Ok(None)` when no offset passes the coverage
/// gate; an empty probe is reported as [`MapMatchError::EmptyProbe`] and a
/// probe larger than the target as [`MapMatchError::ProbeExceedsTarget`].
pub fn match_probe(
    target: &RgbaImage,
    probe: &TemplateProbe,
    step: usize,
    probe_step: usize,
    concurrent: bool,
) -> MapMatchResult<Option<Match>> {
    validate(probe, step, probe_step)?;
    let _span = trace_span!(
        "match_probe",
        points = probe.len(),
        step = step,
        probe_step = probe_step,
        concurrent = concurrent
    )
    .entered();

    let kernel = UniformKernel::new(probe, probe_step);
    let best = run(target, &kernel, step, concurrent)?;
    if let Some(m) = best.as_ref() {
        trace_event!("uniform_best", x = m.x, y = m.y, score = m.score);
    }
    Ok(best)
}

/// Finds the offset minimizing the edge-weighted average cost.
///
/// `gamma` shapes the weight curve: 1 is linear, 2 is the usual choice and 3
/// favors strong edges aggressively. The reported score is divided by three
/// so it is on the same per-channel scale as [`match_probe`].
pub fn match_probe_weighted(
    target: &RgbaImage,
    probe: &TemplateProbe,
    step: usize,
    probe_step: usize,
    concurrent: bool,
    gamma: f64,
) -> MapMatchResult<Option<Match>> {
    validate(probe, step, probe_step)?;
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(MapMatchError::InvalidInput("gamma must be finite and > 0"));
    }
    let _span = trace_span!(
        "match_probe_weighted",
        points = probe.len(),
        step = step,
        probe_step = probe_step,
        gamma = gamma
    )
    .entered();

    let kernel = WeightedKernel::new(probe, probe_step, gamma);
    let best = run(target, &kernel, step, concurrent)?;
    if let Some(m) = best.as_ref() {
        trace_event!("weighted_best", x = m.x, y = m.y, score = m.score);
    }
    Ok(best)
}

fn validate(probe: &TemplateProbe, step: usize, probe_step: usize) -> MapMatchResult<()> {
    if step == 0 {
        return Err(MapMatchError::InvalidInput("step must be >= 1"));
    }
    if probe_step == 0 {
        return Err(MapMatchError::InvalidInput("probe_step must be >= 1"));
    }
    if probe.is_empty() {
        return Err(MapMatchError::EmptyProbe);
    }
    Ok(())
}

fn run<K: Kernel>(
    target: &RgbaImage,
    kernel: &K,
    step: usize,
    concurrent: bool,
) -> MapMatchResult<Option<Match>> {
    let best = scan_lattice(target, kernel, step, concurrent)?;
    Ok(best.map(|b| Match {
        x: b.x,
        y: b.y,
        score: K::finish(&b.score),
        matched_points: K::matched_points(&b.score),
        sampled_points: kernel.sampled_points(),
    }))
}
