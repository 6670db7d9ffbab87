//! End-to-end minimap localization across candidate zone maps.
//!
//! The localizer prepares the minimap crop (downscale, ring mask, void
//! filter), builds one probe, runs both matcher variants on every zone as
//! cross-validation and scores the winner's confidence. All state lives in
//! the arguments; nothing is cached between calls.

use crate::confidence::{local_consistency, z_score};
use crate::image::filter::{apply_spotlight_effect, apply_void_filter};
use crate::image::mask::{apply_mask, generate_ring_mask, PLAYER_ARROW_RADIUS};
use crate::image::scale::downscale;
use crate::image::RgbaImage;
use crate::probe::{build_probe, TemplateProbe};
use crate::search::{match_probe, match_probe_weighted, Match};
use crate::trace::{trace_event, trace_span};
use crate::util::{MapMatchError, MapMatchResult};

/// Configuration for [`localize`].
#[derive(Clone, Debug)]
pub struct LocalizeConfig {
    /// Integer downscale factor applied to the minimap and every zone map.
    pub scale: usize,
    /// Player-arrow exclusion radius at full resolution.
    pub inner_radius: f64,
    /// Translation lattice step at matching resolution.
    pub step: usize,
    /// Probe point sampling stride.
    pub probe_step: usize,
    /// Split each search into row bands on worker threads.
    pub concurrent: bool,
    /// Weight exponent for the edge-weighted matcher.
    pub gamma: f64,
    /// Luma below which minimap pixels are dropped (0 disables).
    pub void_threshold: i32,
    /// Luma below which zone map pixels become transparent (0 disables).
    pub spotlight_threshold: i32,
    /// Point stride for the quadrant consistency check.
    pub consistency_step: usize,
    /// Largest accepted uniform score.
    pub max_avg_diff: f64,
    /// Smallest accepted Z-score when at least two zones were scored.
    pub min_z_score: f64,
    /// Largest accepted quadrant spread.
    pub max_consistency: f64,
    /// Largest accepted Chebyshev distance between the two matchers' offsets,
    /// in matching-resolution pixels.
    pub max_disagreement: usize,
}

impl Default for LocalizeConfig {
    fn default() -> Self {
        Self {
            scale: 1,
            inner_radius: PLAYER_ARROW_RADIUS,
            step: 1,
            probe_step: 1,
            concurrent: true,
            gamma: 2.0,
            void_threshold: 0,
            spotlight_threshold: 0,
            consistency_step: 4,
            max_avg_diff: 40.0,
            min_z_score: 1.0,
            max_consistency: 15.0,
            max_disagreement: 4,
        }
    }
}

/// A candidate zone map prepared for matching.
#[derive(Clone, Debug)]
pub struct ZoneMap {
    name: String,
    image: RgbaImage,
}

impl ZoneMap {
    /// Downscales `image` by `cfg.scale` and applies the spotlight filter.
    pub fn new(
        name: impl Into<String>,
        image: &RgbaImage,
        cfg: &LocalizeConfig,
    ) -> MapMatchResult<Self> {
        let mut image = downscale(image, cfg.scale)?;
        if cfg.spotlight_threshold > 0 {
            apply_spotlight_effect(&mut image, cfg.spotlight_threshold);
        }
        Ok(Self {
            name: name.into(),
            image,
        })
    }

    /// Returns the zone name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the prepared map at matching resolution.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Scores of one zone, in full-resolution coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneScore {
    /// Index into the zone slice.
    pub index: usize,
    /// Zone name.
    pub name: String,
    /// Uniform matcher result.
    pub uniform: Match,
    /// Edge-weighted matcher result, if any offset passed the coverage gate.
    pub weighted: Option<Match>,
}

/// Winning zone and its confidence measures.
#[derive(Clone, Debug, PartialEq)]
pub struct Localization {
    /// Index of the winning zone.
    pub zone_index: usize,
    /// Name of the winning zone.
    pub zone: String,
    /// Minimap top-left in the zone map (full resolution).
    pub x: usize,
    /// Minimap top-left in the zone map (full resolution).
    pub y: usize,
    /// Player position (minimap center) in the zone map.
    pub center_x: usize,
    /// Player position (minimap center) in the zone map.
    pub center_y: usize,
    /// Uniform score of the winner.
    pub avg_diff: f64,
    /// Edge-weighted score of the winner, if available.
    pub weighted_diff: Option<f64>,
    /// Separation of the winner from the other zones.
    pub z_score: f64,
    /// Quadrant spread at the winning offset.
    pub consistency: f64,
    /// Chebyshev distance between the two matchers' offsets (matching scale).
    pub disagreement: Option<usize>,
    /// Whether every acceptance threshold holds.
    pub accepted: bool,
    /// Per-zone results, in zone order.
    pub zones: Vec<ZoneScore>,
}

/// Builds the probe for a raw minimap crop.
///
/// Returns [`MapMatchError::EmptyProbe`] when nothing survives masking and
/// filtering.
pub fn prepare_probe(minimap: &RgbaImage, cfg: &LocalizeConfig) -> MapMatchResult<TemplateProbe> {
    let mut small = downscale(minimap, cfg.scale)?;
    let inner = cfg.inner_radius / cfg.scale as f64;
    let mask = generate_ring_mask(small.width(), small.height(), inner)?;
    apply_mask(&mut small, &mask)?;
    if cfg.void_threshold > 0 {
        apply_void_filter(&mut small, cfg.void_threshold);
    }
    let probe = build_probe(&small, &mask)?;
    if probe.is_empty() {
        return Err(MapMatchError::EmptyProbe);
    }
    Ok(probe)
}

/// Locates `minimap` in the best-matching zone.
///
/// Zones that cannot contain the probe are skipped. Returns `Ok(None)` when no
/// zone produced a match.
pub fn localize(
    minimap: &RgbaImage,
    zones: &[ZoneMap],
    cfg: &LocalizeConfig,
) -> MapMatchResult<Option<Localization>> {
    let _span = trace_span!("localize", zones = zones.len(), scale = cfg.scale).entered();
    let probe = prepare_probe(minimap, cfg)?;

    let mut scored = Vec::with_capacity(zones.len());
    for (index, zone) in zones.iter().enumerate() {
        let uniform = match match_probe(
            zone.image(),
            &probe,
            cfg.step,
            cfg.probe_step,
            cfg.concurrent,
        ) {
            Ok(Some(m)) => m,
            Ok(None) | Err(MapMatchError::ProbeExceedsTarget { .. }) => continue,
            Err(err) => return Err(err),
        };
        let weighted = match_probe_weighted(
            zone.image(),
            &probe,
            cfg.step,
            cfg.probe_step,
            cfg.concurrent,
            cfg.gamma,
        )?;
        trace_event!("zone_scored", index = index, score = uniform.score);
        scored.push(ZoneScore {
            index,
            name: zone.name().to_owned(),
            uniform,
            weighted,
        });
    }

    let Some(best) = scored
        .iter()
        .min_by(|a, b| a.uniform.score.total_cmp(&b.uniform.score))
    else {
        return Ok(None);
    };

    let all_scores: Vec<f64> = scored.iter().map(|zone| zone.uniform.score).collect();
    let z = z_score(best.uniform.score, &all_scores);
    let consistency = local_consistency(
        zones[best.index].image(),
        &probe,
        best.uniform.x,
        best.uniform.y,
        cfg.consistency_step,
    );
    let disagreement = best
        .weighted
        .map(|w| w.x.abs_diff(best.uniform.x).max(w.y.abs_diff(best.uniform.y)));

    let accepted = best.uniform.score <= cfg.max_avg_diff
        && (all_scores.len() < 2 || z >= cfg.min_z_score)
        && consistency <= cfg.max_consistency
        && disagreement.is_some_and(|d| d <= cfg.max_disagreement);

    let scale = cfg.scale;
    let x = best.uniform.x * scale;
    let y = best.uniform.y * scale;
    let result = Localization {
        zone_index: best.index,
        zone: best.name.clone(),
        x,
        y,
        center_x: x + probe.width() * scale / 2,
        center_y: y + probe.height() * scale / 2,
        avg_diff: best.uniform.score,
        weighted_diff: best.weighted.map(|w| w.score),
        z_score: z,
        consistency,
        disagreement,
        accepted,
        zones: scored
            .iter()
            .map(|zone| to_full_resolution(zone, scale))
            .collect(),
    };
    trace_event!(
        "localized",
        zone = result.zone_index,
        x = result.x,
        y = result.y,
        accepted = result.accepted
    );
    Ok(Some(result))
}

fn to_full_resolution(zone: &ZoneScore, scale: usize) -> ZoneScore {
    let rescale = |m: Match| Match {
        x: m.x * scale,
        y: m.y * scale,
        ..m
    };
    ZoneScore {
        index: zone.index,
        name: zone.name.clone(),
        uniform: rescale(zone.uniform),
        weighted: zone.weighted.map(rescale),
    }
}
