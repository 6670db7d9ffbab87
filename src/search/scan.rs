//! Lattice scan over translation offsets with optional row-band fan-out.

use crate::image::RgbaImage;
use crate::kernel::Kernel;
use crate::util::{MapMatchError, MapMatchResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::ops::Range;
use std::sync::{Mutex, PoisonError};

/// Fixed number of row bands used by the concurrent scan.
pub const WORKERS: usize = 8;

/// Best candidate of a scan.
#[derive(Clone, Copy, Debug)]
pub struct Best<S> {
    pub x: usize,
    pub y: usize,
    pub score: S,
}

/// Largest valid top-left offsets `(max_x, max_y)` for a probe inside `target`.
pub fn placement_range(
    target: &RgbaImage,
    probe_width: usize,
    probe_height: usize,
) -> MapMatchResult<(usize, usize)> {
    let img_width = target.width();
    let img_height = target.height();
    if probe_width > img_width || probe_height > img_height {
        return Err(MapMatchError::ProbeExceedsTarget {
            probe_width,
            probe_height,
            img_width,
            img_height,
        });
    }
    Ok((img_width - probe_width, img_height - probe_height))
}

/// Scans every lattice offset `(x, y)` with `x, y` multiples of `step`.
///
/// With `concurrent` the lattice rows are split into [`WORKERS`] equal bands.
/// Each band prunes against its own best and reports into a mutex-guarded
/// global best, which only a strictly better band result replaces. Which band
/// wins an exact tie depends on scheduling and is unspecified.
pub fn scan_lattice<K: Kernel>(
    target: &RgbaImage,
    kernel: &K,
    step: usize,
    concurrent: bool,
) -> MapMatchResult<Option<Best<K::Score>>> {
    if step == 0 {
        return Err(MapMatchError::InvalidInput("step must be >= 1"));
    }
    let (probe_width, probe_height) = kernel.probe_size();
    let (max_x, max_y) = placement_range(target, probe_width, probe_height)?;
    let rows = max_y / step + 1;

    if !concurrent {
        return Ok(scan_band(target, kernel, step, max_x, 0..rows));
    }

    let band_len = rows.div_ceil(WORKERS);
    let global: Mutex<Option<Best<K::Score>>> = Mutex::new(None);
    let run_band = |band: usize| {
        let start = band * band_len;
        if start >= rows {
            return;
        }
        let end = (start + band_len).min(rows);
        let Some(local) = scan_band(target, kernel, step, max_x, start..end) else {
            return;
        };
        let mut guard = global.lock().unwrap_or_else(PoisonError::into_inner);
        let replace = match guard.as_ref() {
            Some(best) => K::is_better(&local.score, &best.score),
            None => true,
        };
        if replace {
            *guard = Some(local);
        }
    };

    #[cfg(feature = "rayon")]
    (0..WORKERS).into_par_iter().for_each(run_band);
    #[cfg(not(feature = "rayon"))]
    (0..WORKERS).for_each(run_band);

    Ok(global.into_inner().unwrap_or_else(PoisonError::into_inner))
}

/// Scans lattice rows `rows` (in units of `step`) in row-major order.
///
/// Ties keep the earliest candidate.
pub fn scan_band<K: Kernel>(
    target: &RgbaImage,
    kernel: &K,
    step: usize,
    max_x: usize,
    rows: Range<usize>,
) -> Option<Best<K::Score>> {
    let mut best: Option<Best<K::Score>> = None;
    for row in rows {
        let y = row * step;
        for x in (0..=max_x).step_by(step) {
            let Some(score) = kernel.score_at(target, x, y, best.as_ref().map(|b| &b.score))
            else {
                continue;
            };
            let better = match best.as_ref() {
                Some(b) => K::is_better(&score, &b.score),
                None => true,
            };
            if better {
                best = Some(Best { x, y, score });
            }
        }
    }
    best
}
