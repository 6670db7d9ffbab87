mod common;

use common::{add_noise, pattern_image};
use mapmatch::lowlevel::{scan_lattice, Best, Kernel, UniformKernel, WeightedKernel};
use mapmatch::{build_probe, match_probe, match_probe_weighted, AlphaMask, RgbaImage, TemplateProbe};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PROBE_SIZE: usize = 18;

/// Noisy crop of a textured map whose surroundings carry transparent holes.
fn holed_fixture(seed: u64) -> (RgbaImage, TemplateProbe) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut target = pattern_image(60, 44, seed);
    let ox = rng.random_range(0..=60 - PROBE_SIZE);
    let oy = rng.random_range(0..=44 - PROBE_SIZE);
    let crop = target.crop(ox, oy, PROBE_SIZE, PROBE_SIZE).unwrap();
    let noisy = add_noise(&crop, 14, seed + 1000);
    let probe = build_probe(&noisy, &AlphaMask::filled(PROBE_SIZE, PROBE_SIZE).unwrap()).unwrap();

    for _ in 0..6 {
        let hx = rng.random_range(0..56);
        let hy = rng.random_range(0..40);
        let hw = rng.random_range(1..=4);
        let hh = rng.random_range(1..=4);
        for y in hy..(hy + hh).min(44) {
            for x in hx..(hx + hw).min(60) {
                target.get_mut(x, y).unwrap()[3] = 0;
            }
        }
    }
    (target, probe)
}

/// Scores every lattice offset without a bound and keeps the first best.
fn exhaustive<K: Kernel>(target: &RgbaImage, kernel: &K, step: usize) -> Option<Best<K::Score>> {
    let (pw, ph) = kernel.probe_size();
    let mut best: Option<Best<K::Score>> = None;
    for y in (0..=target.height() - ph).step_by(step) {
        for x in (0..=target.width() - pw).step_by(step) {
            let Some(score) = kernel.score_at(target, x, y, None) else {
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

#[test]
fn pruned_uniform_scan_equals_exhaustive_scan() {
    for seed in 0..8u64 {
        let (target, probe) = holed_fixture(seed);
        for probe_step in [1, 3] {
            let kernel = UniformKernel::new(&probe, probe_step);
            let reference = exhaustive(&target, &kernel, 1);
            let pruned = scan_lattice(&target, &kernel, 1, false).unwrap();
            match (reference, pruned) {
                (Some(r), Some(p)) => {
                    assert_eq!((p.x, p.y, p.score), (r.x, r.y, r.score), "seed {seed}");
                    let found = match_probe(&target, &probe, 1, probe_step, false)
                        .unwrap()
                        .unwrap();
                    assert_eq!((found.x, found.y), (r.x, r.y));
                    assert_eq!(found.score, r.score.avg_diff());
                }
                (None, None) => {}
                (r, p) => panic!("seed {seed}: exhaustive {r:?} vs pruned {p:?}"),
            }
        }
    }
}

#[test]
fn pruned_weighted_scan_equals_exhaustive_scan() {
    for seed in 0..8u64 {
        let (target, probe) = holed_fixture(seed);
        for probe_step in [1, 3] {
            let kernel = WeightedKernel::new(&probe, probe_step, 2.0);
            let reference = exhaustive(&target, &kernel, 1);
            let pruned = scan_lattice(&target, &kernel, 1, false).unwrap();
            match (reference, pruned) {
                (Some(r), Some(p)) => {
                    assert_eq!((p.x, p.y, p.score), (r.x, r.y, r.score), "seed {seed}");
                    let found = match_probe_weighted(&target, &probe, 1, probe_step, false, 2.0)
                        .unwrap()
                        .unwrap();
                    assert_eq!((found.x, found.y), (r.x, r.y));
                    assert_eq!(found.score, r.score.mean() / 3.0);
                }
                (None, None) => {}
                (r, p) => panic!("seed {seed}: exhaustive {r:?} vs pruned {p:?}"),
            }
        }
    }
}

#[test]
fn pruned_scan_with_coarse_step_equals_exhaustive_scan() {
    for seed in 20..24u64 {
        let (target, probe) = holed_fixture(seed);
        let uniform = UniformKernel::new(&probe, 2);
        let r = exhaustive(&target, &uniform, 3).map(|b| (b.x, b.y, b.score));
        let p = scan_lattice(&target, &uniform, 3, false)
            .unwrap()
            .map(|b| (b.x, b.y, b.score));
        assert_eq!(p, r, "seed {seed}");

        let weighted = WeightedKernel::new(&probe, 2, 3.0);
        let r = exhaustive(&target, &weighted, 3).map(|b| (b.x, b.y, b.score));
        let p = scan_lattice(&target, &weighted, 3, false)
            .unwrap()
            .map(|b| (b.x, b.y, b.score));
        assert_eq!(p, r, "seed {seed}");
    }
}
