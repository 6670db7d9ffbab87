mod common;

use common::{add_noise, pattern_image};
use mapmatch::lowlevel::{scan_lattice, UniformKernel, WORKERS};
use mapmatch::{build_probe, match_probe, match_probe_weighted, AlphaMask, TemplateProbe};

fn noisy_fixture() -> (mapmatch::RgbaImage, TemplateProbe) {
    let target = pattern_image(110, 90, 17);
    let crop = add_noise(&target.crop(36, 21, 28, 28).unwrap(), 10, 4);
    let probe = build_probe(&crop, &AlphaMask::filled(28, 28).unwrap()).unwrap();
    (target, probe)
}

#[test]
fn concurrent_uniform_matches_serial() {
    let (target, probe) = noisy_fixture();
    for step in [1, 3] {
        let serial = match_probe(&target, &probe, step, 1, false).unwrap().unwrap();
        let parallel = match_probe(&target, &probe, step, 1, true).unwrap().unwrap();
        assert_eq!(serial, parallel, "step {step}");
        assert_eq!((serial.x, serial.y), (36, 21));
    }
}

#[test]
fn concurrent_weighted_matches_serial() {
    let (target, probe) = noisy_fixture();
    for step in [1, 3] {
        let serial = match_probe_weighted(&target, &probe, step, 2, false, 2.0)
            .unwrap()
            .unwrap();
        let parallel = match_probe_weighted(&target, &probe, step, 2, true, 2.0)
            .unwrap()
            .unwrap();
        assert_eq!(serial, parallel, "step {step}");
        assert_eq!((serial.x, serial.y), (36, 21));
    }
}

#[test]
fn fewer_lattice_rows_than_workers() {
    let target = pattern_image(90, 30, 6);
    let crop = target.crop(41, 1, 26, 26).unwrap();
    let probe = build_probe(&crop, &AlphaMask::filled(26, 26).unwrap()).unwrap();
    let kernel = UniformKernel::new(&probe, 1);

    let rows = target.height() - probe.height() + 1;
    assert!(rows < WORKERS);
    let serial = scan_lattice(&target, &kernel, 1, false).unwrap().unwrap();
    let parallel = scan_lattice(&target, &kernel, 1, true).unwrap().unwrap();
    assert_eq!((serial.x, serial.y), (41, 1));
    assert_eq!((parallel.x, parallel.y), (41, 1));
    assert_eq!(serial.score, parallel.score);
}
