//! Low-level building blocks for custom matching pipelines.
//!
//! These expose the scoring kernels and the lattice scan behind
//! [`match_probe`](crate::match_probe) for callers that want to score single
//! offsets or drive their own search. Most users should prefer the top-level
//! functions.

pub use crate::image::scale::downscaled_size;
pub use crate::kernel::{
    passes_coverage, Kernel, SadScore, UniformKernel, WeightedKernel, WeightedScore,
};
pub use crate::probe::is_hud_icon;
pub use crate::search::scan::{placement_range, scan_band, scan_lattice, Best, WORKERS};
