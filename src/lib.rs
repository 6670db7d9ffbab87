//! MapMatch locates a circular minimap crop inside candidate zone maps.
//!
//! The crate builds a sparse color/texture probe from the masked minimap and
//! runs a pruned translation search with two scoring kernels (uniform and
//! edge-weighted), then rates the result with a Z-score across zones and a
//! quadrant consistency check. Parallel band search is available through the
//! `rayon` feature and image loading through `image-io`.

pub mod confidence;
pub mod image;
pub mod kernel;
pub mod localize;
pub mod lowlevel;
pub mod probe;
pub mod search;
mod trace;
pub mod util;

pub use confidence::{local_consistency, z_score};
#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::filter::{apply_spotlight_effect, apply_void_filter};
pub use crate::image::mask::{apply_mask, generate_circular_mask, generate_ring_mask, AlphaMask};
pub use crate::image::scale::{downscale, downscale_into};
pub use crate::image::{ensure_rgba, IntoRgba, PackedImage, PixelFormat, RgbaImage};
pub use localize::{localize, prepare_probe, LocalizeConfig, Localization, ZoneMap, ZoneScore};
pub use probe::{build_probe, ProbePoint, TemplateProbe};
pub use search::{match_probe, match_probe_weighted, Match};
pub use util::{MapMatchError, MapMatchResult};
