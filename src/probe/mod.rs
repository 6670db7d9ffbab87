//! Sparse feature probes extracted from masked minimap crops.

use crate::util::{MapMatchError, MapMatchResult};

mod build;

pub use build::{build_probe, is_hud_icon};

/// One sampled reference pixel of a probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbePoint {
    /// Column within the probe.
    pub x: u32,
    /// Row within the probe.
    pub y: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// `max(r, g, b) - min(r, g, b)`.
    pub saturation: u8,
    /// `|gradX| + |gradY|` over integer luma.
    pub grad_mag: u16,
}

/// Ordered probe points together with the size of the crop they came from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateProbe {
    points: Vec<ProbePoint>,
    width: usize,
    height: usize,
}

impl TemplateProbe {
    /// Creates a probe from explicit points.
    ///
    /// Every point must lie inside `width x height`.
    pub fn from_points(
        points: Vec<ProbePoint>,
        width: usize,
        height: usize,
    ) -> MapMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(MapMatchError::InvalidDimensions { width, height });
        }
        if points
            .iter()
            .any(|p| p.x as usize >= width || p.y as usize >= height)
        {
            return Err(MapMatchError::InvalidInput("probe point outside probe bounds"));
        }
        Ok(Self {
            points,
            width,
            height,
        })
    }

    /// Returns the probe width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the probe height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the points in scan order.
    pub fn points(&self) -> &[ProbePoint] {
        &self.points
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true when every pixel was filtered out.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points visited when sampling every `probe_step`-th point.
    pub fn sampled_len(&self, probe_step: usize) -> usize {
        if probe_step == 0 {
            return 0;
        }
        self.points.len().div_ceil(probe_step)
    }
}
