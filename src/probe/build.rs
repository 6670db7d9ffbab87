//! Probe extraction from a masked, filtered RGBA crop.

use crate::image::mask::AlphaMask;
use crate::image::{RgbaImage, RGBA_CHANNELS};
use crate::probe::{ProbePoint, TemplateProbe};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{luma_at, saturation};
use crate::util::MapMatchResult;

/// Channel margin over the competing channels that marks a HUD icon pixel.
const ICON_CHROMA_MARGIN: i32 = 40;
/// Minimum value of the dominant channel(s) of a HUD icon pixel.
const ICON_BRIGHTNESS_FLOOR: u8 = 100;

/// Returns true for pixels that belong to yellow-green or blue HUD icons.
///
/// Warm icons light both red and green above the floor while blue lags behind
/// the weaker of the two; blue icons have blue above the floor and ahead of
/// both red and green.
#[inline]
pub fn is_hud_icon(r: u8, g: u8, b: u8) -> bool {
    let (ri, gi, bi) = (i32::from(r), i32::from(g), i32::from(b));
    if r > ICON_BRIGHTNESS_FLOOR && g > ICON_BRIGHTNESS_FLOOR && ri.min(gi) - bi > ICON_CHROMA_MARGIN
    {
        return true;
    }
    b > ICON_BRIGHTNESS_FLOOR && bi - ri.max(gi) > ICON_CHROMA_MARGIN
}

/// Builds a probe from `img`, keeping interior pixels the mask marks valid.
///
/// Transparent pixels and HUD icon pixels are dropped. The one-pixel border is
/// skipped because the luma gradient needs all four neighbors. An input that
/// filters out completely yields an empty probe.
pub fn build_probe(img: &RgbaImage, mask: &AlphaMask) -> MapMatchResult<TemplateProbe> {
    mask.check_matches(img)?;
    let width = img.width();
    let height = img.height();
    let _span = trace_span!("build_probe", width = width, height = height).entered();

    let pix = img.as_raw();
    let stride = img.stride();
    let mut points = Vec::with_capacity(mask.count_valid());

    for y in 1..height.saturating_sub(1) {
        let row = y * stride;
        for x in 1..width - 1 {
            if !mask.is_valid(x, y) {
                continue;
            }
            let off = row + x * RGBA_CHANNELS;
            if pix[off + 3] == 0 {
                continue;
            }
            let (r, g, b) = (pix[off], pix[off + 1], pix[off + 2]);
            if is_hud_icon(r, g, b) {
                continue;
            }

            let grad_x = luma_at(&pix[off + RGBA_CHANNELS..]) - luma_at(&pix[off - RGBA_CHANNELS..]);
            let grad_y = luma_at(&pix[off + stride..]) - luma_at(&pix[off - stride..]);
            let grad_mag = (grad_x.abs() + grad_y.abs()) as u16;

            points.push(ProbePoint {
                x: x as u32,
                y: y as u32,
                r,
                g,
                b,
                saturation: saturation(r, g, b),
                grad_mag,
            });
        }
    }

    trace_event!("probe_points", count = points.len());
    TemplateProbe::from_points(points, width, height)
}

#[cfg(test)]
mod tests {
    use super::is_hud_icon;

    #[test]
    fn icon_classes() {
        assert!(is_hud_icon(220, 200, 40));
        assert!(is_hud_icon(30, 60, 200));
        assert!(!is_hud_icon(120, 120, 120));
        assert!(!is_hud_icon(90, 200, 20));
        assert!(!is_hud_icon(80, 90, 120));
    }
}
