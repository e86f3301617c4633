//! Light-validity thresholds.
//!
//! The format does not bound light positions or colors; stray edits leave
//! maps with lights far outside the playable area or with wildly
//! out-of-range colors. A light is valid when its position sits inside the
//! map's padded world bounds and every color channel is sane. All bounds
//! are exclusive.

use loam_map::{LightRecord, Map, TILES_PER_GROUND};

/// Padding in world units added around the map extent.
const WORLD_MARGIN: f32 = 10.0;

/// Exclusive validity range per color channel.
const COLOR_RANGE: (f32, f32) = (-1.0, 1000.0);

/// Exclusive per-axis position bounds for valid lights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    /// X range.
    pub x: (f32, f32),
    /// Y range.
    pub y: (f32, f32),
    /// Z (height) range.
    pub z: (f32, f32),
}

/// The padded world bounds of a map.
///
/// One tile spans half a world unit, so the map extent is
/// `0.5 * TILES_PER_GROUND * ground_size` units per axis, padded by
/// [`WORLD_MARGIN`] on each side. Height allows a fixed band.
pub fn world_bounds(map: &Map) -> WorldBounds {
    let header = map.header();
    let x = 0.5 * TILES_PER_GROUND as f32 * header.ground_xsize as f32;
    let y = 0.5 * TILES_PER_GROUND as f32 * header.ground_ysize as f32;
    WorldBounds {
        x: (-WORLD_MARGIN, x + WORLD_MARGIN),
        y: (-WORLD_MARGIN, y + WORLD_MARGIN),
        z: (-WORLD_MARGIN, 100.0),
    }
}

/// Whether a light's position and color pass the validity thresholds.
///
/// NaN fails every comparison and therefore classifies as invalid.
pub fn valid_light(light: &LightRecord, bounds: &WorldBounds) -> bool {
    let axes = [bounds.x, bounds.y, bounds.z];
    for (i, (lo, hi)) in axes.into_iter().enumerate() {
        let p = light.position[i];
        if !(lo < p && p < hi) {
            return false;
        }
        let c = light.color[i];
        if !(COLOR_RANGE.0 < c && c < COLOR_RANGE.1) {
            return false;
        }
    }
    true
}

/// Invalid lights with their load-time ordinals, in list order.
pub fn bad_lights<'a>(map: &'a Map, bounds: &WorldBounds) -> Vec<(usize, &'a LightRecord)> {
    map.lights()
        .iter()
        .enumerate()
        .filter(|&(_, light)| !valid_light(light, bounds))
        .collect()
}

/// One-line description of a light for tool output.
pub fn describe(map_name: &str, id: usize, light: &LightRecord) -> String {
    let p = light.position;
    let c = light.color;
    format!(
        "{map_name}: light id:{id} position-xyz:({:.1}, {:.1}, {:.1}) color-rgb:[{:.2}, {:.2}, {:.2}]",
        p[0], p[1], p[2], c[0], c[1], c[2]
    )
}
