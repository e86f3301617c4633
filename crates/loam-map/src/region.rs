//! Region copy and removal across maps.
//!
//! All operations take a source rectangle in tile coordinates (inclusive
//! bounds) and a destination anchor point, translating between the three
//! resolutions involved: ground cells are [`TILES_PER_GROUND`] times
//! coarser than tiles, and element positions run at twice tile resolution,
//! so a tile-coordinate delta moves elements by half as many world units.
//!
//! Grid writes that land outside the destination grid are skipped.

use log::debug;

use crate::map::Map;
use crate::records::Positioned;
use crate::rect::{Point, Rect};
use crate::store::ElementStore;
use crate::{NO_GROUND, NO_SEGMENT, NO_TILE, TILES_PER_GROUND};

/// Copy ground-grid cells from `source` in `src` to the `dest` anchor in
/// `dst`, at ground resolution.
pub fn copy_ground(src: &Map, source: Rect, dst: &mut Map, dest: Point) {
    let ox = dest.x.div_euclid(TILES_PER_GROUND) - source.x0.div_euclid(TILES_PER_GROUND);
    let oy = dest.y.div_euclid(TILES_PER_GROUND) - source.y0.div_euclid(TILES_PER_GROUND);
    for (x, y, g) in src.ground_in(source) {
        if let Some(cell) = dst.ground.cell_mut(ox + x, oy + y) {
            *cell = g;
        }
    }
}

/// Copy tile-grid cells from `source` in `src` to the `dest` anchor in
/// `dst`, 1:1.
pub fn copy_tiles(src: &Map, source: Rect, dst: &mut Map, dest: Point) {
    let ox = dest.x - source.x0;
    let oy = dest.y - source.y0;
    for (x, y, t) in src.tiles_in(source) {
        if let Some(cell) = dst.tile.cell_mut(ox + x, oy + y) {
            *cell = t;
        }
    }
}

/// Copy segment-grid cells with the same offset as [`copy_tiles`].
///
/// A no-op unless both maps carry segment data.
pub fn copy_segments(src: &Map, source: Rect, dst: &mut Map, dest: Point) {
    let (Some(src_segment), Some(dst_segment)) = (src.segment.as_ref(), dst.segment.as_mut())
    else {
        return;
    };
    let ox = dest.x - source.x0;
    let oy = dest.y - source.y0;
    for (x, y, v) in src_segment.iter_rect(source) {
        if let Some(cell) = dst_segment.cell_mut(ox + x, oy + y) {
            *cell = v;
        }
    }
}

/// Duplicate every live element in `source` into `dst`, offsetting X and Y
/// by half the tile-coordinate delta. Z is untouched.
///
/// Elements flagged pending-removal are skipped. Duplicates go through the
/// normal add path, so they are indexed under their new position.
pub fn copy_elements(src: &Map, source: Rect, dst: &mut Map, dest: Point) {
    let ox = (dest.x - source.x0) as f32 * 0.5;
    let oy = (dest.y - source.y0) as f32 * 0.5;
    copy_kind(&src.meshes, source, &mut dst.meshes, ox, oy);
    copy_kind(&src.quads, source, &mut dst.quads, ox, oy);
    copy_kind(&src.lights, source, &mut dst.lights, ox, oy);
    copy_kind(&src.fuzz, source, &mut dst.fuzz, ox, oy);
}

fn copy_kind<R: Positioned + Clone>(
    src: &ElementStore<R>,
    source: Rect,
    dst: &mut ElementStore<R>,
    ox: f32,
    oy: f32,
) {
    for record in src.live_in_rect(source) {
        let mut copy = record.clone();
        let position = copy.position_mut();
        position[0] += ox;
        position[1] += oy;
        dst.insert(copy);
    }
}

/// Reset every ground cell covered by a tile rectangle to "no ground".
pub fn remove_ground(dst: &mut Map, rect: Rect) {
    dst.ground.fill(rect.to_ground(), NO_GROUND);
}

/// Reset every tile cell in a rectangle to "no tile".
pub fn remove_tiles(dst: &mut Map, rect: Rect) {
    dst.tile.fill(rect, NO_TILE);
}

/// Reset every segment cell in a rectangle; a no-op without segment data.
pub fn remove_segments(dst: &mut Map, rect: Rect) {
    if let Some(segment) = dst.segment.as_mut() {
        segment.fill(rect, NO_SEGMENT);
    }
}

/// Remove the point elements in a rectangle and flag what stays behind.
///
/// Quad, light, and fuzz elements are physically dropped from both list
/// and index. Everything still standing in the rectangle afterwards — in
/// practice only meshes, which are deliberately never dropped — is flagged
/// pending-removal so a following copy skips it.
pub fn remove_elements(dst: &mut Map, rect: Rect) {
    let removed = dst.quads.remove_in(rect)
        + dst.lights.remove_in(rect)
        + dst.fuzz.remove_in(rect);
    debug!("cleared {rect:?}: removed {removed} elements");

    dst.meshes.mark_removed_in(rect);
    dst.quads.mark_removed_in(rect);
    dst.lights.mark_removed_in(rect);
    dst.fuzz.mark_removed_in(rect);
}

/// Clear a destination rectangle ahead of a copy: grids to their
/// sentinels, then elements per [`remove_elements`].
pub fn clear_region(dst: &mut Map, rect: Rect) {
    remove_ground(dst, rect);
    remove_tiles(dst, rect);
    remove_segments(dst, rect);
    remove_elements(dst, rect);
}

/// Copy `source` from `src` to every destination anchor in turn.
///
/// Each destination is processed fully before the next: clear (when
/// `clear` is set), then ground, tiles, segments, and elements.
/// Overlapping destinations follow last-write-wins.
pub fn copy_region(src: &Map, source: Rect, dst: &mut Map, destinations: &[Point], clear: bool) {
    for &dest in destinations {
        if clear {
            let target = Rect::new(
                dest.x,
                dest.y,
                dest.x + source.width() - 1,
                dest.y + source.height() - 1,
            );
            clear_region(dst, target);
        }
        copy_ground(src, source, dst, dest);
        copy_tiles(src, source, dst, dest);
        copy_segments(src, source, dst, dest);
        copy_elements(src, source, dst, dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{LightRecord, MeshRecord, QuadRecord};
    use crate::rect::spatial_key;

    fn light_at(x: f32, y: f32) -> LightRecord {
        LightRecord {
            position: [x, y, 1.0],
            ..LightRecord::default()
        }
    }

    fn mesh_at(x: f32, y: f32) -> MeshRecord {
        MeshRecord {
            position: [x, y, 0.0],
            scale: 1.0,
            ..MeshRecord::default()
        }
    }

    #[test]
    fn light_copy_scales_by_half_tile_delta() {
        // 2x2 ground map: 12x12 tiles. One light at (3, 3), key (6, 6).
        let mut src = Map::new(2, 2);
        src.add_light(light_at(3.0, 3.0));
        let mut dst = Map::new(2, 2);

        copy_region(&src, Rect::new(0, 0, 6, 6), &mut dst, &[Point::new(6, 0)], false);

        assert_eq!(dst.lights().len(), 1);
        let copied = dst.lights().get(0).unwrap();
        // Half the (6, 0) tile delta lands on the position's world units.
        assert_eq!(copied.position, [6.0, 3.0, 1.0]);
        assert_eq!(spatial_key(copied.position), (12, 6));
        assert_eq!(dst.lights().bucket((12, 6)).count(), 1);
        // Source map is untouched.
        assert_eq!(src.lights().get(0).unwrap().position, [3.0, 3.0, 1.0]);
        assert_eq!(src.lights().bucket((6, 6)).count(), 1);
    }

    #[test]
    fn elements_outside_the_source_rectangle_stay_behind() {
        let mut src = Map::new(2, 2);
        src.add_light(light_at(3.0, 3.0)); // key (6, 6)
        let mut dst = Map::new(2, 2);
        copy_elements(&src, Rect::new(0, 0, 5, 5), &mut dst, Point::new(6, 0));
        assert_eq!(dst.lights().len(), 0);
    }

    #[test]
    fn grid_copy_offsets_are_consistent_across_resolutions() {
        let mut src = Map::new(2, 2);
        *src.ground_mut().cell_mut(0, 0).unwrap() = 42;
        *src.tile_mut().cell_mut(2, 3).unwrap() = 7;
        src.segment_mut().unwrap().fill(Rect::new(2, 3, 2, 3), -5);
        let mut dst = Map::new(2, 2);

        let source = Rect::new(0, 0, 5, 5);
        let dest = Point::new(6, 0);
        copy_ground(&src, source, &mut dst, dest);
        copy_tiles(&src, source, &mut dst, dest);
        copy_segments(&src, source, &mut dst, dest);

        // Ground offset: 6/6 - 0/6 = 1 cell right.
        assert_eq!(dst.ground().get(1, 0), Some(42));
        assert_eq!(dst.ground().get(0, 0), Some(NO_GROUND));
        // Tiles move 1:1 by (6, 0).
        assert_eq!(dst.tile().get(8, 3), Some(7));
        // Segments share the tile offset.
        assert_eq!(dst.segment().unwrap().get(8, 3), Some(-5));
    }

    #[test]
    fn out_of_bounds_destination_cells_are_skipped() {
        let mut src = Map::new(1, 1);
        src.tile_mut().fill(Rect::new(0, 0, 5, 5), 3);
        let mut dst = Map::new(1, 1);
        copy_tiles(&src, Rect::new(0, 0, 5, 5), &mut dst, Point::new(4, 4));
        assert_eq!(dst.tile().get(4, 4), Some(3));
        assert_eq!(dst.tile().get(5, 5), Some(3));
        // Cells that would land at x or y > 5 simply vanish.
        assert_eq!(dst.tile().iter_rect(dst.bounds()).filter(|&(_, _, t)| t == 3).count(), 4);
    }

    #[test]
    fn segment_copy_is_noop_without_segment_data() {
        let mut src = Map::new(1, 1);
        src.strip_segment();
        let mut dst = Map::new(1, 1);
        copy_segments(&src, Rect::new(0, 0, 5, 5), &mut dst, Point::new(0, 0));
        assert!(dst.segment().unwrap().as_slice().iter().all(|&v| v == NO_SEGMENT));
    }

    #[test]
    fn clear_resets_grids_and_drops_point_elements() {
        let mut map = Map::new(2, 2);
        map.ground_mut().fill(Rect::new(0, 0, 1, 1), 9);
        map.tile_mut().fill(Rect::new(0, 0, 11, 11), 4);
        map.segment_mut().unwrap().fill(Rect::new(0, 0, 11, 11), 2);
        map.add_quad(QuadRecord {
            position: [1.0, 1.0, 0.0],
            ..QuadRecord::default()
        });
        map.add_light(light_at(2.0, 2.0));
        map.add_mesh(mesh_at(1.5, 1.5));

        clear_region(&mut map, Rect::new(0, 0, 5, 5));

        assert_eq!(map.ground().get(0, 0), Some(NO_GROUND));
        assert_eq!(map.tile().get(0, 0), Some(NO_TILE));
        assert_eq!(map.segment().unwrap().get(0, 0), Some(NO_SEGMENT));
        // Tiles outside the cleared rectangle keep their values.
        assert_eq!(map.tile().get(6, 6), Some(4));
        assert_eq!(map.quads().len(), 0);
        assert_eq!(map.lights().len(), 0);
        // The mesh survives, flagged so a copy will skip it.
        assert_eq!(map.meshes().len(), 1);
        assert_eq!(map.meshes().live_in_rect(Rect::new(0, 0, 5, 5)).count(), 0);
    }

    #[test]
    fn remove_then_copy_twice_is_idempotent() {
        let mut src = Map::new(2, 2);
        src.tile_mut().fill(Rect::new(0, 0, 5, 5), 8);
        src.add_light(light_at(1.0, 1.0));
        src.add_mesh(mesh_at(2.0, 2.0));

        let source = Rect::new(0, 0, 5, 5);
        let dest = [Point::new(6, 6)];

        let mut once = Map::new(2, 2);
        copy_region(&src, source, &mut once, &dest, true);

        let mut twice = Map::new(2, 2);
        copy_region(&src, source, &mut twice, &dest, true);
        copy_region(&src, source, &mut twice, &dest, true);

        assert_eq!(once.tile().as_slice(), twice.tile().as_slice());
        assert_eq!(once.ground().as_slice(), twice.ground().as_slice());
        // Point elements are dropped and re-copied, so the repeat changes
        // nothing.
        assert_eq!(once.lights().len(), 1);
        assert_eq!(twice.lights().len(), 1);
        assert_eq!(
            once.lights().get(0).unwrap().position,
            twice.lights().get(0).unwrap().position
        );
        // Meshes are never physically removed: round two's clear flags the
        // first copy and the copy step adds a fresh one. Only the fresh one
        // is live.
        assert_eq!(once.meshes().len(), 1);
        assert_eq!(twice.meshes().len(), 2);
        assert_eq!(
            twice
                .meshes()
                .live_in_rect(Rect::new(6, 6, 11, 11))
                .count(),
            1
        );
    }

    #[test]
    fn multiple_destinations_are_processed_independently() {
        let mut src = Map::new(2, 2);
        src.add_light(light_at(1.0, 1.0));
        let mut dst = Map::new(2, 2);

        copy_region(
            &src,
            Rect::new(0, 0, 3, 3),
            &mut dst,
            &[Point::new(4, 0), Point::new(8, 0)],
            false,
        );

        let positions: Vec<[f32; 3]> =
            dst.lights().iter().map(|l| l.position).collect();
        assert_eq!(positions, [[3.0, 1.0, 1.0], [5.0, 1.0, 1.0]]);
    }
}
