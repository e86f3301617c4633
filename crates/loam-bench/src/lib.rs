//! Benchmark profiles for the Loam map tools.
//!
//! Provides deterministically-seeded synthetic maps:
//!
//! - [`reference_map`]: 8x8 ground cells (48x48 tiles) with a few hundred
//!   elements, the shape of a small real map
//! - [`stress_map`]: 32x32 ground cells (192x192 tiles) with a few
//!   thousand elements

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use loam_map::{FuzzRecord, LightRecord, Map, MeshRecord, QuadRecord};
use loam_schema::FixedBytes;
use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Build the reference profile: 8x8 ground cells, ~400 elements.
pub fn reference_map(seed: u64) -> Map {
    synthetic_map(seed, 8, 8, 100)
}

/// Build the stress profile: 32x32 ground cells, ~4000 elements.
pub fn stress_map(seed: u64) -> Map {
    synthetic_map(seed, 32, 32, 1000)
}

/// Build a map with randomized grids and `per_kind` elements of each kind,
/// deterministically from `seed`.
pub fn synthetic_map(seed: u64, ground_x: u32, ground_y: u32, per_kind: usize) -> Map {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut map = Map::new(ground_x, ground_y);

    let bounds = map.bounds();
    for y in 0..=bounds.y1 {
        for x in 0..=bounds.x1 {
            *map.tile_mut().cell_mut(x, y).unwrap() = rng.random::<u8>();
        }
    }
    for y in 0..ground_y as i32 {
        for x in 0..ground_x as i32 {
            *map.ground_mut().cell_mut(x, y).unwrap() = rng.random::<u8>();
        }
    }

    // World extent in position units is half the tile extent.
    let max_x = (bounds.x1 + 1) as f32 * 0.5;
    let max_y = (bounds.y1 + 1) as f32 * 0.5;
    for _ in 0..per_kind {
        let position = [
            rng.random_range(0.0..max_x),
            rng.random_range(0.0..max_y),
            rng.random_range(0.0..10.0f32),
        ];
        map.add_mesh(MeshRecord {
            name: FixedBytes::from_slice(b"meshes/rock01.e3d"),
            position,
            scale: rng.random_range(0.5..2.0f32),
            ..MeshRecord::default()
        });
        map.add_quad(QuadRecord {
            name: FixedBytes::from_slice(b"textures/grass.dds"),
            position,
            ..QuadRecord::default()
        });
        map.add_light(LightRecord {
            position,
            color: [
                rng.random_range(0.0..1.0f32),
                rng.random_range(0.0..1.0f32),
                rng.random_range(0.0..1.0f32),
            ],
            range: rng.random_range(1..30u16),
            ..LightRecord::default()
        });
        map.add_fuzz(FuzzRecord {
            name: FixedBytes::from_slice(b"effects/mist.part"),
            position,
            ..FuzzRecord::default()
        });
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_deterministic() {
        let mut a = reference_map(42);
        let mut b = reference_map(42);
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn reference_map_has_expected_shape() {
        let map = reference_map(42);
        assert_eq!(map.bounds().width(), 48);
        assert_eq!(map.lights().len(), 100);
        assert_eq!(map.meshes().len(), 100);
    }
}
