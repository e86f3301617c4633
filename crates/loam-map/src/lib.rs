//! Terrain map container: record codecs, grids, spatial index, and the
//! region engine.
//!
//! A map file holds a fixed little-endian header, three flat grids at two
//! resolutions (ground cells span [`TILES_PER_GROUND`]×[`TILES_PER_GROUND`]
//! tiles; the optional segment grid shares the tile resolution), and four
//! densely-packed element sections (meshes, quads, lights, fuzz anchors)
//! located at header-declared offsets.
//!
//! [`Map::load`] materializes the whole file — grids, element lists, and a
//! spatial index over element positions — and [`Map::save`] rebuilds the
//! image in memory with freshly computed section offsets before touching
//! the destination path. The [`region`] module copies and clears
//! rectangular areas across maps, translating coordinates between the
//! three resolutions.
//!
//! # Example
//!
//! ```
//! use loam_map::{region, Map, Point, Rect};
//!
//! let src = Map::new(2, 2);
//! let mut dst = Map::new(4, 4);
//! region::copy_region(&src, src.bounds(), &mut dst, &[Point::new(12, 12)], true);
//! assert_eq!(dst.bounds(), Rect::new(0, 0, 23, 23));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod map;
pub mod records;
pub mod rect;
pub mod region;
pub mod store;

pub use error::FormatError;
pub use grid::{Cell, Grid};
pub use map::{load_header, ElementRef, Map};
pub use records::{
    ElementKind, FuzzRecord, LightRecord, MapHeader, MeshRecord, Positioned, QuadRecord,
    Section, MAP_SIGNATURE,
};
pub use rect::{spatial_key, Point, Rect};
pub use store::ElementStore;

/// Tiles per ground cell along each axis.
pub const TILES_PER_GROUND: i32 = 6;

/// Ground-grid sentinel for "no ground here".
pub const NO_GROUND: u8 = 255;

/// Tile-grid sentinel for "no tile".
pub const NO_TILE: u8 = 0;

/// Segment-grid sentinel for "no segment".
pub const NO_SEGMENT: i16 = 0;
