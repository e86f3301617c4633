//! Loam: tools and libraries for editing binary terrain map files.
//!
//! This is the top-level facade crate re-exporting the public API of the
//! Loam sub-crates. For most users, adding `loam` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```
//! use loam::prelude::*;
//!
//! // Build a 2x2-ground map (12x12 tiles) with one light.
//! let mut src = Map::new(2, 2);
//! src.add_light(LightRecord {
//!     position: [3.0, 3.0, 1.0],
//!     color: [1.0, 0.9, 0.7],
//!     ..LightRecord::default()
//! });
//!
//! // Stamp its lower-left quarter twice into a bigger map.
//! let mut dst = Map::new(4, 4);
//! let source = Rect::new(0, 0, 6, 6);
//! let anchors = [Point::new(0, 0), Point::new(12, 12)];
//! copy_region(&src, source, &mut dst, &anchors, true);
//! assert_eq!(dst.lights().len(), 2);
//!
//! // Serialize to a file image with freshly computed section offsets.
//! let image = dst.to_bytes();
//! assert_eq!(&image[..4], b"elmf");
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`map`] | `loam-map` | Map container, records, grids, spatial index, region engine |
//! | [`schema`] | `loam-schema` | Field-definition compiler and wire primitives |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Map container, records, grids, spatial index, and the region engine
/// (`loam-map`).
pub use loam_map as map;

/// Field-definition schema compiler and little-endian wire primitives
/// (`loam-schema`).
pub use loam_schema as schema;

/// The most commonly used types and operations in one import.
pub mod prelude {
    pub use loam_map::region::{clear_region, copy_region};
    pub use loam_map::{
        ElementKind, ElementRef, FormatError, FuzzRecord, LightRecord, Map, MeshRecord,
        Point, QuadRecord, Rect,
    };
    pub use loam_schema::{DefinitionError, Record};
}
