//! Schema compiler and wire primitives for fixed-layout binary records.
//!
//! Map files are built from densely-packed, fixed-size records. Each record
//! kind is declared once as a short field-definition text — one
//! `[repeat]type-code name` line per field — and compiled into a [`Layout`]
//! describing the exact packed byte size and field offsets. Record value
//! types pair that layout with hand-written [`Record::decode`] /
//! [`Record::encode`] procedures built on the [`ByteReader`] / [`ByteWriter`]
//! primitives.
//!
//! All multi-byte values are canonically little-endian: every conversion
//! goes through `to_le_bytes` / `from_le_bytes` regardless of host byte
//! order. There is no conditional byte swapping anywhere.
//!
//! # Example
//!
//! ```
//! use loam_schema::Layout;
//!
//! let layout = Layout::parse(
//!     "
//!     3f position   # world position
//!     H  range
//!     2x unused
//!     ",
//! )
//! .unwrap();
//! assert_eq!(layout.size(), 16);
//! assert_eq!(layout.field_names().collect::<Vec<_>>(), ["position", "range"]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod layout;
pub mod record;
pub mod wire;

pub use error::DefinitionError;
pub use field::{FieldKind, FieldSpec};
pub use layout::Layout;
pub use record::Record;
pub use wire::{ByteReader, ByteWriter, FixedBytes, Truncated};
