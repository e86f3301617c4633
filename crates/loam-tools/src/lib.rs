//! Policy helpers shared by the Loam command-line tools.
//!
//! The library crates own the mechanism — codec, container, region engine.
//! Everything here is tool policy: argument formats, backup naming, and
//! the thresholds deciding when a light counts as invalid.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod backup;
pub mod coords;
pub mod lights;
