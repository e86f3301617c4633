//! Error type for map loading and saving.

use std::fmt;
use std::io;

use loam_schema::Truncated;

use crate::records::ElementKind;

/// Errors raised while reading or writing a map file.
#[derive(Debug)]
pub enum FormatError {
    /// An I/O error from the underlying file or gzip stream.
    Io(io::Error),
    /// The file does not start with the `elmf` signature.
    BadSignature {
        /// The four bytes actually found.
        found: [u8; 4],
    },
    /// An element section's declared record size does not match the
    /// compiled descriptor size, meaning the file uses an incompatible
    /// record revision.
    ElementSize {
        /// The element kind whose size disagreed.
        kind: ElementKind,
        /// The per-record size declared in the header.
        declared: u32,
        /// The size this build's descriptor compiles to.
        expected: u32,
    },
    /// A section ran past the end of the file image.
    Truncated {
        /// Which section was being decoded.
        section: &'static str,
        /// Bytes the decode needed at the point of failure.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },
}

impl FormatError {
    /// Wrap a wire-level truncation with the section being decoded.
    pub(crate) fn truncated(section: &'static str, t: Truncated) -> Self {
        Self::Truncated {
            section,
            needed: t.needed,
            available: t.available,
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::BadSignature { found } => {
                write!(f, "invalid map file: wrong signature {found:02x?}")
            }
            Self::ElementSize {
                kind,
                declared,
                expected,
            } => {
                write!(
                    f,
                    "invalid {} element size: {declared} (expected {expected})",
                    kind.name()
                )
            }
            Self::Truncated {
                section,
                needed,
                available,
            } => {
                write!(
                    f,
                    "truncated {section} section: needed {needed} bytes, {available} available"
                )
            }
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
