//! Error type for field-definition compilation.

use std::fmt;

/// Errors raised while compiling a field-definition text into a
/// [`Layout`](crate::Layout).
///
/// Record definitions are string constants compiled into the binary and
/// evaluated once at startup, so a `DefinitionError` always indicates a
/// programming error in the definition set, never bad user input. Callers
/// holding a compiled-in definition are expected to abort on it rather than
/// recover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// A line did not match the `[repeat]type-code name` grammar.
    InvalidField {
        /// The offending line, stripped of comments and surrounding
        /// whitespace.
        line: String,
    },
    /// A field used a name reserved for descriptor metadata.
    ReservedName {
        /// The offending field name.
        name: String,
    },
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidField { line } => {
                write!(f, "invalid field definition: {line}")
            }
            Self::ReservedName { name } => {
                write!(f, "invalid field name: {name}")
            }
        }
    }
}

impl std::error::Error for DefinitionError {}
