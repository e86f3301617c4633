//! The [`Record`] trait tying value types to compiled layouts.

use crate::layout::Layout;
use crate::wire::{ByteReader, ByteWriter, Truncated};

/// A fixed-size wire record described by a field-definition text.
///
/// Implementors pair three things that must agree:
///
/// - [`Record::DEFINITION`], the field-definition text;
/// - [`Record::layout`], the definition compiled once into a [`Layout`]
///   (the authoritative record size);
/// - [`Record::decode`] / [`Record::encode`], hand-written field-by-field
///   procedures mirroring the definition line for line.
///
/// `Default` supplies the zero-initialized value object: scalar fields 0,
/// repeated fields all-zero, byte-string fields all-NUL.
///
/// Decoding consumes exactly [`Layout::size`] bytes from the reader and
/// encoding appends exactly that many; both properties are load-bearing for
/// section offset bookkeeping and are asserted by the descriptor law tests
/// of every concrete record kind.
pub trait Record: Sized + Default {
    /// Short lower-case record kind name used in error messages.
    const NAME: &'static str;

    /// Field-definition text compiled by [`Record::layout`].
    const DEFINITION: &'static str;

    /// The compiled layout for this record kind.
    ///
    /// Evaluated once per process. Panics if [`Record::DEFINITION`] does
    /// not compile — a malformed compiled-in definition is a programming
    /// error, not a recoverable condition.
    fn layout() -> &'static Layout;

    /// Decode one record at the reader's cursor.
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, Truncated>;

    /// Append the record's wire form to the writer.
    fn encode(&self, w: &mut ByteWriter);
}
