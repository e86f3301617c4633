//! The field-definition compiler.
//!
//! A definition text declares one field per non-blank line:
//!
//! ```text
//! [repeat]type-code name    # comment
//! ```
//!
//! `repeat` defaults to 1 and means "N scalars packed contiguously", except
//! for the byte-string code `s` where it is the string length. Pad fields
//! (`x`) consume space but are excluded from the compiled field list. The
//! names `size` and `fields` are reserved for descriptor metadata and are
//! rejected, padding included.

use crate::error::DefinitionError;
use crate::field::{FieldKind, FieldSpec};

/// Names that collide with descriptor metadata.
const RESERVED: [&str; 2] = ["size", "fields"];

/// A compiled record descriptor: packed size plus ordered field metadata.
///
/// Layouts are the single source of truth for record sizes. The map
/// container validates file-declared record sizes against them and sizes
/// every serialized section from them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    size: usize,
    fields: Vec<FieldSpec>,
}

impl Layout {
    /// Compile a definition text.
    ///
    /// Fails with [`DefinitionError::InvalidField`] on any line that does
    /// not match the grammar, and [`DefinitionError::ReservedName`] on a
    /// reserved field name.
    pub fn parse(definition: &str) -> Result<Self, DefinitionError> {
        let mut fields = Vec::new();
        let mut offset = 0;
        for raw in definition.lines() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let (count, kind, name) = parse_line(line)?;
            if RESERVED.contains(&name) {
                return Err(DefinitionError::ReservedName { name: name.into() });
            }
            let width = count * kind.width();
            if kind != FieldKind::Pad {
                fields.push(FieldSpec {
                    name: name.into(),
                    kind,
                    count,
                    offset,
                });
            }
            offset += width;
        }
        Ok(Self {
            size: offset,
            fields,
        })
    }

    /// Total packed byte size of one record.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Compiled fields in declaration order, pads excluded.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Field names in declaration order, pads excluded.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Split one stripped line into `(count, kind, name)`.
fn parse_line(line: &str) -> Result<(usize, FieldKind, &str), DefinitionError> {
    let invalid = || DefinitionError::InvalidField { line: line.into() };

    let digits_len = line.chars().take_while(char::is_ascii_digit).count();
    let rest = &line[digits_len..];
    let mut chars = rest.chars();
    let code = chars.next().ok_or_else(invalid)?;
    let kind = FieldKind::from_code(code).ok_or_else(invalid)?;
    let after_code = chars.as_str();

    // At least one whitespace character must separate code and name.
    let name = after_code.trim_start();
    if name.is_empty() || name.len() == after_code.len() || !valid_name(name) {
        return Err(invalid());
    }

    let count = if digits_len == 0 {
        1
    } else {
        line[..digits_len].parse().map_err(|_| invalid())?
    };
    Ok((count, kind, name))
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
fn valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
