//! Records: structs whose layout is described by a [Schema].

use std::io::{Read, Write};

use crate::{
    directive::FieldContext,
    errors::{ConfigError, Error},
    lengths::LengthSource,
    schema::Schema,
};

/// A struct encoded field by field in declaration order.
///
/// Usually derived with `#[derive(Record)]`; every method addresses fields by
/// their position in [Record::schema]. Hidden fields are never passed in.
pub trait Record {
    /// The record's schema, compiled once and cached.
    fn schema() -> Result<&'static Schema, ConfigError>
    where
        Self: Sized;

    /// Reads the field at `index`.
    fn decode_field<R: Read + ?Sized>(
        &mut self,
        index: usize,
        reader: &mut R,
        ctx: &FieldContext<'_>,
        len: Option<usize>,
    ) -> Result<(), Error>;

    /// Writes the field at `index`.
    fn encode_field<W: Write + ?Sized>(
        &self,
        index: usize,
        writer: &mut W,
        ctx: &FieldContext<'_>,
    ) -> Result<(), Error>;

    /// Element or byte count of the slice or string field at `index`.
    fn field_len(&self, index: usize) -> Option<usize>;

    /// The field at `index` if it can act as a length field.
    fn length_source(&self, index: usize) -> Option<&dyn LengthSource>;
}
