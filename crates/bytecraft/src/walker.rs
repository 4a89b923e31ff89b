//! Field-by-field traversal of records.
//!
//! Decoding records each length field as soon as it has been read. Encoding
//! records all of them up front, so a field's length can be checked before
//! any of its bytes are emitted. Neither direction rolls back on failure.

use std::io::{Read, Write};

use log::trace;

use crate::{
    directive::FieldContext,
    errors::{ConfigError, Error},
    lengths::LengthTable,
    record::Record,
    schema::Schema,
};

/// Reads every active field of `record`, in place, inside `parent`.
pub fn decode_record<T: Record, R: Read + ?Sized>(
    record: &mut T,
    reader: &mut R,
    parent: &FieldContext<'_>,
) -> Result<(), Error> {
    let schema = T::schema()?;
    let mut lengths = LengthTable::new(schema.len());

    for (position, field) in schema.fields().iter().enumerate() {
        if !field.visible {
            continue;
        }

        let ctx = field.directive.context(parent);
        if !ctx.is_skipped() {
            let len = lengths.resolve(schema, position)?;
            trace!(
                "decode `{}`: {:?}, {:?}, len {:?}",
                field.name,
                field.kind,
                ctx.order(),
                len
            );
            record
                .decode_field(position, reader, &ctx, len)
                .map_err(|err| err.in_field(&field.name))?;
        }

        // a skipped length field still sizes later fields with its current value
        if field.is_length_source {
            record_length(record, schema, position, &mut lengths)?;
        }
    }

    Ok(())
}

/// Writes every active field of `record` inside `parent`.
pub fn encode_record<T: Record, W: Write + ?Sized>(
    record: &T,
    writer: &mut W,
    parent: &FieldContext<'_>,
) -> Result<(), Error> {
    let schema = T::schema()?;
    let mut lengths = LengthTable::new(schema.len());

    for (position, field) in schema.fields().iter().enumerate() {
        if field.is_length_source {
            record_length(record, schema, position, &mut lengths)?;
        }
    }

    for (position, field) in schema.fields().iter().enumerate() {
        if !field.visible {
            continue;
        }

        let ctx = field.directive.context(parent);
        if ctx.is_skipped() {
            continue;
        }

        if let Some(expected) = lengths.resolve(schema, position)? {
            let actual = record.field_len(position).unwrap_or(expected);
            if actual != expected {
                return Err(Error::LengthMismatch {
                    field: field.name.clone(),
                    length_field: ctx.length_field().unwrap_or_default().to_string(),
                    expected,
                    actual,
                });
            }
        }

        trace!("encode `{}`: {:?}, {:?}", field.name, field.kind, ctx.order());
        record
            .encode_field(position, writer, &ctx)
            .map_err(|err| err.in_field(&field.name))?;
    }

    Ok(())
}

fn record_length<T: Record>(
    record: &T,
    schema: &Schema,
    position: usize,
    lengths: &mut LengthTable,
) -> Result<(), Error> {
    let Some(field) = schema.field(position) else {
        return Ok(());
    };
    let Some(source) = record.length_source(position) else {
        // report the first field sized by this one
        let sized = schema
            .fields()
            .iter()
            .find(|sized| sized.length_source == Some(position))
            .unwrap_or(field);
        return Err(ConfigError::InvalidLengthType {
            field: sized.name.clone(),
            directive: sized.directive.raw().to_string(),
            length_field: field.name.clone(),
        }
        .into());
    };
    lengths
        .record(position, source)
        .map_err(|err| err.in_field(&field.name))?;

    Ok(())
}
