//! Encoding strategies per value type.
//!
//! Primitives and sequences of primitives go straight to [crate::primitive]
//! (the fast path). Strings are either null-terminated or sized by a length
//! field, `Vec`s are always sized, and records recurse through the walker.

use std::io::{Read, Write};

use byteorder::ReadBytesExt;

use crate::{
    directive::FieldContext,
    errors::{ConfigError, Error},
    field::FieldKind,
    primitive::{Primitive, read_bytes},
};

/// A value that can be read from and written to a byte stream.
pub trait Codec {
    /// Structural kind, used to validate directives on fields of this type.
    const KIND: FieldKind;

    /// Reads the value in place. `len` is the resolved length for sized kinds.
    fn decode<R: Read + ?Sized>(
        &mut self,
        reader: &mut R,
        ctx: &FieldContext<'_>,
        len: Option<usize>,
    ) -> Result<(), Error>;

    /// Writes the value.
    fn encode<W: Write + ?Sized>(&self, writer: &mut W, ctx: &FieldContext<'_>) -> Result<(), Error>;

    /// Element count of a slice or byte count of a string.
    fn encoded_len(&self) -> Option<usize> {
        None
    }

    /// Reads `count` elements of a sequence, each with the sequence's context.
    fn decode_many<R: Read + ?Sized>(
        reader: &mut R,
        ctx: &FieldContext<'_>,
        count: usize,
    ) -> Result<Vec<Self>, Error>
    where
        Self: Sized + Default,
    {
        let mut items = Vec::new();
        for _ in 0..count {
            let mut item = Self::default();
            item.decode(reader, ctx, None)?;
            items.push(item);
        }

        Ok(items)
    }

    /// Fills a fixed-size run of elements in place.
    fn decode_into<R: Read + ?Sized>(
        items: &mut [Self],
        reader: &mut R,
        ctx: &FieldContext<'_>,
    ) -> Result<(), Error>
    where
        Self: Sized,
    {
        for item in items.iter_mut() {
            item.decode(reader, ctx, None)?;
        }

        Ok(())
    }

    /// Writes the elements of a sequence in order.
    fn encode_many<W: Write + ?Sized>(
        items: &[Self],
        writer: &mut W,
        ctx: &FieldContext<'_>,
    ) -> Result<(), Error>
    where
        Self: Sized,
    {
        for item in items {
            item.encode(writer, ctx)?;
        }

        Ok(())
    }
}

macro_rules! impl_primitive_codec {
    ($($ty:ty),*) => {
        $(
            impl Codec for $ty {
                const KIND: FieldKind = FieldKind::Scalar;

                fn decode<R: Read + ?Sized>(
                    &mut self,
                    reader: &mut R,
                    ctx: &FieldContext<'_>,
                    _len: Option<usize>,
                ) -> Result<(), Error> {
                    *self = <$ty as Primitive>::read_from(reader, ctx.order())?;
                    Ok(())
                }

                fn encode<W: Write + ?Sized>(&self, writer: &mut W, ctx: &FieldContext<'_>) -> Result<(), Error> {
                    Ok(Primitive::write_to(*self, writer, ctx.order())?)
                }

                fn decode_many<R: Read + ?Sized>(
                    reader: &mut R,
                    ctx: &FieldContext<'_>,
                    count: usize,
                ) -> Result<Vec<Self>, Error> {
                    check_byte_len::<$ty>(count)?;
                    Ok(<$ty as Primitive>::read_many(reader, ctx.order(), count)?)
                }

                fn decode_into<R: Read + ?Sized>(
                    items: &mut [Self],
                    reader: &mut R,
                    ctx: &FieldContext<'_>,
                ) -> Result<(), Error> {
                    Ok(<$ty as Primitive>::read_into(reader, ctx.order(), items)?)
                }

                fn encode_many<W: Write + ?Sized>(
                    items: &[Self],
                    writer: &mut W,
                    ctx: &FieldContext<'_>,
                ) -> Result<(), Error> {
                    Ok(<$ty as Primitive>::write_many(items, writer, ctx.order())?)
                }
            }
        )*
    };
}

impl_primitive_codec!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Rejects element counts whose encoded size overflows the addressable range.
fn check_byte_len<T: Primitive>(count: usize) -> Result<usize, Error> {
    count
        .checked_mul(T::WIDTH)
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .ok_or(Error::LengthOutOfRange {
            field: String::new(),
            value: count as i128,
        })
}

impl Codec for String {
    const KIND: FieldKind = FieldKind::String;

    fn decode<R: Read + ?Sized>(
        &mut self,
        reader: &mut R,
        ctx: &FieldContext<'_>,
        len: Option<usize>,
    ) -> Result<(), Error> {
        let bytes = if ctx.is_null_terminated() {
            read_null_terminated(reader)?
        } else {
            let count = len.ok_or_else(|| ConfigError::UnsizedString {
                field: String::new(),
                directive: ctx.directive().raw().to_string(),
            })?;
            read_bytes(reader, count)?
        };

        *self = String::from_utf8(bytes).map_err(|source| Error::InvalidUtf8 {
            field: String::new(),
            source,
        })?;

        Ok(())
    }

    fn encode<W: Write + ?Sized>(&self, writer: &mut W, ctx: &FieldContext<'_>) -> Result<(), Error> {
        writer.write_all(self.as_bytes())?;
        if ctx.is_null_terminated() {
            writer.write_all(&[0])?;
        }

        Ok(())
    }

    fn encoded_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

/// Reads bytes up to a zero byte, which is consumed but not returned.
fn read_null_terminated<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    loop {
        match reader.read_u8()? {
            0 => return Ok(bytes),
            byte => bytes.push(byte),
        }
    }
}

impl<T: Codec + Default> Codec for Vec<T> {
    const KIND: FieldKind = FieldKind::Slice;

    fn decode<R: Read + ?Sized>(
        &mut self,
        reader: &mut R,
        ctx: &FieldContext<'_>,
        len: Option<usize>,
    ) -> Result<(), Error> {
        let count = len.ok_or_else(|| ConfigError::UnsizedSlice {
            field: String::new(),
            directive: ctx.directive().raw().to_string(),
        })?;
        *self = T::decode_many(reader, ctx, count)?;

        Ok(())
    }

    fn encode<W: Write + ?Sized>(&self, writer: &mut W, ctx: &FieldContext<'_>) -> Result<(), Error> {
        T::encode_many(self, writer, ctx)
    }

    fn encoded_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T: Codec, const N: usize> Codec for [T; N] {
    const KIND: FieldKind = FieldKind::Scalar;

    fn decode<R: Read + ?Sized>(
        &mut self,
        reader: &mut R,
        ctx: &FieldContext<'_>,
        _len: Option<usize>,
    ) -> Result<(), Error> {
        T::decode_into(self, reader, ctx)
    }

    fn encode<W: Write + ?Sized>(&self, writer: &mut W, ctx: &FieldContext<'_>) -> Result<(), Error> {
        T::encode_many(self, writer, ctx)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::{directive::Directive, order::ByteOrder};

    use super::*;

    #[test]
    fn test_u16_uses_context_order() {
        let mut value = 0u16;
        value
            .decode(&mut Cursor::new([0x12u8, 0x34]), &FieldContext::root(ByteOrder::Little), None)
            .unwrap();
        assert_eq!(value, 0x3412);
    }

    #[test]
    fn test_null_terminated_string() {
        let directive = Directive::parse("nt").unwrap();
        let ctx = directive.context(&FieldContext::root(ByteOrder::Big));

        let mut reader = Cursor::new(b"Hi\0rest".to_vec());
        let mut value = String::new();
        value.decode(&mut reader, &ctx, None).unwrap();
        assert_eq!(value, "Hi");
        assert_eq!(reader.position(), 3);

        let mut out: Vec<u8> = Vec::new();
        value.encode(&mut out, &ctx).unwrap();
        assert_eq!(out, b"Hi\0");
    }

    #[test]
    fn test_null_terminated_string_without_terminator() {
        let directive = Directive::parse("nt").unwrap();
        let ctx = directive.context(&FieldContext::root(ByteOrder::Big));

        let mut value = String::new();
        let err = value.decode(&mut Cursor::new(b"abc".to_vec()), &ctx, None).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_sized_string() {
        let ctx = FieldContext::root(ByteOrder::Big);

        let mut value = String::new();
        value.decode(&mut Cursor::new(b"abcdef".to_vec()), &ctx, Some(4)).unwrap();
        assert_eq!(value, "abcd");
        assert_eq!(value.encoded_len(), Some(4));
    }

    #[test]
    fn test_string_rejects_invalid_utf8() {
        let ctx = FieldContext::root(ByteOrder::Big);
        let mut value = String::new();
        let err = value.decode(&mut Cursor::new(vec![0xFFu8, 0xFE]), &ctx, Some(2)).unwrap_err();
        assert!(matches!(err, Error::InvalidUtf8 { .. }));
    }

    #[test]
    fn test_unsized_slice_at_root() {
        let mut value: Vec<u32> = Vec::new();
        let err = value
            .decode(&mut Cursor::new(vec![0u8; 4]), &FieldContext::root(ByteOrder::Big), None)
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_vec_fast_path() {
        let ctx = FieldContext::root(ByteOrder::Big);

        let mut value: Vec<u16> = Vec::new();
        value
            .decode(&mut Cursor::new(vec![0u8, 1, 0, 2, 0, 3]), &ctx, Some(3))
            .unwrap();
        assert_eq!(value, vec![1, 2, 3]);

        let mut out: Vec<u8> = Vec::new();
        value.encode(&mut out, &ctx).unwrap();
        assert_eq!(out, vec![0, 1, 0, 2, 0, 3]);
    }

    #[test]
    fn test_sized_string_longer_than_stream() {
        let ctx = FieldContext::root(ByteOrder::Big);
        let mut value = String::new();
        let err = value
            .decode(&mut Cursor::new(b"abc".to_vec()), &ctx, Some(u32::MAX as usize))
            .unwrap_err();

        match err {
            Error::Io { source, .. } => assert_eq!(source.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_slice_byte_count_overflow() {
        let ctx = FieldContext::root(ByteOrder::Big);
        let mut value: Vec<u64> = Vec::new();
        let count = usize::MAX / 4;
        let err = value.decode(&mut Cursor::new(vec![0u8; 8]), &ctx, Some(count)).unwrap_err();

        assert!(matches!(err, Error::LengthOutOfRange { value, .. } if value == count as i128));
    }

    #[test]
    fn test_fixed_array_passthrough() {
        let ctx = FieldContext::root(ByteOrder::Big);
        let bytes: Vec<u8> = vec![0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4];

        let mut value = [0i32; 4];
        let mut reader = Cursor::new(bytes.clone());
        value.decode(&mut reader, &ctx, None).unwrap();
        assert_eq!(value, [1, 2, 3, 4]);
        assert_eq!(reader.position(), 16);

        let mut short = [0i32; 4];
        assert!(short.decode(&mut Cursor::new(&bytes[..15]), &ctx, None).is_err());

        let mut out: Vec<u8> = Vec::new();
        value.encode(&mut out, &ctx).unwrap();
        assert_eq!(out, bytes);
    }
}
