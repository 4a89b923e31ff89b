//! Fixed-width primitive encoding in a selectable byte order.
//!
//! Thin adapter over [byteorder]: every call takes the [ByteOrder] resolved for
//! the field being processed, so sibling fields can use different orders.

use std::io::{self, Read, Write};

use byteorder::{BigEndian, LittleEndian, NativeEndian, ReadBytesExt, WriteBytesExt};

use crate::order::ByteOrder;

/// Upper bound on memory reserved ahead of the bytes that fill it.
const CHUNK_BYTES: usize = 64 * 1024;

/// A value with a fixed-width binary encoding.
pub trait Primitive: Sized + Copy + Default {
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// Reads one value.
    fn read_from<R: Read + ?Sized>(reader: &mut R, order: ByteOrder) -> io::Result<Self>;

    /// Writes one value.
    fn write_to<W: Write + ?Sized>(self, writer: &mut W, order: ByteOrder) -> io::Result<()>;

    /// Fills `items` with consecutive values.
    fn read_into<R: Read + ?Sized>(reader: &mut R, order: ByteOrder, items: &mut [Self]) -> io::Result<()> {
        for item in items.iter_mut() {
            *item = Self::read_from(reader, order)?;
        }

        Ok(())
    }

    /// Reads `count` consecutive values.
    ///
    /// The buffer grows chunk by chunk as values arrive, so a large `count`
    /// over a short stream fails with `UnexpectedEof` without reserving `count`
    /// elements up front.
    fn read_many<R: Read + ?Sized>(
        reader: &mut R,
        order: ByteOrder,
        count: usize,
    ) -> io::Result<Vec<Self>> {
        let per_chunk = (CHUNK_BYTES / Self::WIDTH).max(1);
        let mut items = Vec::new();
        while items.len() < count {
            let start = items.len();
            items.resize(start + per_chunk.min(count - start), Self::default());
            Self::read_into(reader, order, &mut items[start..])?;
        }

        Ok(items)
    }

    /// Writes every value in `items`.
    fn write_many<W: Write + ?Sized>(
        items: &[Self],
        writer: &mut W,
        order: ByteOrder,
    ) -> io::Result<()> {
        for &item in items {
            item.write_to(writer, order)?;
        }

        Ok(())
    }
}

/// Reads exactly `count` bytes, reserving memory only as the bytes arrive.
pub fn read_bytes<R: Read + ?Sized>(reader: &mut R, count: usize) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    Read::take(&mut *reader, count as u64).read_to_end(&mut bytes)?;
    if bytes.len() != count {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {count} bytes, stream ended after {}", bytes.len()),
        ));
    }

    Ok(bytes)
}

impl Primitive for bool {
    const WIDTH: usize = 1;

    fn read_from<R: Read + ?Sized>(reader: &mut R, _order: ByteOrder) -> io::Result<Self> {
        Ok(reader.read_u8()? != 0)
    }

    fn write_to<W: Write + ?Sized>(self, writer: &mut W, _order: ByteOrder) -> io::Result<()> {
        writer.write_u8(u8::from(self))
    }

    fn read_many<R: Read + ?Sized>(
        reader: &mut R,
        _order: ByteOrder,
        count: usize,
    ) -> io::Result<Vec<Self>> {
        Ok(read_bytes(reader, count)?.into_iter().map(|byte| byte != 0).collect())
    }
}

impl Primitive for u8 {
    const WIDTH: usize = 1;

    fn read_from<R: Read + ?Sized>(reader: &mut R, _order: ByteOrder) -> io::Result<Self> {
        reader.read_u8()
    }

    fn write_to<W: Write + ?Sized>(self, writer: &mut W, _order: ByteOrder) -> io::Result<()> {
        writer.write_u8(self)
    }

    fn read_into<R: Read + ?Sized>(reader: &mut R, _order: ByteOrder, items: &mut [Self]) -> io::Result<()> {
        reader.read_exact(items)
    }

    fn read_many<R: Read + ?Sized>(
        reader: &mut R,
        _order: ByteOrder,
        count: usize,
    ) -> io::Result<Vec<Self>> {
        read_bytes(reader, count)
    }

    fn write_many<W: Write + ?Sized>(
        items: &[Self],
        writer: &mut W,
        _order: ByteOrder,
    ) -> io::Result<()> {
        writer.write_all(items)
    }
}

impl Primitive for i8 {
    const WIDTH: usize = 1;

    fn read_from<R: Read + ?Sized>(reader: &mut R, _order: ByteOrder) -> io::Result<Self> {
        reader.read_i8()
    }

    fn write_to<W: Write + ?Sized>(self, writer: &mut W, _order: ByteOrder) -> io::Result<()> {
        writer.write_i8(self)
    }

    fn read_into<R: Read + ?Sized>(reader: &mut R, _order: ByteOrder, items: &mut [Self]) -> io::Result<()> {
        reader.read_i8_into(items)
    }
}

macro_rules! impl_primitive {
    ($($ty:ty => $read:ident, $write:ident, $read_into:ident;)*) => {
        $(
            impl Primitive for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn read_from<R: Read + ?Sized>(reader: &mut R, order: ByteOrder) -> io::Result<Self> {
                    match order {
                        ByteOrder::Little => reader.$read::<LittleEndian>(),
                        ByteOrder::Big => reader.$read::<BigEndian>(),
                        ByteOrder::Native => reader.$read::<NativeEndian>(),
                    }
                }

                fn write_to<W: Write + ?Sized>(self, writer: &mut W, order: ByteOrder) -> io::Result<()> {
                    match order {
                        ByteOrder::Little => writer.$write::<LittleEndian>(self),
                        ByteOrder::Big => writer.$write::<BigEndian>(self),
                        ByteOrder::Native => writer.$write::<NativeEndian>(self),
                    }
                }

                fn read_into<R: Read + ?Sized>(
                    reader: &mut R,
                    order: ByteOrder,
                    items: &mut [Self],
                ) -> io::Result<()> {
                    match order {
                        ByteOrder::Little => reader.$read_into::<LittleEndian>(items),
                        ByteOrder::Big => reader.$read_into::<BigEndian>(items),
                        ByteOrder::Native => reader.$read_into::<NativeEndian>(items),
                    }
                }
            }
        )*
    };
}

impl_primitive! {
    u16 => read_u16, write_u16, read_u16_into;
    i16 => read_i16, write_i16, read_i16_into;
    u32 => read_u32, write_u32, read_u32_into;
    i32 => read_i32, write_i32, read_i32_into;
    u64 => read_u64, write_u64, read_u64_into;
    i64 => read_i64, write_i64, read_i64_into;
    f32 => read_f32, write_f32, read_f32_into;
    f64 => read_f64, write_f64, read_f64_into;
}
