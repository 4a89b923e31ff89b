//! # bytecraft
//!
//! A declarative binary struct codec. A record's fields are read and written
//! in declaration order; per-field directives describe byte order, which
//! sibling supplies a field's length, and whether a string is terminated by a
//! zero byte. See [directive] for the directive grammar.
//!
//! ## Example
//!
//! ```
//! use bytecraft::ByteOrder;
//! use bytecraft_derive::Record;
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct Message {
//!     size: u32,
//!     #[bytecraft("len=size")]
//!     data: Vec<u8>,
//!     #[bytecraft("nt")]
//!     text: String,
//! }
//!
//! let bytes = [
//!     0x00, 0x00, 0x00, 0x08, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
//!     b'H', b'e', b'l', b'l', b'o', 0x00,
//! ];
//! let message: Message = bytecraft::from_bytes(&bytes, ByteOrder::Big).unwrap();
//! assert_eq!(message.data, vec![0, 1, 2, 3, 4, 5, 6, 7]);
//! assert_eq!(message.text, "Hello");
//! assert_eq!(bytecraft::to_bytes(ByteOrder::Big, &message).unwrap(), bytes);
//! ```
//!
//! With the `derive` feature the macro is also available as `bytecraft::Record`.
//! Records can be described by hand as well, with [Field]s, [Schema::compile]
//! and an implementation of [Record].

use std::io::{Cursor, Read, Write};

pub mod codec;
pub mod compiled;
pub mod directive;
pub mod errors;
pub mod field;
pub mod lengths;
pub mod order;
pub mod primitive;
pub mod record;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod validate;
pub mod walker;

pub use codec::Codec;
pub use directive::{Directive, FieldContext};
pub use errors::{ConfigError, Error};
pub use field::{Field, FieldKind};
pub use lengths::LengthSource;
pub use order::ByteOrder;
pub use record::Record;
pub use schema::Schema;

#[cfg(feature = "derive")]
pub use bytecraft_derive::Record;

/// Reads `value` in place from `reader`, using `order` for every field that does not override it.
///
/// Fields decoded before a failure keep their new values.
pub fn read<R: Read + ?Sized, T: Codec>(reader: &mut R, order: ByteOrder, value: &mut T) -> Result<(), Error> {
    value.decode(reader, &FieldContext::root(order), None)
}

/// Writes `value` to `writer`, using `order` for every field that does not override it.
///
/// Bytes emitted before a failure are not taken back.
pub fn write<W: Write + ?Sized, T: Codec>(writer: &mut W, order: ByteOrder, value: &T) -> Result<(), Error> {
    value.encode(writer, &FieldContext::root(order))
}

/// Decodes a value from the start of `bytes`. Trailing bytes are ignored.
pub fn from_bytes<T: Codec + Default>(bytes: &[u8], order: ByteOrder) -> Result<T, Error> {
    let mut value = T::default();
    read(&mut Cursor::new(bytes), order, &mut value)?;

    Ok(value)
}

/// Encodes `value` into a new buffer.
pub fn to_bytes<T: Codec>(order: ByteOrder, value: &T) -> Result<Vec<u8>, Error> {
    let mut bytes: Vec<u8> = Vec::new();
    write(&mut bytes, order, value)?;

    Ok(bytes)
}

/// Compiles and caches the schema of `T`, surfacing configuration errors before any I/O.
pub fn validate<T: Record>() -> Result<&'static Schema, ConfigError> {
    T::schema()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_passthrough() {
        let bytes = [0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4];
        let value: [i32; 4] = from_bytes(&bytes, ByteOrder::Big).unwrap();
        assert_eq!(value, [1, 2, 3, 4]);
        assert_eq!(to_bytes(ByteOrder::Big, &value).unwrap(), bytes);
    }

    #[test]
    fn test_scalar_orders() {
        assert_eq!(to_bytes(ByteOrder::Little, &0x0102u16).unwrap(), vec![0x02, 0x01]);
        assert_eq!(to_bytes(ByteOrder::Big, &0x0102u16).unwrap(), vec![0x01, 0x02]);
        assert_eq!(from_bytes::<f64>(&1.0f64.to_le_bytes(), ByteOrder::Little).unwrap(), 1.0);
    }

    #[test]
    fn test_short_input() {
        let err = from_bytes::<u32>(&[0, 1], ByteOrder::Big).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_write_into_generic_writer() {
        let mut out: Vec<u8> = Vec::new();
        write(&mut out, ByteOrder::Big, &[true, false]).unwrap();
        assert_eq!(out, vec![1, 0]);
    }
}
