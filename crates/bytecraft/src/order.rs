//! Byte order selection for fixed-width values.

/// Byte order used to encode multi-byte primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
    /// Whatever the target platform uses.
    Native,
}

impl ByteOrder {
    /// Resolves [ByteOrder::Native] to the concrete order of the target.
    pub fn resolve(self) -> ByteOrder {
        match self {
            ByteOrder::Native if cfg!(target_endian = "big") => ByteOrder::Big,
            ByteOrder::Native => ByteOrder::Little,
            order => order,
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::ByteOrderDef> for ByteOrder {
    fn from(value: crate::serde::ByteOrderDef) -> Self {
        match value {
            crate::serde::ByteOrderDef::Little => ByteOrder::Little,
            crate::serde::ByteOrderDef::Big => ByteOrder::Big,
            crate::serde::ByteOrderDef::Native => ByteOrder::Native,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_explicit_orders() {
        assert_eq!(ByteOrder::Little.resolve(), ByteOrder::Little);
        assert_eq!(ByteOrder::Big.resolve(), ByteOrder::Big);
    }

    #[test]
    fn test_resolve_native() {
        let expected = if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        };
        assert_eq!(ByteOrder::Native.resolve(), expected);
    }
}
