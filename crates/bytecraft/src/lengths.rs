//! Length resolution between a length field and the fields it sizes.

use crate::{
    errors::{ConfigError, Error},
    schema::Schema,
};

/// A value that can supply the element or byte count of another field.
pub trait LengthSource {
    /// Converts the value to a count. Negative values and values above
    /// `isize::MAX`, the largest possible allocation, are out of range.
    fn to_length(&self) -> Result<usize, Error>;
}

macro_rules! impl_length_source {
    ($($ty:ty),*) => {
        $(
            impl LengthSource for $ty {
                fn to_length(&self) -> Result<usize, Error> {
                    usize::try_from(*self)
                        .ok()
                        .filter(|&length| length <= isize::MAX as usize)
                        .ok_or(Error::LengthOutOfRange {
                            field: String::new(),
                            value: *self as i128,
                        })
                }
            }
        )*
    };
}

impl_length_source!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Resolved length-field values for one read or write of one record.
#[derive(Debug, Clone, Default)]
pub struct LengthTable {
    values: Vec<Option<usize>>,
}

impl LengthTable {
    pub fn new(field_count: usize) -> Self {
        LengthTable {
            values: vec![None; field_count],
        }
    }

    /// Converts `value` to a count and stores it for the field at `position`.
    pub fn record(&mut self, position: usize, value: &dyn LengthSource) -> Result<usize, Error> {
        let length = value.to_length()?;
        if let Some(slot) = self.values.get_mut(position) {
            *slot = Some(length);
        }

        Ok(length)
    }

    /// Length of the field at `position`, or `None` if it has no length field.
    pub fn resolve(&self, schema: &Schema, position: usize) -> Result<Option<usize>, Error> {
        let Some(field) = schema.field(position) else {
            return Ok(None);
        };
        let (Some(source), Some(name)) = (field.length_source, field.directive.length_field()) else {
            return Ok(None);
        };

        if source >= position {
            return Err(ConfigError::LengthFieldAfter {
                field: field.name.clone(),
                directive: field.directive.raw().to_string(),
                length_field: name.to_string(),
            }
            .into());
        }

        match self.values.get(source).copied().flatten() {
            Some(length) => Ok(Some(length)),
            None => Err(ConfigError::UnresolvedLength {
                field: field.name.clone(),
                length_field: name.to_string(),
            }
            .into()),
        }
    }
}
