//! Schema: compiled, positionally indexed description of a record's fields.
//!
//! Length-field references are resolved from names to positions once, while
//! compiling; the walker only ever looks fields up by position.

use std::collections::BTreeMap;

use log::debug;

use crate::{
    compiled::CompiledField,
    errors::ConfigError,
    field::{Field, FieldKind},
};

/// A compiled record schema. Use [Schema::compile] to build it from [Field]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<CompiledField>,
    positions: BTreeMap<String, usize>,
}

impl Schema {
    /// Compiles `fields` in declaration order. Fails on the first defective field.
    pub fn compile(fields: &[Field]) -> Result<Self, ConfigError> {
        let mut compiled_fields = Vec::with_capacity(fields.len());
        let mut positions = BTreeMap::new();

        for (position, field) in fields.iter().enumerate() {
            if positions.insert(field.name.clone(), position).is_some() {
                return Err(ConfigError::DuplicateField {
                    field: field.name.clone(),
                    directive: field.directive.clone(),
                });
            }

            compiled_fields.push(CompiledField::try_from(field)?);
        }

        let mut schema = Schema {
            fields: compiled_fields,
            positions,
        };

        let mut links = 0;
        for position in 0..schema.fields.len() {
            let field = &schema.fields[position];
            if !field.is_active() {
                continue;
            }
            let Some(length_field) = field.directive.length_field() else {
                continue;
            };

            let source = schema.locate_length_field(length_field, position)?;
            schema.fields[position].length_source = Some(source);
            schema.fields[source].is_length_source = true;
            links += 1;
        }

        debug!(
            "compiled record schema: {} fields, {} length links",
            schema.fields.len(),
            links
        );

        Ok(schema)
    }

    /// Finds the position of `name` as the length field of the field at `position`.
    ///
    /// The length field must exist, be visible, be a scalar and precede `position`.
    pub fn locate_length_field(&self, name: &str, position: usize) -> Result<usize, ConfigError> {
        let field = &self.fields[position];
        let directive = field.directive.raw();

        let source = self
            .position_of(name)
            .ok_or_else(|| ConfigError::UnknownLengthField {
                field: field.name.clone(),
                directive: directive.to_string(),
                length_field: name.to_string(),
            })?;

        let source_field = &self.fields[source];
        if !source_field.visible {
            return Err(ConfigError::HiddenLengthField {
                field: field.name.clone(),
                directive: directive.to_string(),
                length_field: name.to_string(),
            });
        }
        if source >= position {
            return Err(ConfigError::LengthFieldAfter {
                field: field.name.clone(),
                directive: directive.to_string(),
                length_field: name.to_string(),
            });
        }
        if source_field.kind != FieldKind::Scalar {
            return Err(ConfigError::InvalidLengthType {
                field: field.name.clone(),
                directive: directive.to_string(),
                length_field: name.to_string(),
            });
        }

        Ok(source)
    }

    /// Compiled fields in declaration order.
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    pub fn field(&self, position: usize) -> Option<&CompiledField> {
        self.fields.get(position)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
