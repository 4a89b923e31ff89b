//! JSON‑friendly schema descriptions.
//!
//! These types describe the *layout* of a record: its fields, their kinds and
//! directives. They can be loaded from a file and turned into [crate::Field]s
//! for [crate::Schema::compile], or produced from a compiled schema to
//! document a wire format.

use serde::{Deserialize, Serialize};

use crate::{field::FieldKind, order::ByteOrder, schema::Schema};

/// Top‑level description: the record's fields in declaration order.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SchemaDef {
    pub fields: Vec<FieldDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKindDef,
    /// Directive string, e.g. `"be,len=size"`; empty when absent.
    #[serde(default)]
    pub directive: String,
    /// Hidden fields are listed but never encoded.
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

/// Structural kind of a field.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKindDef {
    Scalar,
    Slice,
    String,
    Record,
}

/// Root byte order, as named in configuration files.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrderDef {
    Little,
    Big,
    Native,
}

impl From<ByteOrder> for ByteOrderDef {
    fn from(value: ByteOrder) -> Self {
        match value {
            ByteOrder::Little => ByteOrderDef::Little,
            ByteOrder::Big => ByteOrderDef::Big,
            ByteOrder::Native => ByteOrderDef::Native,
        }
    }
}

impl From<FieldKind> for FieldKindDef {
    fn from(value: FieldKind) -> Self {
        match value {
            FieldKind::Scalar => FieldKindDef::Scalar,
            FieldKind::Slice => FieldKindDef::Slice,
            FieldKind::String => FieldKindDef::String,
            FieldKind::Record => FieldKindDef::Record,
        }
    }
}

impl From<&Schema> for SchemaDef {
    fn from(schema: &Schema) -> Self {
        SchemaDef {
            fields: schema
                .fields()
                .iter()
                .map(|field| FieldDef {
                    name: field.name.clone(),
                    kind: field.kind.into(),
                    directive: field.directive.raw().to_string(),
                    visible: field.visible,
                })
                .collect(),
        }
    }
}

impl SchemaDef {
    /// Compiles the described fields into a [Schema].
    pub fn compile(self) -> Result<Schema, crate::errors::ConfigError> {
        let fields: Vec<crate::Field> = self.fields.into_iter().map(Into::into).collect();
        Schema::compile(&fields)
    }
}
