//! Definition of record fields used to build a [crate::schema::Schema].

/// A single named field of a record, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name used by `len=` references and in error messages.
    pub name: String,
    /// Structural kind of the field's type.
    pub kind: FieldKind,
    /// Hidden fields are never read, written or eligible as length fields.
    pub visible: bool,
    /// Raw directive string, possibly empty.
    pub directive: String,
}

impl Field {
    /// A visible field with an empty directive.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Field {
            name: name.into(),
            kind,
            visible: true,
            directive: String::new(),
        }
    }

    /// A field that takes no part in encoding.
    pub fn hidden(name: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            kind: FieldKind::Scalar,
            visible: false,
            directive: String::new(),
        }
    }

    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = directive.into();
        self
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldDef> for Field {
    fn from(value: crate::serde::FieldDef) -> Self {
        Field {
            name: value.name,
            kind: value.kind.into(),
            visible: value.visible,
            directive: value.directive,
        }
    }
}

/// Structural kind of a field, which decides the directives it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Fixed-width value: a primitive or a fixed-size array of encodable values.
    Scalar,
    /// Variable-length sequence sized by a `len=` field.
    Slice,
    /// Text sized by a `len=` field or terminated by a zero byte.
    String,
    /// Nested record, encoded field by field.
    Record,
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldKindDef> for FieldKind {
    fn from(value: crate::serde::FieldKindDef) -> Self {
        match value {
            crate::serde::FieldKindDef::Scalar => FieldKind::Scalar,
            crate::serde::FieldKindDef::Slice => FieldKind::Slice,
            crate::serde::FieldKindDef::String => FieldKind::String,
            crate::serde::FieldKindDef::Record => FieldKind::Record,
        }
    }
}
