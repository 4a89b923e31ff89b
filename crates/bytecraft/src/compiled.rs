use crate::{
    directive::Directive,
    errors::ConfigError,
    field::{Field, FieldKind},
    validate::validate,
};

/// A field whose directive has been parsed, validated and linked to its length field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledField {
    pub name: String,
    pub kind: FieldKind,
    pub visible: bool,
    pub directive: Directive,
    /// Position of the field supplying this field's length.
    pub length_source: Option<usize>,
    /// True if a later field takes its length from this one.
    pub is_length_source: bool,
}

impl TryFrom<&Field> for CompiledField {
    type Error = ConfigError;

    fn try_from(value: &Field) -> Result<Self, Self::Error> {
        // hidden fields keep no options, whatever their directive says
        let directive = if value.visible {
            let directive =
                Directive::parse(&value.directive).map_err(|err| err.for_field(&value.name))?;
            validate(&directive, &value.name, value.kind)?;
            directive
        } else {
            Directive::default()
        };

        Ok(CompiledField {
            name: value.name.clone(),
            kind: value.kind,
            visible: value.visible,
            directive,
            length_source: None,
            is_length_source: false,
        })
    }
}

impl CompiledField {
    /// True if the walker reads and writes this field.
    pub fn is_active(&self) -> bool {
        self.visible && !self.directive.is_skipped()
    }
}
