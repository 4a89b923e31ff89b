//! Legality of directive options for a field's kind.

use crate::{directive::Directive, errors::ConfigError, field::FieldKind};

/// Rejects directive combinations that cannot apply to a field of `kind`.
pub fn validate(directive: &Directive, field: &str, kind: FieldKind) -> Result<(), ConfigError> {
    let raw = directive.raw();

    if directive.is_skipped() && raw != "-" {
        return Err(ConfigError::SkipNotAlone {
            field: field.to_string(),
            directive: raw.to_string(),
        });
    }

    if directive.is_null_terminated() && directive.length_field().is_some() {
        return Err(ConfigError::ConflictingSize {
            field: field.to_string(),
            directive: raw.to_string(),
        });
    }

    if directive.length_field().is_some() && !matches!(kind, FieldKind::Slice | FieldKind::String) {
        return Err(ConfigError::LengthOnWrongKind {
            field: field.to_string(),
            directive: raw.to_string(),
        });
    }

    if directive.is_null_terminated() && kind != FieldKind::String {
        return Err(ConfigError::NullTerminatedOnNonString {
            field: field.to_string(),
            directive: raw.to_string(),
        });
    }

    // a skipped field is never sized, so it needs neither `len` nor `nt`
    if directive.is_skipped() {
        return Ok(());
    }

    match kind {
        FieldKind::String if !directive.is_null_terminated() && directive.length_field().is_none() => {
            Err(ConfigError::UnsizedString {
                field: field.to_string(),
                directive: raw.to_string(),
            })
        }
        FieldKind::Slice if directive.length_field().is_none() => Err(ConfigError::UnsizedSlice {
            field: field.to_string(),
            directive: raw.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(raw: &str, kind: FieldKind) -> Result<(), ConfigError> {
        validate(&Directive::parse(raw).unwrap(), "f", kind)
    }

    #[test]
    fn test_valid_combinations() {
        assert_eq!(check("", FieldKind::Scalar), Ok(()));
        assert_eq!(check("le", FieldKind::Record), Ok(()));
        assert_eq!(check("len=n", FieldKind::Slice), Ok(()));
        assert_eq!(check("be,len=n", FieldKind::String), Ok(()));
        assert_eq!(check("nt", FieldKind::String), Ok(()));
        assert_eq!(check("-", FieldKind::String), Ok(()));
        assert_eq!(check("-", FieldKind::Slice), Ok(()));
    }

    #[test]
    fn test_skip_must_be_alone() {
        assert_eq!(
            check("-,le", FieldKind::Scalar),
            Err(ConfigError::SkipNotAlone {
                field: "f".to_string(),
                directive: "-,le".to_string()
            })
        );
        assert!(matches!(
            check("-,-", FieldKind::Scalar),
            Err(ConfigError::SkipNotAlone { .. })
        ));
    }

    #[test]
    fn test_len_and_nt_conflict() {
        assert_eq!(
            check("nt,len=n", FieldKind::String),
            Err(ConfigError::ConflictingSize {
                field: "f".to_string(),
                directive: "nt,len=n".to_string()
            })
        );
    }

    #[test]
    fn test_len_on_scalar() {
        assert_eq!(
            check("len=n", FieldKind::Scalar),
            Err(ConfigError::LengthOnWrongKind {
                field: "f".to_string(),
                directive: "len=n".to_string()
            })
        );
        assert!(matches!(
            check("len=n", FieldKind::Record),
            Err(ConfigError::LengthOnWrongKind { .. })
        ));
    }

    #[test]
    fn test_nt_on_slice() {
        assert!(matches!(
            check("nt", FieldKind::Slice),
            Err(ConfigError::NullTerminatedOnNonString { .. })
        ));
    }

    #[test]
    fn test_unsized() {
        assert_eq!(
            check("", FieldKind::String),
            Err(ConfigError::UnsizedString {
                field: "f".to_string(),
                directive: String::new(),
            })
        );
        assert_eq!(
            check("be", FieldKind::Slice),
            Err(ConfigError::UnsizedSlice {
                field: "f".to_string(),
                directive: "be".to_string(),
            })
        );
    }
}
