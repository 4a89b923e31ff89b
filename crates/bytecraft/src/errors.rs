//! Error types for schema compilation and record encoding/decoding.
//!
//! [ConfigError]s describe a defective schema: bad directive syntax, illegal
//! directive/kind combinations or broken length-field references. They are
//! produced once, when a record's schema is compiled, and never depend on the
//! bytes being processed. Everything else is an [Error] carrying the path of
//! the field it happened in.

use std::{io, string::FromUtf8Error};

/// Errors produced when compiling a [crate::schema::Schema] from [crate::field::Field]s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Directive contains a key that is not part of the grammar.
    #[error("directive \"{directive}\"{}: unrecognized key `{key}`", at(.field))]
    UnknownKey {
        field: String,
        directive: String,
        key: String,
    },
    /// A key that requires `=value` was given without one.
    #[error("directive \"{directive}\"{}: `{key}` needs a value", at(.field))]
    MissingValue {
        field: String,
        directive: String,
        key: String,
    },
    /// A key that takes no value was given `=value`.
    #[error("directive \"{directive}\"{}: `{key}` cannot have a value", at(.field))]
    UnexpectedValue {
        field: String,
        directive: String,
        key: String,
    },
    /// `-` was combined with other tokens.
    #[error("field `{field}`, directive \"{directive}\": if `-` is used, no other tokens may be used")]
    SkipNotAlone { field: String, directive: String },
    /// Both `len=` and `nt` were given.
    #[error("field `{field}`, directive \"{directive}\": can only have one of `len` or `nt`")]
    ConflictingSize { field: String, directive: String },
    /// `len=` on a field that is neither a slice nor a string.
    #[error("field `{field}`, directive \"{directive}\": `len` must be applied to a slice or string")]
    LengthOnWrongKind { field: String, directive: String },
    /// `nt` on a field that is not a string.
    #[error("field `{field}`, directive \"{directive}\": `nt` must be applied to a string")]
    NullTerminatedOnNonString { field: String, directive: String },
    /// String field with neither `len=` nor `nt`.
    #[error("directive \"{directive}\"{}: a string must have `len` or `nt`", at(.field))]
    UnsizedString { field: String, directive: String },
    /// Slice field without `len=`.
    #[error("directive \"{directive}\"{}: a slice must have `len`", at(.field))]
    UnsizedSlice { field: String, directive: String },
    /// `len=` names a field that does not exist.
    #[error("field `{field}`, directive \"{directive}\": length field `{length_field}` does not exist")]
    UnknownLengthField {
        field: String,
        directive: String,
        length_field: String,
    },
    /// `len=` names a hidden field.
    #[error("field `{field}`, directive \"{directive}\": length field `{length_field}` is hidden")]
    HiddenLengthField {
        field: String,
        directive: String,
        length_field: String,
    },
    /// `len=` names a field declared at or after the field it sizes.
    #[error("field `{field}`, directive \"{directive}\": length field `{length_field}` must come before the field it sizes")]
    LengthFieldAfter {
        field: String,
        directive: String,
        length_field: String,
    },
    /// The referenced length field cannot hold an integer count.
    #[error("field `{field}`, directive \"{directive}\": `{length_field}` cannot be used as a length field")]
    InvalidLengthType {
        field: String,
        directive: String,
        length_field: String,
    },
    /// Two fields share a name.
    #[error("field `{field}`, directive \"{directive}\": name is declared more than once")]
    DuplicateField { field: String, directive: String },
    /// A length was requested before the length field produced a value.
    #[error("field `{field}`: length field `{length_field}` has no value yet")]
    UnresolvedLength { field: String, length_field: String },
}

impl ConfigError {
    /// Names the field a directive syntax error belongs to, unless it already names one.
    pub fn for_field(mut self, name: &str) -> Self {
        match &mut self {
            ConfigError::UnknownKey { field, .. }
            | ConfigError::MissingValue { field, .. }
            | ConfigError::UnexpectedValue { field, .. }
                if field.is_empty() =>
            {
                field.push_str(name);
            }
            _ => {}
        }

        self
    }
}

/// Errors produced while reading or writing a value.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The record's schema is defective.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The underlying stream failed, including short reads.
    #[error("i/o error{}: {source}", at(.field))]
    Io {
        field: String,
        #[source]
        source: io::Error,
    },
    /// A length field holds a value that is negative or exceeds `usize`.
    #[error("length out of range{}: {value}", at(.field))]
    LengthOutOfRange { field: String, value: i128 },
    /// The element or byte count of a field disagrees with its length field.
    #[error("`{field}` must have the length given by `{length_field}`: expected {expected}, got {actual}")]
    LengthMismatch {
        field: String,
        length_field: String,
        expected: usize,
        actual: usize,
    },
    /// A decoded string is not valid UTF-8.
    #[error("invalid utf-8{}: {source}", at(.field))]
    InvalidUtf8 {
        field: String,
        #[source]
        source: FromUtf8Error,
    },
}

impl Error {
    /// True for errors caused by a defective schema rather than by the data.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Prefixes the error's field path with `name` as it unwinds out of a record.
    pub fn in_field(mut self, name: &str) -> Self {
        match &mut self {
            Error::Io { field, .. }
            | Error::LengthOutOfRange { field, .. }
            | Error::InvalidUtf8 { field, .. }
            | Error::LengthMismatch { field, .. }
            | Error::Config(ConfigError::UnsizedString { field, .. })
            | Error::Config(ConfigError::UnsizedSlice { field, .. }) => prefix(field, name),
            Error::Config(_) => {}
        }

        self
    }
}

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Self {
        Error::Io {
            field: String::new(),
            source,
        }
    }
}

fn prefix(path: &mut String, name: &str) {
    if path.is_empty() {
        path.push_str(name);
    } else {
        *path = format!("{name}.{path}");
    }
}

fn at(field: &str) -> String {
    if field.is_empty() {
        String::new()
    } else {
        format!(" in field `{field}`")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_field_builds_dotted_path() {
        let err = Error::from(io::Error::from(io::ErrorKind::UnexpectedEof))
            .in_field("data")
            .in_field("inner");

        match &err {
            Error::Io { field, .. } => assert_eq!(field, "inner.data"),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().starts_with("i/o error in field `inner.data`"));
    }

    #[test]
    fn test_config_errors_keep_their_field() {
        let err = Error::from(ConfigError::DuplicateField {
            field: "size".to_string(),
            directive: "be".to_string(),
        })
        .in_field("outer");

        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "field `size`, directive \"be\": name is declared more than once"
        );
    }

    #[test]
    fn test_for_field_names_directive_errors() {
        let err = ConfigError::UnknownKey {
            field: String::new(),
            directive: "be,packed".to_string(),
            key: "packed".to_string(),
        };
        assert_eq!(err.to_string(), "directive \"be,packed\": unrecognized key `packed`");

        let err = err.for_field("header").for_field("ignored");
        assert_eq!(
            err.to_string(),
            "directive \"be,packed\" in field `header`: unrecognized key `packed`"
        );
    }

    #[test]
    fn test_root_error_has_no_field_suffix() {
        let err = Error::LengthOutOfRange {
            field: String::new(),
            value: -1,
        };
        assert_eq!(err.to_string(), "length out of range: -1");
        assert!(!err.is_config());
    }
}
