//! Per-field directives and the effective context they produce.
//!
//! A directive is a comma separated list of tokens:
//!
//! | token        | meaning                                         |
//! |--------------|-------------------------------------------------|
//! | `le`         | little-endian                                   |
//! | `be`         | big-endian                                      |
//! | `ne`         | native byte order                               |
//! | `nt`         | string is terminated by a zero byte             |
//! | `len=<name>` | element/byte count comes from sibling `<name>`  |
//! | `-`          | field is never read or written                  |
//!
//! Only the byte order is inherited from the enclosing context; every other
//! option applies to the decorated field alone.

use crate::{errors::ConfigError, order::ByteOrder};

static ROOT: Directive = Directive {
    raw: String::new(),
    order: None,
    skip: false,
    length_field: None,
    null_terminated: false,
};

/// A parsed directive, independent of where the field sits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    raw: String,
    order: Option<ByteOrder>,
    skip: bool,
    length_field: Option<String>,
    null_terminated: bool,
}

impl Directive {
    /// Parses a directive string. An empty string yields a directive with no options.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut directive = Directive {
            raw: raw.to_string(),
            ..Default::default()
        };

        if raw.is_empty() {
            return Ok(directive);
        }

        for token in raw.split(',') {
            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (token, None),
            };

            let takes_value = match key {
                "le" => {
                    directive.order = Some(ByteOrder::Little);
                    false
                }
                "be" => {
                    directive.order = Some(ByteOrder::Big);
                    false
                }
                "ne" => {
                    directive.order = Some(ByteOrder::Native);
                    false
                }
                "nt" => {
                    directive.null_terminated = true;
                    false
                }
                "len" => {
                    directive.length_field = value.filter(|name| !name.is_empty()).map(str::to_string);
                    true
                }
                "-" => {
                    directive.skip = true;
                    false
                }
                _ => {
                    return Err(ConfigError::UnknownKey {
                        field: String::new(),
                        directive: raw.to_string(),
                        key: key.to_string(),
                    });
                }
            };

            if takes_value && value.is_none_or(str::is_empty) {
                return Err(ConfigError::MissingValue {
                    field: String::new(),
                    directive: raw.to_string(),
                    key: key.to_string(),
                });
            }
            if !takes_value && value.is_some() {
                return Err(ConfigError::UnexpectedValue {
                    field: String::new(),
                    directive: raw.to_string(),
                    key: key.to_string(),
                });
            }
        }

        Ok(directive)
    }

    /// Original directive text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Byte order override, if the directive sets one.
    pub fn order(&self) -> Option<ByteOrder> {
        self.order
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    /// Name of the sibling field that supplies this field's length.
    pub fn length_field(&self) -> Option<&str> {
        self.length_field.as_deref()
    }

    pub fn is_null_terminated(&self) -> bool {
        self.null_terminated
    }

    /// Effective context of the decorated field inside `parent`.
    pub fn context<'a>(&'a self, parent: &FieldContext<'_>) -> FieldContext<'a> {
        FieldContext {
            order: self.order.unwrap_or(parent.order),
            directive: self,
        }
    }
}

/// Resolved encoding configuration for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldContext<'a> {
    order: ByteOrder,
    directive: &'a Directive,
}

impl FieldContext<'static> {
    /// Context the entry points start from: the given byte order and no other options.
    pub fn root(order: ByteOrder) -> Self {
        FieldContext {
            order,
            directive: &ROOT,
        }
    }
}

impl<'a> FieldContext<'a> {
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn directive(&self) -> &'a Directive {
        self.directive
    }

    pub fn is_skipped(&self) -> bool {
        self.directive.skip
    }

    pub fn length_field(&self) -> Option<&'a str> {
        self.directive.length_field()
    }

    pub fn is_null_terminated(&self) -> bool {
        self.directive.null_terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directive() {
        let directive = Directive::parse("").unwrap();
        assert_eq!(directive, Directive::default());
    }

    #[test]
    fn test_parse_all_options() {
        let directive = Directive::parse("le,nt").unwrap();
        assert_eq!(directive.order(), Some(ByteOrder::Little));
        assert!(directive.is_null_terminated());
        assert!(!directive.is_skipped());
        assert_eq!(directive.raw(), "le,nt");

        let directive = Directive::parse("be,len=size").unwrap();
        assert_eq!(directive.order(), Some(ByteOrder::Big));
        assert_eq!(directive.length_field(), Some("size"));

        assert!(Directive::parse("-").unwrap().is_skipped());
        assert_eq!(Directive::parse("ne").unwrap().order(), Some(ByteOrder::Native));
    }

    #[test]
    fn test_last_order_wins() {
        let directive = Directive::parse("le,be").unwrap();
        assert_eq!(directive.order(), Some(ByteOrder::Big));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            Directive::parse("be,packed").unwrap_err(),
            ConfigError::UnknownKey {
                field: String::new(),
                directive: "be,packed".to_string(),
                key: "packed".to_string(),
            }
        );
        // a trailing comma produces an empty token
        assert!(matches!(
            Directive::parse("le,").unwrap_err(),
            ConfigError::UnknownKey { key, .. } if key.is_empty()
        ));
    }

    #[test]
    fn test_len_needs_value() {
        assert_eq!(
            Directive::parse("len").unwrap_err(),
            ConfigError::MissingValue {
                field: String::new(),
                directive: "len".to_string(),
                key: "len".to_string(),
            }
        );
        assert!(matches!(
            Directive::parse("len=").unwrap_err(),
            ConfigError::MissingValue { .. }
        ));
    }

    #[test]
    fn test_flag_cannot_have_value() {
        assert_eq!(
            Directive::parse("nt=1").unwrap_err(),
            ConfigError::UnexpectedValue {
                field: String::new(),
                directive: "nt=1".to_string(),
                key: "nt".to_string(),
            }
        );
        assert!(matches!(
            Directive::parse("-=x").unwrap_err(),
            ConfigError::UnexpectedValue { .. }
        ));
    }

    #[test]
    fn test_context_inherits_only_order() {
        let parent_directive = Directive::parse("be,nt").unwrap();
        let parent = parent_directive.context(&FieldContext::root(ByteOrder::Little));
        assert_eq!(parent.order(), ByteOrder::Big);
        assert!(parent.is_null_terminated());

        let child_directive = Directive::parse("").unwrap();
        let child = child_directive.context(&parent);
        assert_eq!(child.order(), ByteOrder::Big);
        assert!(!child.is_null_terminated());
        assert_eq!(child.length_field(), None);

        let override_directive = Directive::parse("le").unwrap();
        assert_eq!(override_directive.context(&parent).order(), ByteOrder::Little);
    }
}
