//! Type resolution.
//!
//! Classifies a declared type into exactly one coercion strategy. This is
//! the single branching point for type categories; nothing downstream
//! inspects `DeclaredType` again.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::signature::{DeclaredType, EnumType};

/// Coercion applied to one raw token.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerce {
    Str,
    Int,
    Float,
    /// The matched token is an enum member name; the target's deserializer
    /// maps it back to the member.
    Enum(EnumType),
}

/// How a field consumes tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// A presence flag. `negated` means the default is true and the flag
    /// stores false (`--no-...`); a plain store-true flag cannot turn a
    /// true-default boolean off.
    Switch { negated: bool },
    /// One token, coerced. `optional` marks a nullable field whose unset
    /// value is null rather than a missing-argument error.
    Single { coerce: Coerce, optional: bool },
    /// Zero or more tokens, each coerced independently.
    Sequence { coerce: Coerce },
}

/// A classified field: strategy plus the normalized default observed when
/// the argument is absent. `None` means the argument is required.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub strategy: Strategy,
    pub default: Option<Value>,
}

pub fn resolve(name: &str, ty: &DeclaredType, default: Option<&Value>) -> Result<Resolved> {
    match ty {
        DeclaredType::Str | DeclaredType::Int | DeclaredType::Float | DeclaredType::Enum(_) => {
            let coerce = scalar(name, ty)?;
            if let Some(value) = default {
                check_default(name, &coerce, value)?;
            }
            Ok(Resolved {
                strategy: Strategy::Single {
                    coerce,
                    optional: false,
                },
                default: default.cloned(),
            })
        }

        DeclaredType::Bool => {
            let negated = match default {
                None | Some(Value::Bool(false)) => false,
                Some(Value::Bool(true)) => true,
                Some(other) => {
                    return Err(Error::Configuration(format!(
                        "Default for boolean field '{}' must be a boolean, got {}",
                        name, other
                    )))
                }
            };
            Ok(Resolved {
                strategy: Strategy::Switch { negated },
                default: Some(Value::Bool(negated)),
            })
        }

        DeclaredType::Optional(inner) => {
            let coerce = scalar(name, inner)?;
            if let Some(value) = default {
                if !value.is_null() {
                    check_default(name, &coerce, value)?;
                }
            }
            Ok(Resolved {
                strategy: Strategy::Single {
                    coerce,
                    optional: true,
                },
                default: Some(default.cloned().unwrap_or(Value::Null)),
            })
        }

        DeclaredType::List(inner) => {
            let coerce = scalar(name, inner)?;
            let default = match default {
                Some(Value::Array(items)) => {
                    for item in items {
                        check_default(name, &coerce, item)?;
                    }
                    Value::Array(items.clone())
                }
                Some(other) => {
                    return Err(Error::Configuration(format!(
                        "Default for list field '{}' must be a list, got {}",
                        name, other
                    )))
                }
                None => Value::Array(Vec::new()),
            };
            Ok(Resolved {
                strategy: Strategy::Sequence { coerce },
                default: Some(default),
            })
        }

        DeclaredType::Record(_) => Err(Error::Configuration(format!(
            "Record type for field '{}' exceeds the supported nesting depth",
            name
        ))),
    }
}

// A type usable as a bare token: primitives and enums. Everything else is
// either handled above or unsupported at this depth.
fn scalar(name: &str, ty: &DeclaredType) -> Result<Coerce> {
    match ty {
        DeclaredType::Str => Ok(Coerce::Str),
        DeclaredType::Int => Ok(Coerce::Int),
        DeclaredType::Float => Ok(Coerce::Float),
        DeclaredType::Enum(members) => Ok(Coerce::Enum(members.clone())),
        DeclaredType::Bool => Err(Error::UnsupportedType(format!(
            "Boolean field '{}' cannot be wrapped in optional or list",
            name
        ))),
        DeclaredType::Optional(_) | DeclaredType::List(_) => Err(Error::UnsupportedType(format!(
            "Field '{}' nests optional/list types deeper than one level",
            name
        ))),
        DeclaredType::Record(_) => Err(Error::Configuration(format!(
            "Record type for field '{}' exceeds the supported nesting depth",
            name
        ))),
    }
}

fn check_default(name: &str, coerce: &Coerce, value: &Value) -> Result<()> {
    let ok = match coerce {
        Coerce::Str => value.is_string(),
        Coerce::Int => value.is_i64() || value.is_u64(),
        Coerce::Float => value.is_number(),
        Coerce::Enum(members) => match value.as_str() {
            Some(text) => {
                if members.members.iter().any(|m| m == text) {
                    true
                } else {
                    return Err(Error::Configuration(format!(
                        "Default '{}' for field '{}' is not a member of enum {}",
                        text, name, members.name
                    )));
                }
            }
            None => false,
        },
    };
    if ok {
        Ok(())
    } else {
        Err(Error::Configuration(format!(
            "Default for field '{}' does not match its declared type: {}",
            name, value
        )))
    }
}
