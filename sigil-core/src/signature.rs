//! Declaration types for CLI targets.
//!
//! A target is declared either as a `Signature` (a plain callable's ordered
//! parameter list) or as a `RecordSchema` (a record type's field list). These
//! play the role reflection plays elsewhere: the author states each name,
//! type and default once, and everything downstream is derived from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a single parameter or record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredType {
    Str,
    Int,
    Float,
    Bool,
    Enum(EnumType),
    Optional(Box<DeclaredType>),
    List(Box<DeclaredType>),
    Record(RecordSchema),
}

impl DeclaredType {
    pub fn optional(inner: DeclaredType) -> Self {
        DeclaredType::Optional(Box::new(inner))
    }

    pub fn list(inner: DeclaredType) -> Self {
        DeclaredType::List(Box::new(inner))
    }

    pub fn enumeration(
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        DeclaredType::Enum(EnumType::new(name, members))
    }
}

/// A named enumeration with a fixed member set. Members are matched by name
/// on the command line, so they must spell the names the target's
/// deserializer expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumType {
    pub fn new(
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// One parameter of a plain callable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: DeclaredType,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub help: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            help: None,
        }
    }

    /// Give the parameter a default, turning it into an optional flag.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }
}

/// The declared parameter list of a plain callable.
///
/// Parameters without defaults bind positionally, in declaration order;
/// parameters with defaults become optional flags. There is no explicit
/// positional opt-in on this path; use a `RecordSchema` for that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub singular_list_flags: bool,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            params: Vec::new(),
            singular_list_flags: false,
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Expose list-typed flags under the singular spelling (`excludes`
    /// becomes `--exclude`), keeping the plural as a hidden alias.
    pub fn singular_list_flags(mut self) -> Self {
        self.singular_list_flags = true;
        self
    }
}

/// One field of a record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: DeclaredType,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub positional: bool,
    #[serde(default)]
    pub short: bool,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub help: Option<String>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            positional: false,
            short: false,
            skip: false,
            help: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Bind this field by position instead of a flag. The one place a field
    /// with a default can still bind positionally.
    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// Also accept a single-letter flag built from the field's first letter.
    pub fn short_flag(mut self) -> Self {
        self.short = true;
        self
    }

    /// Leave the field off the command line entirely; its default is passed
    /// through to the target unchanged.
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }
}

/// The declared field list of a record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub singular_list_flags: bool,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            singular_list_flags: false,
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// See [`Signature::singular_list_flags`].
    pub fn singular_list_flags(mut self) -> Self {
        self.singular_list_flags = true;
        self
    }
}
