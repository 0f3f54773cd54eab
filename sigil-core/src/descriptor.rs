//! Field descriptor extraction.
//!
//! Resolves a declared parameter list or record field list into an ordered
//! sequence of immutable `FieldDescriptor`s. Declaration order is preserved:
//! it determines positional binding and help display order. All shape
//! problems are detected here, before any parser is built.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::signature::{DeclaredType, RecordSchema, Signature};

/// Internal record of one parameter or field: name, declared type, default
/// and positional-ness. Built once at construction, read-only afterwards.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: DeclaredType,
    pub default: Option<Value>,
    pub positional: bool,
    pub short: bool,
    pub skip: bool,
    pub help: Option<String>,
}

/// Extract descriptors from a plain callable's parameter list.
///
/// A parameter is positional only if it has no default; booleans and
/// optionals carry an implicit default and so always become flags. A single
/// record-typed parameter expands into the record's own fields.
pub fn from_signature(signature: &Signature) -> Result<Vec<FieldDescriptor>> {
    if let [param] = signature.params.as_slice() {
        if let DeclaredType::Record(schema) = &param.ty {
            return from_record(schema);
        }
    }

    let mut fields = Vec::with_capacity(signature.params.len());
    for param in &signature.params {
        if let DeclaredType::Record(_) = param.ty {
            return Err(Error::Configuration(format!(
                "Record-typed parameter '{}' must be the callable's only parameter",
                param.name
            )));
        }

        let implicit_default = matches!(
            param.ty,
            DeclaredType::Bool | DeclaredType::Optional(_)
        );
        fields.push(FieldDescriptor {
            name: param.name.clone(),
            ty: param.ty.clone(),
            default: param.default.clone(),
            positional: param.default.is_none() && !implicit_default,
            short: false,
            skip: false,
            help: param.help.clone(),
        });
    }

    validate(&fields)?;
    Ok(fields)
}

/// Extract descriptors from a record type's field list. Positional binding
/// is an explicit per-field opt-in here.
pub fn from_record(schema: &RecordSchema) -> Result<Vec<FieldDescriptor>> {
    let mut fields = Vec::with_capacity(schema.fields.len());
    for decl in &schema.fields {
        if let DeclaredType::Record(_) = decl.ty {
            return Err(Error::Configuration(format!(
                "Field '{}' nests a record inside a record; one record layer is supported",
                decl.name
            )));
        }
        if decl.positional && decl.short {
            return Err(Error::Configuration(format!(
                "Positional field '{}' cannot also have a short flag",
                decl.name
            )));
        }
        if decl.skip && decl.default.is_none() && !default_free(&decl.ty) {
            return Err(Error::Configuration(format!(
                "Skipped field '{}' needs a default",
                decl.name
            )));
        }

        fields.push(FieldDescriptor {
            name: decl.name.clone(),
            ty: decl.ty.clone(),
            default: decl.default.clone(),
            positional: decl.positional,
            short: decl.short,
            skip: decl.skip,
            help: decl.help.clone(),
        });
    }

    validate(&fields)?;
    Ok(fields)
}

// Types that supply their own default when the declaration gives none.
fn default_free(ty: &DeclaredType) -> bool {
    matches!(
        ty,
        DeclaredType::Bool | DeclaredType::Optional(_) | DeclaredType::List(_)
    )
}

// Ordering and uniqueness rules the underlying parser cannot express:
// positionals must stay resolvable left to right, so nothing may follow a
// multi-value positional, and a required positional may not follow an
// optional one.
fn validate(fields: &[FieldDescriptor]) -> Result<()> {
    let mut seen = HashSet::new();
    let mut after_variadic = false;
    let mut after_optional = false;

    for field in fields {
        if field.name.is_empty() {
            return Err(Error::Configuration(
                "Field names cannot be empty".to_string(),
            ));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(Error::Configuration(format!(
                "Duplicate field name '{}'",
                field.name
            )));
        }
        if !field.positional || field.skip {
            continue;
        }

        if after_variadic {
            return Err(Error::Configuration(format!(
                "Positional field '{}' follows a multi-value positional",
                field.name
            )));
        }
        let variadic = matches!(field.ty, DeclaredType::List(_));
        let optional =
            variadic || field.default.is_some() || matches!(field.ty, DeclaredType::Optional(_));
        if !optional && after_optional {
            return Err(Error::Configuration(format!(
                "Required positional field '{}' follows an optional positional",
                field.name
            )));
        }
        after_variadic |= variadic;
        after_optional |= optional;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{FieldDecl, Param};
    use serde_json::json;

    fn str_ty() -> DeclaredType {
        DeclaredType::Str
    }

    #[test]
    fn no_default_params_become_positionals_in_order() {
        let sig = Signature::new("cp")
            .param(Param::new("source", str_ty()))
            .param(Param::new("dest", str_ty()))
            .param(Param::new("retries", DeclaredType::Int).default_value(3));

        let fields = from_signature(&sig).unwrap();
        let order: Vec<(&str, bool)> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.positional))
            .collect();
        assert_eq!(
            order,
            vec![("source", true), ("dest", true), ("retries", false)]
        );
    }

    #[test]
    fn bool_and_optional_params_are_never_positional() {
        let sig = Signature::new("t")
            .param(Param::new("verbose", DeclaredType::Bool))
            .param(Param::new("tag", DeclaredType::optional(str_ty())));

        let fields = from_signature(&sig).unwrap();
        assert!(fields.iter().all(|f| !f.positional));
    }

    #[test]
    fn sole_record_param_expands_into_its_fields() {
        let schema = RecordSchema::new("ln")
            .field(FieldDecl::new("input", str_ty()).positional())
            .field(FieldDecl::new("force", DeclaredType::Bool).default_value(false));
        let sig =
            Signature::new("ln").param(Param::new("args", DeclaredType::Record(schema)));

        let fields = from_signature(&sig).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "input");
        assert!(fields[0].positional);
    }

    #[test]
    fn record_param_with_siblings_is_rejected() {
        let schema = RecordSchema::new("inner");
        let sig = Signature::new("t")
            .param(Param::new("args", DeclaredType::Record(schema)))
            .param(Param::new("extra", str_ty()));

        assert!(matches!(
            from_signature(&sig),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn record_inside_record_is_rejected() {
        let inner = RecordSchema::new("inner");
        let schema = RecordSchema::new("outer")
            .field(FieldDecl::new("nested", DeclaredType::Record(inner)));

        assert!(matches!(from_record(&schema), Err(Error::Configuration(_))));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let sig = Signature::new("t")
            .param(Param::new("x", str_ty()))
            .param(Param::new("x", DeclaredType::Int));

        assert!(matches!(from_signature(&sig), Err(Error::Configuration(_))));
    }

    #[test]
    fn positional_after_variadic_positional_is_rejected() {
        let schema = RecordSchema::new("t")
            .field(FieldDecl::new("inputs", DeclaredType::list(str_ty())).positional())
            .field(FieldDecl::new("output", str_ty()).positional());

        assert!(matches!(from_record(&schema), Err(Error::Configuration(_))));
    }

    #[test]
    fn required_positional_after_defaulted_positional_is_rejected() {
        let schema = RecordSchema::new("t")
            .field(FieldDecl::new("mode", str_ty()).positional().default_value("fast"))
            .field(FieldDecl::new("target", str_ty()).positional());

        assert!(matches!(from_record(&schema), Err(Error::Configuration(_))));
    }

    #[test]
    fn defaulted_positional_is_allowed() {
        let schema = RecordSchema::new("t")
            .field(FieldDecl::new("target", str_ty()).positional())
            .field(FieldDecl::new("mode", str_ty()).positional().default_value("fast"));

        let fields = from_record(&schema).unwrap();
        assert!(fields[1].positional);
        assert_eq!(fields[1].default, Some(json!("fast")));
    }

    #[test]
    fn skipped_field_without_default_is_rejected() {
        let schema = RecordSchema::new("t").field(FieldDecl::new("token", str_ty()).skip());
        assert!(matches!(from_record(&schema), Err(Error::Configuration(_))));

        let schema = RecordSchema::new("t")
            .field(FieldDecl::new("token", str_ty()).skip().default_value("anon"));
        assert!(from_record(&schema).is_ok());
    }
}
