//! Argument spec derivation.
//!
//! A pure pass from one field descriptor plus its resolved strategy to a
//! fully derived `ArgSpec`, and the narrow bridge that registers a spec with
//! the underlying parser and reads parsed matches back into JSON values.

use clap::builder::{PossibleValuesParser, ValueParser};
use clap::{Arg, ArgAction, ArgMatches};
use serde_json::Value;

use crate::descriptor::FieldDescriptor;
use crate::error::{Error, Result};
use crate::resolve::{resolve, Coerce, Strategy};

/// The fully derived CLI argument definition for one field.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    /// Destination field name; always the declared identifier.
    pub field: String,
    /// Positional arguments keep the bare identifier; flags transliterate
    /// underscores to dashes (the leading `--` is the parser's concern).
    pub cli_name: String,
    pub short: Option<char>,
    /// Alternate hidden spelling, used when list flags are singularized.
    pub alias: Option<String>,
    pub positional: bool,
    pub strategy: Strategy,
    /// Value observed when the argument is absent. `None` only for required
    /// arguments.
    pub default: Option<Value>,
    pub required: bool,
    /// Member names for enumeration-typed fields, empty otherwise.
    pub choices: Vec<String>,
    pub skip: bool,
    pub help: Option<String>,
}

/// Derive the spec for one descriptor. Deterministic; registration order is
/// the caller's responsibility and must follow descriptor order.
pub fn build(descriptor: &FieldDescriptor, singular_list_flags: bool) -> Result<ArgSpec> {
    let resolved = resolve(
        &descriptor.name,
        &descriptor.ty,
        descriptor.default.as_ref(),
    )?;
    let (cli_name, alias) = derive_cli_name(descriptor, &resolved.strategy, singular_list_flags);
    let choices = match &resolved.strategy {
        Strategy::Single {
            coerce: Coerce::Enum(members),
            ..
        }
        | Strategy::Sequence {
            coerce: Coerce::Enum(members),
        } => members.members.clone(),
        _ => Vec::new(),
    };

    Ok(ArgSpec {
        field: descriptor.name.clone(),
        cli_name,
        short: descriptor
            .short
            .then(|| descriptor.name.chars().next())
            .flatten(),
        alias,
        positional: descriptor.positional,
        required: resolved.default.is_none(),
        default: resolved.default,
        strategy: resolved.strategy,
        choices,
        skip: descriptor.skip,
        help: descriptor.help.clone(),
    })
}

fn derive_cli_name(
    descriptor: &FieldDescriptor,
    strategy: &Strategy,
    singular_list_flags: bool,
) -> (String, Option<String>) {
    if descriptor.positional {
        return (descriptor.name.clone(), None);
    }

    let mut name = descriptor.name.trim_matches('_').replace('_', "-");
    let mut alias = None;
    if singular_list_flags
        && matches!(strategy, Strategy::Sequence { .. })
        && name.len() > 3
        && name.ends_with('s')
    {
        alias = Some(name.clone());
        name.truncate(name.len() - 1);
    }
    if let Strategy::Switch { negated: true } = strategy {
        name = format!("no-{}", name);
    }
    (name, alias)
}

impl ArgSpec {
    /// Render this spec as an argument registration for the parsing layer.
    pub fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.field.clone());
        if self.positional {
            arg = arg.value_name(self.cli_name.clone());
        } else {
            arg = arg.long(self.cli_name.clone());
            if let Some(short) = self.short {
                arg = arg.short(short);
            }
            if let Some(alias) = &self.alias {
                arg = arg.alias(alias.clone());
            }
        }
        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }

        match &self.strategy {
            Strategy::Switch { negated } => {
                arg = arg.action(if *negated {
                    ArgAction::SetFalse
                } else {
                    ArgAction::SetTrue
                });
            }
            Strategy::Single { coerce, .. } => {
                arg = arg
                    .action(ArgAction::Set)
                    .num_args(1)
                    .value_parser(value_parser(coerce))
                    .required(self.required);
            }
            Strategy::Sequence { coerce } => {
                // Flags accumulate across occurrences; a positional sequence
                // swallows the remaining bare tokens in one occurrence.
                let action = if self.positional {
                    ArgAction::Set
                } else {
                    ArgAction::Append
                };
                arg = arg
                    .action(action)
                    .num_args(0..)
                    .value_parser(value_parser(coerce));
            }
        }
        arg
    }

    /// Read this field's parsed value back out of the matches, falling back
    /// to the derived default. Sequence defaults are cloned here, so every
    /// invocation observes a freshly built sequence.
    pub fn extract(&self, matches: &ArgMatches) -> Result<Value> {
        if self.skip {
            return Ok(self.default.clone().unwrap_or(Value::Null));
        }

        match &self.strategy {
            Strategy::Switch { .. } => Ok(Value::Bool(matches.get_flag(&self.field))),

            Strategy::Single { coerce, .. } => {
                let found = match coerce {
                    Coerce::Str | Coerce::Enum(_) => matches
                        .get_one::<String>(&self.field)
                        .map(|text| Value::String(text.clone())),
                    Coerce::Int => matches
                        .get_one::<i64>(&self.field)
                        .map(|number| Value::from(*number)),
                    Coerce::Float => match matches.get_one::<f64>(&self.field) {
                        Some(number) => Some(float_value(&self.field, *number)?),
                        None => None,
                    },
                };
                Ok(found
                    .or_else(|| self.default.clone())
                    .unwrap_or(Value::Null))
            }

            Strategy::Sequence { coerce } => {
                let found = match coerce {
                    Coerce::Str | Coerce::Enum(_) => matches
                        .get_many::<String>(&self.field)
                        .map(|values| values.map(|text| Value::String(text.clone())).collect()),
                    Coerce::Int => matches
                        .get_many::<i64>(&self.field)
                        .map(|values| values.map(|number| Value::from(*number)).collect()),
                    Coerce::Float => match matches.get_many::<f64>(&self.field) {
                        Some(values) => {
                            let mut items = Vec::new();
                            for number in values {
                                items.push(float_value(&self.field, *number)?);
                            }
                            Some(items)
                        }
                        None => None,
                    },
                };
                match found {
                    Some(items) => Ok(Value::Array(items)),
                    None => Ok(self
                        .default
                        .clone()
                        .unwrap_or_else(|| Value::Array(Vec::new()))),
                }
            }
        }
    }
}

fn value_parser(coerce: &Coerce) -> ValueParser {
    match coerce {
        Coerce::Str => ValueParser::string(),
        Coerce::Int => clap::value_parser!(i64).into(),
        Coerce::Float => clap::value_parser!(f64).into(),
        Coerce::Enum(members) => PossibleValuesParser::new(members.members.clone()).into(),
    }
}

fn float_value(field: &str, number: f64) -> Result<Value> {
    serde_json::Number::from_f64(number)
        .map(Value::Number)
        .ok_or_else(|| Error::FieldValue(field.to_string(), format!("non-finite number {}", number)))
}
