//! Top-level runner.
//!
//! Construction extracts descriptors, resolves types, derives specs and
//! registers every argument with the underlying parser, in that order and
//! exactly once; a `Runner` in hand is always fully built. Each run parses
//! a token sequence, assembles the field mapping and invokes the target,
//! with no state carried between runs.

use std::collections::HashSet;

use clap::{ArgMatches, Command};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::descriptor::{self, FieldDescriptor};
use crate::error::{Error, Result};
use crate::signature::{RecordSchema, Signature};
use crate::spec::{self, ArgSpec};
use crate::target::Target;
use crate::values::FieldValues;

pub struct Runner<T> {
    command: Command,
    specs: Vec<ArgSpec>,
    target: Target<T>,
}

impl<T> Runner<T> {
    /// Expose a plain callable. The callable receives the parsed mapping and
    /// binds each parameter by name.
    pub fn from_fn<F>(signature: Signature, target: F) -> Result<Self>
    where
        F: Fn(FieldValues) -> Result<T> + 'static,
    {
        let fields = descriptor::from_signature(&signature)?;
        Self::build(
            signature.name,
            signature.description,
            signature.singular_list_flags,
            fields,
            Target::Function(Box::new(target)),
        )
    }

    /// Expose a callable taking a single record-typed value. The record is
    /// rebuilt from the flat field mapping before each call.
    pub fn from_record<R, F>(schema: RecordSchema, target: F) -> Result<Self>
    where
        R: DeserializeOwned + 'static,
        F: Fn(R) -> Result<T> + 'static,
    {
        let fields = descriptor::from_record(&schema)?;
        let adapter = move |value: Value| -> Result<T> {
            let record: R = serde_json::from_value(value)?;
            target(record)
        };
        Self::build(
            schema.name,
            schema.description,
            schema.singular_list_flags,
            fields,
            Target::Record(Box::new(adapter)),
        )
    }

    fn build(
        name: String,
        description: Option<String>,
        singular_list_flags: bool,
        fields: Vec<FieldDescriptor>,
        target: Target<T>,
    ) -> Result<Self> {
        let mut command = Command::new(name).no_binary_name(true);
        if let Some(text) = description {
            command = command.about(text);
        }

        let mut specs = Vec::with_capacity(fields.len());
        let mut longs = HashSet::from(["help".to_string()]);
        let mut shorts = HashSet::from(['h']);
        for field in &fields {
            let spec = spec::build(field, singular_list_flags)?;
            if !spec.skip {
                if !spec.positional {
                    for long in [Some(&spec.cli_name), spec.alias.as_ref()].into_iter().flatten() {
                        if !longs.insert(long.clone()) {
                            return Err(Error::Configuration(format!(
                                "Flag name --{} is already taken",
                                long
                            )));
                        }
                    }
                    if let Some(short) = spec.short {
                        if !shorts.insert(short) {
                            return Err(Error::Configuration(format!(
                                "Short flag -{} is already taken",
                                short
                            )));
                        }
                    }
                }
                debug!(
                    "Registered argument {}{} for field {}",
                    if spec.positional { "" } else { "--" },
                    spec.cli_name,
                    spec.field
                );
                command = command.arg(spec.to_arg());
            }
            specs.push(spec);
        }

        Ok(Self {
            command,
            specs,
            target,
        })
    }

    /// Parse the process argument vector and invoke the target. On a parse
    /// failure the parsing layer prints usage to stderr and exits non-zero.
    pub fn run(&self) -> Result<T> {
        self.run_from(std::env::args().skip(1))
    }

    /// Like [`run`](Self::run) with an explicit token sequence.
    pub fn run_from<I, S>(&self, tokens: I) -> Result<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.parse(tokens) {
            Ok(matches) => self.invoke(&matches),
            Err(Error::Parse(parse_error)) => parse_error.exit(),
            Err(other) => Err(other),
        }
    }

    /// Parse an explicit token sequence, surfacing parse failures to the
    /// caller instead of exiting. The target's return value passes through
    /// unchanged.
    pub fn try_run_from<I, S>(&self, tokens: I) -> Result<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let matches = self.parse(tokens)?;
        self.invoke(&matches)
    }

    fn parse<I, S>(&self, tokens: I) -> Result<ArgMatches>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        Ok(self.command.clone().try_get_matches_from(tokens)?)
    }

    fn invoke(&self, matches: &ArgMatches) -> Result<T> {
        let mut map = Map::with_capacity(self.specs.len());
        for spec in &self.specs {
            map.insert(spec.field.clone(), spec.extract(matches)?);
        }
        debug!("Invoking target with fields: {}", serde_json::Value::Object(map.clone()));
        self.target.invoke(FieldValues::new(map))
    }

    /// The derived argument specs, in declaration order.
    pub fn specs(&self) -> &[ArgSpec] {
        &self.specs
    }

    /// Render the auto-generated usage text.
    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }
}
