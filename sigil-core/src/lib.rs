//! Core types and functionality for deriving command-line interfaces from
//! declared signatures.
//!
//! A target callable is declared once (parameter names, types, defaults)
//! and everything else is derived: flags, positionals, coercion, choices
//! and help. Reading `argv`, usage text and exit codes are delegated to the
//! underlying parsing layer.

mod descriptor;
mod error;
mod resolve;
mod runner;
mod signature;
mod spec;
mod target;
mod values;

pub use descriptor::FieldDescriptor;
pub use error::{Error, Result};
pub use resolve::{Coerce, Strategy};
pub use runner::Runner;
pub use signature::{DeclaredType, EnumType, FieldDecl, Param, RecordSchema, Signature};
pub use spec::ArgSpec;
pub use target::Target;
pub use values::FieldValues;

/// Re-export of the value type used in field mappings and defaults.
pub use serde_json::Value;

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{
        DeclaredType, EnumType, Error, FieldDecl, FieldValues, Param, RecordSchema, Result,
        Runner, Signature, Value,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
