use serde_json::Value;

use crate::error::Result;
use crate::values::FieldValues;

/// A flat callable: receives the whole mapping and binds fields by name.
pub type FunctionTarget<T> = Box<dyn Fn(FieldValues) -> Result<T>>;

/// A record callable: the mapping is first rebuilt into the record value.
pub type RecordTarget<T> = Box<dyn Fn(Value) -> Result<T>>;

/// The callable being exposed as a CLI. Exactly one of two shapes for its
/// whole lifetime, decided at runner construction.
pub enum Target<T> {
    Function(FunctionTarget<T>),
    Record(RecordTarget<T>),
}

impl<T> Target<T> {
    /// Invoke the target with the parsed mapping. The return value, and any
    /// error the target produces, pass through unchanged.
    pub(crate) fn invoke(&self, values: FieldValues) -> Result<T> {
        match self {
            Target::Function(call) => call(values),
            Target::Record(call) => call(values.into_value()),
        }
    }
}
