use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// The parsed mapping of field name to value handed to a target.
///
/// Every declared field is present, defaults included, so lookups only fail
/// when the name was never declared or the requested type does not match.
#[derive(Debug, Clone)]
pub struct FieldValues {
    map: Map<String, Value>,
}

impl FieldValues {
    pub(crate) fn new(map: Map<String, Value>) -> Self {
        Self { map }
    }

    /// Bind one field to a concrete type.
    pub fn get<T: DeserializeOwned>(&self, field: &str) -> Result<T> {
        let value = self
            .map
            .get(field)
            .ok_or_else(|| Error::UnknownField(field.to_string()))?;
        serde_json::from_value(value.clone())
            .map_err(|e| Error::FieldValue(field.to_string(), e.to_string()))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.map.contains_key(field)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.map
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.map)
    }
}
