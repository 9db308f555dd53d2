//! Positional request arguments.
//!
//! Requests carry their arguments as a JSON array, in the order the content
//! passed them (`invoke('save-file', bytes, name, filters)`). The transport
//! never validates them; handlers decode what they need through [`Args`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors produced while decoding positional arguments.
#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    #[error("missing argument #{index} ({name})")]
    Missing { index: usize, name: &'static str },

    #[error("invalid argument #{index} ({name}): {source}")]
    Invalid {
        index: usize,
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Positional arguments of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args(pub Vec<Value>);

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes a required argument. `null` counts as missing.
    pub fn required<T: DeserializeOwned>(
        &self,
        index: usize,
        name: &'static str,
    ) -> Result<T, ArgsError> {
        match self.0.get(index) {
            None | Some(Value::Null) => Err(ArgsError::Missing { index, name }),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|source| ArgsError::Invalid { index, name, source }),
        }
    }

    /// Decodes an optional argument. Absent and `null` both yield `None`.
    pub fn optional<T: DeserializeOwned>(
        &self,
        index: usize,
        name: &'static str,
    ) -> Result<Option<T>, ArgsError> {
        match self.0.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| ArgsError::Invalid { index, name, source }),
        }
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}
