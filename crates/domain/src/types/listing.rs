//! List response envelopes
//!
//! The backend is inconsistent about list responses: depending on the view
//! and pagination settings it returns a bare array, `{ "results": [...] }`
//! or `{ "data": [...] }`. [`Listing`] accepts all three.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A list response in any of the backend's envelope shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Results { results: Vec<T> },
    Data { data: Vec<T> },
    /// Anything else (object without a list, `null`, scalar)
    Empty,
}

impl<T> Listing<T> {
    /// Flatten the envelope into the items it carries.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Results { results: items } | Self::Data { data: items } => {
                items
            }
            Self::Empty => Vec::new(),
        }
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<'de, T> Deserialize<'de> for Listing<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let items = |v: Value| serde_json::from_value::<Vec<T>>(v).map_err(D::Error::custom);

        // `results` wins over `data` when both are arrays.
        match value {
            Value::Array(list) => items(Value::Array(list)).map(Self::Bare),
            Value::Object(mut map) => {
                if matches!(map.get("results"), Some(Value::Array(_))) {
                    let results = map.remove("results").unwrap_or_default();
                    items(results).map(|results| Self::Results { results })
                } else if matches!(map.get("data"), Some(Value::Array(_))) {
                    let data = map.remove("data").unwrap_or_default();
                    items(data).map(|data| Self::Data { data })
                } else {
                    Ok(Self::Empty)
                }
            }
            _ => Ok(Self::Empty),
        }
    }
}
